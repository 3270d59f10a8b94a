pub mod constants;
pub mod errors;
pub mod fabric_network;
pub mod logger;
pub mod mock_issuer;
pub mod mock_wallet;
pub mod token_pool;
