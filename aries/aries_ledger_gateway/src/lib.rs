pub mod errors;
pub mod issuer;
pub mod ledger;
pub mod wallet;

pub use indy_vdr;
pub use ledger_types;
