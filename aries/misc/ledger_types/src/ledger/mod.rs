pub mod cred_def;
pub mod nym;
pub mod schema;
