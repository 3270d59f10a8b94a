pub mod cred_def_id;
pub mod schema_id;
