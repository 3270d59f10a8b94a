pub mod base_ledger;
pub mod fabric;
pub mod indy;
pub mod ledger_kind;
pub mod request_signer;
pub mod request_submitter;
pub mod router;
mod type_conversion;
