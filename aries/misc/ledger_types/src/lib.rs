#[macro_use]
extern crate serde;

#[cfg(test)]
#[macro_use]
extern crate serde_json;

pub mod error;
pub mod identifiers;
pub mod ledger;
pub mod templates;
mod validation;

pub use error::{LedgerTypesError, LedgerTypesResult};
pub use validation::Validatable;
