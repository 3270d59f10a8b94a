use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::LedgerTypesResult;

pub static URI_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\+\-\.]+:.+$").unwrap());

/// base58 alphabet, 21 or 22 characters (16 byte unqualified nym)
pub static LEGACY_DID_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[1-9A-HJ-NP-Za-km-z]{21,22}$").unwrap());

pub static LEGACY_SCHEMA_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^([1-9A-HJ-NP-Za-km-z]{21,22}):2:([^:]+):([0-9.]+)$").unwrap()
});

pub static LEGACY_CRED_DEF_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^([1-9A-HJ-NP-Za-km-z]{21,22}):3:(CL):([^:]+):(.+)$").unwrap()
});

pub trait Validatable {
    fn validate(&self) -> LedgerTypesResult<()> {
        Ok(())
    }
}
