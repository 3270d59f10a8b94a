use std::fmt;

use crate::{
    error::{LedgerTypesError, LedgerTypesResult},
    validation::{Validatable, LEGACY_SCHEMA_IDENTIFIER, URI_IDENTIFIER},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub struct SchemaId(pub String);

impl SchemaId {
    pub fn new_unchecked(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn new(s: impl Into<String>) -> LedgerTypesResult<Self> {
        let s = Self(s.into());
        s.validate()?;
        Ok(s)
    }

    /// Builds the legacy `<did>:2:<name>:<version>` form.
    pub fn new_legacy(did: &str, name: &str, version: &str) -> Self {
        Self(format!("{did}:2:{name}:{version}"))
    }

    pub fn is_legacy(&self) -> bool {
        LEGACY_SCHEMA_IDENTIFIER.is_match(&self.0)
    }

    /// Returns `(did, name, version)` for legacy identifiers.
    pub fn parts(&self) -> Option<(&str, &str, &str)> {
        let caps = LEGACY_SCHEMA_IDENTIFIER.captures(&self.0)?;
        Some((
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
        ))
    }
}

impl Validatable for SchemaId {
    fn validate(&self) -> LedgerTypesResult<()> {
        if self.is_legacy() || URI_IDENTIFIER.is_match(&self.0) {
            return Ok(());
        }
        Err(LedgerTypesError::InvalidIdentifier {
            kind: "SchemaId",
            value: self.0.clone(),
        })
    }
}

impl From<SchemaId> for String {
    fn from(i: SchemaId) -> Self {
        i.0
    }
}

impl TryFrom<&str> for SchemaId {
    type Error = LedgerTypesError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        SchemaId::new(value)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
