use std::fmt;

use crate::{
    error::{LedgerTypesError, LedgerTypesResult},
    validation::{Validatable, LEGACY_CRED_DEF_IDENTIFIER, URI_IDENTIFIER},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub struct CredentialDefinitionId(pub String);

impl CredentialDefinitionId {
    pub fn new_unchecked(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn new(s: impl Into<String>) -> LedgerTypesResult<Self> {
        let s = Self(s.into());
        s.validate()?;
        Ok(s)
    }

    /// Builds the legacy `<did>:3:<type>:<schema ref>:<tag>` form.
    pub fn new_legacy(did: &str, signature_type: &str, schema_ref: &str, tag: &str) -> Self {
        Self(format!("{did}:3:{signature_type}:{schema_ref}:{tag}"))
    }

    pub fn is_legacy(&self) -> bool {
        LEGACY_CRED_DEF_IDENTIFIER.is_match(&self.0)
    }

    /// Returns `(did, signature type, schema ref, tag)` for legacy identifiers.
    pub fn parts(&self) -> Option<(&str, &str, &str, &str)> {
        let caps = LEGACY_CRED_DEF_IDENTIFIER.captures(&self.0)?;
        Some((
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
            caps.get(4)?.as_str(),
        ))
    }
}

impl Validatable for CredentialDefinitionId {
    fn validate(&self) -> LedgerTypesResult<()> {
        if self.is_legacy() || URI_IDENTIFIER.is_match(&self.0) {
            return Ok(());
        }
        Err(LedgerTypesError::InvalidIdentifier {
            kind: "CredentialDefinitionId",
            value: self.0.clone(),
        })
    }
}

impl From<CredentialDefinitionId> for String {
    fn from(i: CredentialDefinitionId) -> Self {
        i.0
    }
}

impl TryFrom<&str> for CredentialDefinitionId {
    type Error = LedgerTypesError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        CredentialDefinitionId::new(value)
    }
}

impl fmt::Display for CredentialDefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
