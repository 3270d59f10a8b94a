use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::{
    error::LedgerTypesError,
    identifiers::{cred_def_id::CredentialDefinitionId, schema_id::SchemaId},
    ledger::schema::SCHEMA_VER,
    validation::Validatable,
    LedgerTypesResult,
};

pub const CL_SIGNATURE_TYPE: &str = "CL";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SignatureType {
    #[default]
    CL,
}

impl SignatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CL => CL_SIGNATURE_TYPE,
        }
    }
}

impl FromStr for SignatureType {
    type Err = LedgerTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CL_SIGNATURE_TYPE => Ok(Self::CL),
            _ => Err(LedgerTypesError::InvalidSignatureType(s.to_string())),
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public key material is kept opaque; its shape belongs to the issuer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialDefinitionData {
    pub primary: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDefinition {
    pub id: CredentialDefinitionId,
    /// Either a schema id or, for ledgers that key schemas by ordinal, the seq no.
    pub schema_id: SchemaId,
    #[serde(rename = "type")]
    pub signature_type: SignatureType,
    pub tag: String,
    pub value: CredentialDefinitionData,
    #[serde(default = "default_ver")]
    pub ver: String,
}

fn default_ver() -> String {
    SCHEMA_VER.to_string()
}

impl CredentialDefinition {
    pub fn supports_revocation(&self) -> bool {
        self.value.revocation.is_some()
    }
}

impl Validatable for CredentialDefinition {
    fn validate(&self) -> LedgerTypesResult<()> {
        self.id.validate()
    }
}
