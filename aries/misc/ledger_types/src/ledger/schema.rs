use std::collections::HashSet;

use crate::{
    error::{LedgerTypesError, LedgerTypesResult},
    identifiers::schema_id::SchemaId,
    validation::Validatable,
};

pub const MAX_ATTRIBUTES_COUNT: usize = 125;
pub const SCHEMA_VER: &str = "1.0";

fn default_ver() -> String {
    SCHEMA_VER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub id: SchemaId,
    pub name: String,
    pub version: String,
    pub attr_names: AttributeNames,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<u32>,
    #[serde(default = "default_ver")]
    pub ver: String,
}

impl Schema {
    pub fn new(origin_did: &str, name: &str, version: &str, attr_names: AttributeNames) -> Self {
        Self {
            id: SchemaId::new_legacy(origin_did, name, version),
            name: name.to_string(),
            version: version.to_string(),
            attr_names,
            seq_no: None,
            ver: default_ver(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AttributeNames(pub Vec<String>);

impl AttributeNames {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|attr| attr == name)
    }
}

impl From<&[&str]> for AttributeNames {
    fn from(attrs: &[&str]) -> Self {
        Self(attrs.iter().map(|s| String::from(*s)).collect())
    }
}

impl From<Vec<String>> for AttributeNames {
    fn from(attrs: Vec<String>) -> Self {
        Self(attrs)
    }
}

impl From<HashSet<String>> for AttributeNames {
    fn from(attrs: HashSet<String>) -> Self {
        Self(attrs.into_iter().collect())
    }
}

impl From<AttributeNames> for Vec<String> {
    fn from(a: AttributeNames) -> Self {
        a.0
    }
}

impl Validatable for Schema {
    fn validate(&self) -> LedgerTypesResult<()> {
        self.id.validate()?;
        self.attr_names.validate()
    }
}

impl Validatable for AttributeNames {
    fn validate(&self) -> LedgerTypesResult<()> {
        let mut unique = HashSet::new();
        if !self.0.iter().all(|name| unique.insert(name)) {
            return Err(LedgerTypesError::InvalidAttributes(
                "Attributes inside the schema must be unique".into(),
            ));
        }
        if self.0.is_empty() {
            return Err(LedgerTypesError::InvalidAttributes(
                "Empty list of Schema attributes has been passed".into(),
            ));
        }
        if self.0.iter().any(|name| name.trim().is_empty()) {
            return Err(LedgerTypesError::InvalidAttributes(
                "Schema attribute names must not be empty".into(),
            ));
        }
        if self.0.len() > MAX_ATTRIBUTES_COUNT {
            return Err(LedgerTypesError::InvalidAttributes(format!(
                "The number of Schema attributes {} cannot be greater than {}",
                self.0.len(),
                MAX_ATTRIBUTES_COUNT
            )));
        }
        Ok(())
    }
}
