use typed_builder::TypedBuilder;

use crate::ledger::{cred_def::SignatureType, schema::Schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct SchemaTemplate {
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into))]
    pub version: String,
    pub attributes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDefinitionTemplate {
    pub schema: Schema,
    #[builder(setter(into))]
    pub tag: String,
    #[builder(default)]
    pub signature_type: SignatureType,
    #[builder(default)]
    pub support_revocation: bool,
}
