use indy_vdr::{
    ledger::{
        identifiers::{
            CredentialDefinitionId as IndyVdrCredentialDefinitionId, SchemaId as IndyVdrSchemaId,
        },
        requests::{
            cred_def::{
                CredentialDefinition as IndyVdrCredentialDefinition, CredentialDefinitionData,
                CredentialDefinitionV1, SignatureType as IndyVdrSignatureType,
            },
            schema::{AttributeNames as IndyVdrAttributeNames, Schema as IndyVdrSchema, SchemaV1},
        },
    },
    utils::did::DidValue,
};
use ledger_types::ledger::{
    cred_def::{CredentialDefinition as OurCredentialDefinition, SignatureType as OurSignatureType},
    schema::Schema as OurSchema,
};

use crate::errors::error::{LedgerError, LedgerResult};

pub trait Convert {
    type Args;
    type Target;

    fn convert(self, args: Self::Args) -> LedgerResult<Self::Target>;
}

impl Convert for &OurSchema {
    type Args = ();
    type Target = IndyVdrSchema;

    fn convert(self, (): ()) -> LedgerResult<Self::Target> {
        let (issuer_did, _, _) = self.id.parts().ok_or_else(|| {
            LedgerError::InvalidInput(format!(
                "schema id {} is not a legacy identifier, cannot convert",
                self.id
            ))
        })?;
        Ok(IndyVdrSchema::SchemaV1(SchemaV1 {
            id: IndyVdrSchemaId::new(&DidValue::new(issuer_did, None), &self.name, &self.version),
            name: self.name.clone(),
            attr_names: IndyVdrAttributeNames(self.attr_names.0.iter().cloned().collect()),
            version: self.version.clone(),
            seq_no: self.seq_no,
        }))
    }
}

impl Convert for &OurCredentialDefinition {
    type Args = ();
    type Target = IndyVdrCredentialDefinition;

    fn convert(self, (): ()) -> LedgerResult<Self::Target> {
        Ok(IndyVdrCredentialDefinition::CredentialDefinitionV1(
            CredentialDefinitionV1 {
                id: IndyVdrCredentialDefinitionId::from(self.id.to_string()),
                schema_id: IndyVdrSchemaId::from(self.schema_id.to_string()),
                signature_type: match self.signature_type {
                    OurSignatureType::CL => IndyVdrSignatureType::CL,
                },
                tag: self.tag.clone(),
                value: CredentialDefinitionData {
                    primary: self.value.primary.clone(),
                    revocation: self.value.revocation.clone(),
                },
            },
        ))
    }
}

impl Convert for &str {
    type Args = ();
    type Target = DidValue;

    fn convert(self, (): ()) -> LedgerResult<Self::Target> {
        if self.is_empty() {
            return Err(LedgerError::InvalidInput("DID must not be empty".into()));
        }
        Ok(DidValue::new(self, None))
    }
}
