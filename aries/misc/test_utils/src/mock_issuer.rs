use aries_ledger_gateway::{
    errors::error::{LedgerError, LedgerResult},
    issuer::BaseIssuer,
    ledger_types::{
        identifiers::{cred_def_id::CredentialDefinitionId, schema_id::SchemaId},
        ledger::{
            cred_def::{CredentialDefinition, CredentialDefinitionData},
            schema::{Schema, SCHEMA_VER},
        },
        templates::{CredentialDefinitionTemplate, SchemaTemplate},
    },
};
use async_trait::async_trait;
use serde_json::json;

/// Issuer producing deterministic, structurally valid placeholder key material.
#[derive(Debug, Default)]
pub struct MockIssuer;

#[async_trait]
impl BaseIssuer for MockIssuer {
    async fn create_schema(
        &self,
        origin_did: &str,
        template: &SchemaTemplate,
    ) -> LedgerResult<Schema> {
        Ok(Schema::new(
            origin_did,
            &template.name,
            &template.version,
            template.attributes.clone().into(),
        ))
    }

    async fn create_credential_definition(
        &self,
        issuer_did: &str,
        template: &CredentialDefinitionTemplate,
    ) -> LedgerResult<CredentialDefinition> {
        let seq_no = template.schema.seq_no.ok_or_else(|| {
            LedgerError::Issuer(format!("schema {} is not published", template.schema.id))
        })?;
        let schema_ref = seq_no.to_string();
        let attributes: serde_json::Map<String, serde_json::Value> = template
            .schema
            .attr_names
            .0
            .iter()
            .map(|attr| (attr.clone(), json!("1")))
            .collect();
        let revocation = template.support_revocation.then(|| {
            json!({
                "g": "1 1F14F1 2 095E45DD",
                "g_dash": "1 1D64716F 1 1C7CC1B0",
                "h": "1 16675DAE 2 095E45DD",
                "pk": "1 142CD5E5 2 095E45DD",
                "y": "1 153558BD 1 1D3F3E65"
            })
        });
        Ok(CredentialDefinition {
            id: CredentialDefinitionId::new_legacy(
                issuer_did,
                template.signature_type.as_str(),
                &schema_ref,
                &template.tag,
            ),
            schema_id: SchemaId::new_unchecked(schema_ref),
            signature_type: template.signature_type,
            tag: template.tag.clone(),
            value: CredentialDefinitionData {
                primary: json!({
                    "n": "779...397",
                    "r": attributes,
                    "rctxt": "774...977",
                    "s": "750..893",
                    "z": "632...005"
                }),
                revocation,
            },
            ver: SCHEMA_VER.to_string(),
        })
    }
}
