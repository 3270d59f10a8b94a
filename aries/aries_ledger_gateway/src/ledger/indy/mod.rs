use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use indy_vdr::{
    ledger::{
        identifiers::{
            CredentialDefinitionId as IndyVdrCredentialDefinitionId, SchemaId as IndyVdrSchemaId,
        },
        RequestBuilder,
    },
    pool::{PreparedRequest, ProtocolVersion},
    utils::Qualifiable,
};
use ledger_types::{
    ledger::{cred_def::CredentialDefinition, nym::NymRecord, schema::Schema},
    templates::{CredentialDefinitionTemplate, SchemaTemplate},
    Validatable,
};
use log::{debug, trace};

use super::{
    base_ledger::{PublicLedger, UpdateRole},
    request_signer::RequestSigner,
    request_submitter::RequestSubmitter,
    type_conversion::Convert,
};
use crate::{
    errors::error::{LedgerError, LedgerResult},
    issuer::BaseIssuer,
};

pub mod response;

/// Token-ledger backend: requests are signed by the submitter and sent
/// directly to the validator pool.
pub struct IndyVdrLedger<T, R, I>
where
    T: RequestSubmitter,
    R: RequestSigner,
    I: BaseIssuer,
{
    request_submitter: T,
    signer: R,
    issuer: I,
    protocol_version: ProtocolVersion,
}

impl<T, R, I> IndyVdrLedger<T, R, I>
where
    T: RequestSubmitter,
    R: RequestSigner,
    I: BaseIssuer,
{
    pub fn new(request_submitter: T, signer: R, issuer: I) -> Self {
        Self {
            request_submitter,
            signer,
            issuer,
            protocol_version: ProtocolVersion::Node1_4,
        }
    }

    pub fn with_protocol_version(self, protocol_version: ProtocolVersion) -> Self {
        Self {
            protocol_version,
            ..self
        }
    }

    fn request_builder(&self) -> RequestBuilder {
        RequestBuilder::new(self.protocol_version)
    }

    async fn submit_request(&self, request: PreparedRequest) -> LedgerResult<String> {
        trace!("submit_request >> {}", request.req_json);
        let response = self.request_submitter.submit(request).await?;
        trace!("submit_request << {response}");
        Ok(response)
    }

    async fn sign_and_submit_request(
        &self,
        submitter_did: &str,
        request: PreparedRequest,
    ) -> LedgerResult<u32> {
        let signed_request = self.signer.sign(submitter_did, request).await?;
        let response = self
            .submit_request(signed_request.into_prepared_request())
            .await?;
        response::parse_write_response(&response)
    }
}

impl<T, R, I> Debug for IndyVdrLedger<T, R, I>
where
    T: RequestSubmitter,
    R: RequestSigner,
    I: BaseIssuer,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "IndyVdrLedger instance")
    }
}

#[async_trait]
impl<T, R, I> PublicLedger for IndyVdrLedger<T, R, I>
where
    T: RequestSubmitter,
    R: RequestSigner,
    I: BaseIssuer,
{
    async fn register_public_did(
        &self,
        submitter_did: &str,
        target_did: &str,
        verkey: &str,
        alias: Option<String>,
        role: Option<UpdateRole>,
    ) -> LedgerResult<String> {
        debug!(
            "register_public_did >> submitter_did: {submitter_did}, target_did: {target_did}, \
             verkey: {verkey}, alias: {alias:?}, role: {role:?}"
        );
        let request = self.request_builder().build_nym_request(
            &submitter_did.convert(())?,
            &target_did.convert(())?,
            Some(verkey.to_string()),
            alias,
            role,
            None,
            None,
        )?;
        let seq_no = self.sign_and_submit_request(submitter_did, request).await?;
        debug!("register_public_did << seq_no: {seq_no}");
        Ok(target_did.to_string())
    }

    async fn get_public_did(&self, did: &str) -> LedgerResult<NymRecord> {
        debug!("get_public_did >> did: {did}");
        let request = self
            .request_builder()
            .build_get_nym_request(None, &did.convert(())?, None, None)?;
        let response = self.submit_request(request).await?;
        let nym = response::parse_get_nym_response(&response)?;
        debug!("get_public_did << {nym:?}");
        Ok(nym)
    }

    async fn register_schema(
        &self,
        submitter_did: &str,
        template: &SchemaTemplate,
    ) -> LedgerResult<Schema> {
        debug!("register_schema >> submitter_did: {submitter_did}, template: {template:?}");
        let schema = self.issuer.create_schema(submitter_did, template).await?;
        schema.validate()?;
        let request = self
            .request_builder()
            .build_schema_request(&submitter_did.convert(())?, (&schema).convert(())?)?;
        let seq_no = self.sign_and_submit_request(submitter_did, request).await?;
        debug!("register_schema << {} seq_no: {seq_no}", schema.id);
        Ok(Schema {
            seq_no: Some(seq_no),
            ..schema
        })
    }

    async fn get_schema(&self, schema_id: &str) -> LedgerResult<Schema> {
        debug!("get_schema >> schema_id: {schema_id}");
        let request = self
            .request_builder()
            .build_get_schema_request(None, &IndyVdrSchemaId::from_str(schema_id)?)?;
        let response = self.submit_request(request).await?;
        let schema = response::parse_get_schema_response(&response)?;
        debug!("get_schema << {schema:?}");
        Ok(schema)
    }

    async fn register_credential_definition(
        &self,
        submitter_did: &str,
        template: &CredentialDefinitionTemplate,
    ) -> LedgerResult<CredentialDefinition> {
        debug!(
            "register_credential_definition >> submitter_did: {submitter_did}, schema: {}, tag: \
             {}",
            template.schema.id, template.tag
        );
        if template.schema.seq_no.is_none() {
            return Err(LedgerError::InvalidInput(format!(
                "schema {} has no sequence number, publish it first",
                template.schema.id
            )));
        }
        let cred_def = self
            .issuer
            .create_credential_definition(submitter_did, template)
            .await?;
        cred_def.validate()?;
        let request = self
            .request_builder()
            .build_cred_def_request(&submitter_did.convert(())?, (&cred_def).convert(())?)?;
        let seq_no = self.sign_and_submit_request(submitter_did, request).await?;
        debug!("register_credential_definition << {} seq_no: {seq_no}", cred_def.id);
        Ok(cred_def)
    }

    async fn get_credential_definition(
        &self,
        cred_def_id: &str,
    ) -> LedgerResult<CredentialDefinition> {
        debug!("get_credential_definition >> cred_def_id: {cred_def_id}");
        let id = IndyVdrCredentialDefinitionId::from_str(cred_def_id)?;
        let request = self
            .request_builder()
            .build_get_cred_def_request(None, &id)?;
        let response = self.submit_request(request).await?;
        let cred_def = response::parse_get_cred_def_response(&response)?;
        debug!("get_credential_definition << {}", cred_def.id);
        Ok(cred_def)
    }
}

#[cfg(test)]
mod tests {
    use ledger_types::{
        identifiers::{cred_def_id::CredentialDefinitionId, schema_id::SchemaId},
        ledger::cred_def::{CredentialDefinitionData, SignatureType},
    };
    use serde_json::json;

    use super::*;
    use crate::{
        issuer::MockBaseIssuer,
        ledger::{
            base_ledger::LedgerRole, request_signer::WalletRequestSigner,
            request_submitter::MockRequestSubmitter,
        },
        wallet::MockSigningWallet,
    };

    const SUBMITTER_DID: &str = "V4SGRU86Z58d6TV7PBUe6f";

    fn signing_wallet() -> MockSigningWallet {
        let mut wallet = MockSigningWallet::new();
        wallet
            .expect_sign()
            .returning(|_, msg| Ok(msg.iter().rev().cloned().collect()));
        wallet
    }

    fn write_reply(seq_no: u32) -> String {
        json!({
            "op": "REPLY",
            "result": { "txn": {}, "txnMetadata": { "seqNo": seq_no } }
        })
        .to_string()
    }

    fn ledger(
        submitter: MockRequestSubmitter,
        issuer: MockBaseIssuer,
    ) -> IndyVdrLedger<MockRequestSubmitter, WalletRequestSigner<MockSigningWallet>, MockBaseIssuer>
    {
        IndyVdrLedger::new(submitter, WalletRequestSigner::new(signing_wallet()), issuer)
    }

    fn schema() -> Schema {
        Schema::new(
            SUBMITTER_DID,
            "test-schema",
            "1.0",
            vec!["name".to_string(), "age".to_string()].into(),
        )
    }

    #[tokio::test]
    async fn test_register_public_did_submits_signed_nym() {
        let mut submitter = MockRequestSubmitter::new();
        submitter
            .expect_submit()
            .withf(|request| {
                request.req_json["operation"]["dest"] == "TL1EaPFCZ8Si5aUrqScBDt"
                    && request.req_json["operation"]["role"] == "101"
                    && request.req_json["signature"].is_string()
            })
            .times(1)
            .returning(|_| Ok(write_reply(7)));
        let ledger = ledger(submitter, MockBaseIssuer::new());

        let did = ledger
            .register_public_did(
                SUBMITTER_DID,
                "TL1EaPFCZ8Si5aUrqScBDt",
                "~43X4NhAFqREffK7eWdKgFH",
                Some("alias".into()),
                Some(UpdateRole::Set(LedgerRole::Endorser)),
            )
            .await
            .unwrap();

        assert_eq!(did, "TL1EaPFCZ8Si5aUrqScBDt");
    }

    #[tokio::test]
    async fn test_register_schema_reports_ledger_seq_no() {
        let mut issuer = MockBaseIssuer::new();
        issuer.expect_create_schema().returning(|_, _| Ok(schema()));
        let mut submitter = MockRequestSubmitter::new();
        submitter
            .expect_submit()
            .withf(|request| request.req_json["operation"]["type"] == "101")
            .times(1)
            .returning(|_| Ok(write_reply(1234)));
        let ledger = ledger(submitter, issuer);
        let template = SchemaTemplate::builder()
            .name("test-schema")
            .version("1.0")
            .attributes(vec!["name".into(), "age".into()])
            .build();

        let schema = ledger.register_schema(SUBMITTER_DID, &template).await.unwrap();

        assert_eq!(schema.seq_no, Some(1234));
        assert_eq!(schema.id.to_string(), "V4SGRU86Z58d6TV7PBUe6f:2:test-schema:1.0");
    }

    #[tokio::test]
    async fn test_register_schema_with_duplicate_attributes_is_not_submitted() {
        let mut issuer = MockBaseIssuer::new();
        issuer.expect_create_schema().returning(|_, _| {
            Ok(Schema::new(
                SUBMITTER_DID,
                "test-schema",
                "1.0",
                vec!["age".to_string(), "age".to_string()].into(),
            ))
        });
        let mut submitter = MockRequestSubmitter::new();
        submitter.expect_submit().never();
        let ledger = ledger(submitter, issuer);
        let template = SchemaTemplate::builder()
            .name("test-schema")
            .version("1.0")
            .attributes(vec!["age".into(), "age".into()])
            .build();

        let err = ledger
            .register_schema(SUBMITTER_DID, &template)
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidLedgerType(_)));
    }

    #[tokio::test]
    async fn test_rejected_write_propagates() {
        let mut submitter = MockRequestSubmitter::new();
        submitter.expect_submit().returning(|_| {
            Ok(json!({ "op": "REJECT", "reason": "client request invalid" }).to_string())
        });
        let ledger = ledger(submitter, MockBaseIssuer::new());

        let err = ledger
            .register_public_did(
                SUBMITTER_DID,
                "TL1EaPFCZ8Si5aUrqScBDt",
                "~43X4NhAFqREffK7eWdKgFH",
                None,
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidLedgerResponse(_)));
    }

    #[tokio::test]
    async fn test_get_public_did() {
        let mut submitter = MockRequestSubmitter::new();
        submitter
            .expect_submit()
            .withf(|request| request.req_json["operation"]["type"] == "105")
            .returning(|_| {
                let data = json!({ "dest": "TL1EaPFCZ8Si5aUrqScBDt", "role": "101", "verkey": null });
                Ok(json!({ "op": "REPLY", "result": { "data": data.to_string() } }).to_string())
            });
        let ledger = ledger(submitter, MockBaseIssuer::new());

        let nym = ledger.get_public_did("TL1EaPFCZ8Si5aUrqScBDt").await.unwrap();

        assert_eq!(nym.role.as_deref(), Some("101"));
        assert_eq!(nym.verkey, None);
    }

    #[tokio::test]
    async fn test_get_schema() {
        let mut submitter = MockRequestSubmitter::new();
        submitter.expect_submit().returning(|_| {
            Ok(json!({
                "op": "REPLY",
                "result": {
                    "dest": SUBMITTER_DID,
                    "seqNo": 1234,
                    "data": { "name": "test-schema", "version": "1.0", "attr_names": ["name", "age"] }
                }
            })
            .to_string())
        });
        let ledger = ledger(submitter, MockBaseIssuer::new());

        let schema = ledger
            .get_schema("V4SGRU86Z58d6TV7PBUe6f:2:test-schema:1.0")
            .await
            .unwrap();

        assert_eq!(schema.seq_no, Some(1234));
        assert_eq!(schema.name, "test-schema");
    }

    #[tokio::test]
    async fn test_register_cred_def_requires_published_schema() {
        let mut issuer = MockBaseIssuer::new();
        issuer.expect_create_credential_definition().never();
        let mut submitter = MockRequestSubmitter::new();
        submitter.expect_submit().never();
        let ledger = ledger(submitter, issuer);
        let template = CredentialDefinitionTemplate::builder()
            .schema(schema())
            .tag("TAG")
            .build();

        let err = ledger
            .register_credential_definition(SUBMITTER_DID, &template)
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_register_cred_def() {
        let mut issuer = MockBaseIssuer::new();
        issuer
            .expect_create_credential_definition()
            .returning(|did, template| {
                let schema_ref = template.schema.seq_no.unwrap_or_default().to_string();
                Ok(CredentialDefinition {
                    id: CredentialDefinitionId::new_legacy(did, "CL", &schema_ref, &template.tag),
                    schema_id: SchemaId::new_unchecked(schema_ref),
                    signature_type: SignatureType::CL,
                    tag: template.tag.clone(),
                    value: CredentialDefinitionData {
                        primary: json!({ "n": "1" }),
                        revocation: None,
                    },
                    ver: "1.0".into(),
                })
            });
        let mut submitter = MockRequestSubmitter::new();
        submitter
            .expect_submit()
            .withf(|request| {
                request.req_json["operation"]["type"] == "102"
                    && request.req_json["operation"]["ref"] == 1234
            })
            .times(1)
            .returning(|_| Ok(write_reply(1235)));
        let ledger = ledger(submitter, issuer);
        let template = CredentialDefinitionTemplate::builder()
            .schema(Schema {
                seq_no: Some(1234),
                ..schema()
            })
            .tag("TAG")
            .build();

        let cred_def = ledger
            .register_credential_definition(SUBMITTER_DID, &template)
            .await
            .unwrap();

        assert_eq!(cred_def.id.to_string(), "V4SGRU86Z58d6TV7PBUe6f:3:CL:1234:TAG");
        assert!(!cred_def.supports_revocation());
    }
}
