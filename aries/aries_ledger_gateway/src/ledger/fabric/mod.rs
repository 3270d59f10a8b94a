//! Smart-contract backend: ledger requests are built and signed as indy
//! requests, then carried to the chaincode through a Fabric gateway.
//!
//! The chaincode answers `ReadTransaction` with the record in the JSON
//! shape of the `ledger_types` models: the nym operation (`dest`, `verkey`,
//! `role`) for DIDs, a [`Schema`] for schemas and a [`CredentialDefinition`]
//! for credential definitions.
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

use async_trait::async_trait;
use indy_vdr::{
    ledger::RequestBuilder,
    pool::{PreparedRequest, ProtocolVersion},
};
use ledger_types::{
    ledger::{cred_def::CredentialDefinition, nym::NymRecord, schema::Schema},
    templates::{CredentialDefinitionTemplate, SchemaTemplate},
    Validatable,
};
use log::{debug, info};
use serde::Deserialize;

use self::{
    ca_client::CaClientFactory, client::GatewayClient, envelope::OperationKind,
    gateway::Gateway, identity::IdentityStore,
};
use super::{
    base_ledger::{PublicLedger, UpdateRole},
    request_signer::RequestSigner,
    type_conversion::Convert,
};
use crate::{
    errors::error::{LedgerError, LedgerResult},
    issuer::BaseIssuer,
};

pub mod ca_client;
pub mod client;
pub mod config;
pub mod connection_profile;
pub mod enrollment;
pub mod envelope;
pub mod gateway;
pub mod identity;

/// Sequence number reported for schemas written through the chaincode, which
/// does not order transactions the way a token ledger does.
pub const SMART_CONTRACT_SCHEMA_SEQ_NO: u32 = 0;

const DID_PREFIX: &str = "did:";

#[derive(Deserialize)]
struct NymOperation {
    dest: String,
    #[serde(default)]
    verkey: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl From<NymOperation> for NymRecord {
    fn from(nym: NymOperation) -> Self {
        Self {
            did: nym.dest,
            verkey: nym.verkey,
            role: nym.role,
        }
    }
}

pub struct FabricLedger<G, F, S, R, I>
where
    G: Gateway,
    F: CaClientFactory,
    S: IdentityStore,
    R: RequestSigner,
    I: BaseIssuer,
{
    client: Arc<GatewayClient<G, F, S>>,
    signer: R,
    issuer: I,
    protocol_version: ProtocolVersion,
}

impl<G, F, S, R, I> FabricLedger<G, F, S, R, I>
where
    G: Gateway,
    F: CaClientFactory,
    S: IdentityStore,
    R: RequestSigner,
    I: BaseIssuer,
{
    pub fn new(client: Arc<GatewayClient<G, F, S>>, signer: R, issuer: I) -> Self {
        Self {
            client,
            signer,
            issuer,
            protocol_version: ProtocolVersion::Node1_4,
        }
    }

    pub fn client(&self) -> &GatewayClient<G, F, S> {
        &self.client
    }

    fn request_builder(&self) -> RequestBuilder {
        RequestBuilder::new(self.protocol_version)
    }

    async fn sign_and_submit(
        &self,
        operation: OperationKind,
        submitter_did: &str,
        request: PreparedRequest,
    ) -> LedgerResult<Vec<u8>> {
        // preconditions are checked before the wallet is asked to sign
        self.client.configuration()?;
        if !self.client.is_connected() {
            return Err(LedgerError::GatewayNotConnected);
        }
        let signed_request = self.signer.sign(submitter_did, request).await?;
        self.client.submit_write(operation, &signed_request).await
    }

    /// Nyms are stored under their network-scoped id; ids already in that
    /// form are used as given.
    fn nym_key(&self, did: &str) -> LedgerResult<String> {
        if did.starts_with(DID_PREFIX) {
            Ok(did.to_string())
        } else {
            self.client.network_scoped_did(did)
        }
    }
}

impl<G, F, S, R, I> Debug for FabricLedger<G, F, S, R, I>
where
    G: Gateway,
    F: CaClientFactory,
    S: IdentityStore,
    R: RequestSigner,
    I: BaseIssuer,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FabricLedger instance")
    }
}

#[async_trait]
impl<G, F, S, R, I> PublicLedger for FabricLedger<G, F, S, R, I>
where
    G: Gateway,
    F: CaClientFactory,
    S: IdentityStore,
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
        self.sign_and_submit(OperationKind::Nym, submitter_did, request)
            .await?;
        info!("Registered DID {target_did} on the smart-contract ledger");
        Ok(target_did.to_string())
    }

    async fn get_public_did(&self, did: &str) -> LedgerResult<NymRecord> {
        debug!("get_public_did >> did: {did}");
        let key = self.nym_key(did)?;
        let nym: NymOperation = self.client.read_record(OperationKind::Nym, &key).await?;
        let record = NymRecord::from(nym);
        debug!("get_public_did << {record:?}");
        Ok(record)
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
        self.sign_and_submit(OperationKind::Schema, submitter_did, request)
            .await?;
        let schema = Schema {
            seq_no: Some(SMART_CONTRACT_SCHEMA_SEQ_NO),
            ..schema
        };
        info!("Registered schema {} on the smart-contract ledger", schema.id);
        Ok(schema)
    }

    async fn get_schema(&self, schema_id: &str) -> LedgerResult<Schema> {
        debug!("get_schema >> schema_id: {schema_id}");
        let schema: Schema = self
            .client
            .read_record(OperationKind::Schema, schema_id)
            .await?;
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
        self.sign_and_submit(OperationKind::CredentialDefinition, submitter_did, request)
            .await?;
        info!(
            "Registered credential definition {} on the smart-contract ledger",
            cred_def.id
        );
        Ok(cred_def)
    }

    async fn get_credential_definition(
        &self,
        cred_def_id: &str,
    ) -> LedgerResult<CredentialDefinition> {
        debug!("get_credential_definition >> cred_def_id: {cred_def_id}");
        let cred_def: CredentialDefinition = self
            .client
            .read_record(OperationKind::CredentialDefinition, cred_def_id)
            .await?;
        debug!("get_credential_definition << {}", cred_def.id);
        Ok(cred_def)
    }
}
