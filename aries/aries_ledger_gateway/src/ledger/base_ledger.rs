use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
pub use indy_vdr::ledger::constants::{LedgerRole, UpdateRole};
use ledger_types::{
    ledger::{cred_def::CredentialDefinition, nym::NymRecord, schema::Schema},
    templates::{CredentialDefinitionTemplate, SchemaTemplate},
};

use crate::errors::error::LedgerResult;

/// Operations every ledger backend offers to the router. The submitter DID is
/// the agent's public DID; the router supplies it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicLedger: Debug + Send + Sync {
    async fn register_public_did(
        &self,
        submitter_did: &str,
        target_did: &str,
        verkey: &str,
        alias: Option<String>,
        role: Option<UpdateRole>,
    ) -> LedgerResult<String>;

    async fn get_public_did(&self, did: &str) -> LedgerResult<NymRecord>;

    async fn register_schema(
        &self,
        submitter_did: &str,
        template: &SchemaTemplate,
    ) -> LedgerResult<Schema>;

    async fn get_schema(&self, schema_id: &str) -> LedgerResult<Schema>;

    async fn register_credential_definition(
        &self,
        submitter_did: &str,
        template: &CredentialDefinitionTemplate,
    ) -> LedgerResult<CredentialDefinition>;

    async fn get_credential_definition(
        &self,
        cred_def_id: &str,
    ) -> LedgerResult<CredentialDefinition>;
}

#[async_trait]
impl<T> PublicLedger for Arc<T>
where
    T: PublicLedger + ?Sized,
{
    async fn register_public_did(
        &self,
        submitter_did: &str,
        target_did: &str,
        verkey: &str,
        alias: Option<String>,
        role: Option<UpdateRole>,
    ) -> LedgerResult<String> {
        self.as_ref()
            .register_public_did(submitter_did, target_did, verkey, alias, role)
            .await
    }

    async fn get_public_did(&self, did: &str) -> LedgerResult<NymRecord> {
        self.as_ref().get_public_did(did).await
    }

    async fn register_schema(
        &self,
        submitter_did: &str,
        template: &SchemaTemplate,
    ) -> LedgerResult<Schema> {
        self.as_ref().register_schema(submitter_did, template).await
    }

    async fn get_schema(&self, schema_id: &str) -> LedgerResult<Schema> {
        self.as_ref().get_schema(schema_id).await
    }

    async fn register_credential_definition(
        &self,
        submitter_did: &str,
        template: &CredentialDefinitionTemplate,
    ) -> LedgerResult<CredentialDefinition> {
        self.as_ref()
            .register_credential_definition(submitter_did, template)
            .await
    }

    async fn get_credential_definition(
        &self,
        cred_def_id: &str,
    ) -> LedgerResult<CredentialDefinition> {
        self.as_ref().get_credential_definition(cred_def_id).await
    }
}
