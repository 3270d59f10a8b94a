//! Issuer capability: builds the schema and credential definition objects that
//! the ledgers publish. The cryptography behind them stays with the issuer.
use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use ledger_types::{
    ledger::{cred_def::CredentialDefinition, schema::Schema},
    templates::{CredentialDefinitionTemplate, SchemaTemplate},
};

use crate::errors::error::LedgerResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BaseIssuer: Debug + Send + Sync {
    async fn create_schema(
        &self,
        origin_did: &str,
        template: &SchemaTemplate,
    ) -> LedgerResult<Schema>;

    async fn create_credential_definition(
        &self,
        issuer_did: &str,
        template: &CredentialDefinitionTemplate,
    ) -> LedgerResult<CredentialDefinition>;
}

#[async_trait]
impl<T> BaseIssuer for Arc<T>
where
    T: BaseIssuer + ?Sized,
{
    async fn create_schema(
        &self,
        origin_did: &str,
        template: &SchemaTemplate,
    ) -> LedgerResult<Schema> {
        self.as_ref().create_schema(origin_did, template).await
    }

    async fn create_credential_definition(
        &self,
        issuer_did: &str,
        template: &CredentialDefinitionTemplate,
    ) -> LedgerResult<CredentialDefinition> {
        self.as_ref()
            .create_credential_definition(issuer_did, template)
            .await
    }
}
