use std::fmt::Debug;

use ledger_types::{
    ledger::{cred_def::CredentialDefinition, nym::NymRecord, schema::Schema},
    templates::{CredentialDefinitionTemplate, SchemaTemplate},
};
use log::{debug, warn};

use super::{
    base_ledger::{PublicLedger, UpdateRole},
    ledger_kind::LedgerBackendKind,
};
use crate::errors::error::{LedgerError, LedgerResult};

/// Single entry point for DID, schema and credential definition operations,
/// dispatching each call to the backend named by its [`LedgerBackendKind`].
/// Writes are submitted as the agent's public DID.
#[derive(Debug)]
pub struct LedgerRouter<T, S>
where
    T: PublicLedger,
    S: PublicLedger,
{
    public_did: String,
    token_ledger: T,
    smart_contract_ledger: S,
}

fn backend_failure(
    operation: &'static str,
    kind: LedgerBackendKind,
) -> impl FnOnce(LedgerError) -> LedgerError {
    move |err| {
        warn!("{operation} << {kind} ledger failed: {err}");
        LedgerError::backend_failure(kind, operation, err)
    }
}

impl<T, S> LedgerRouter<T, S>
where
    T: PublicLedger,
    S: PublicLedger,
{
    pub fn new(public_did: impl Into<String>, token_ledger: T, smart_contract_ledger: S) -> Self {
        Self {
            public_did: public_did.into(),
            token_ledger,
            smart_contract_ledger,
        }
    }

    pub fn public_did(&self) -> &str {
        &self.public_did
    }

    pub fn backend(&self, kind: LedgerBackendKind) -> &dyn PublicLedger {
        match kind {
            LedgerBackendKind::TokenLedger => &self.token_ledger,
            LedgerBackendKind::SmartContractLedger => &self.smart_contract_ledger,
        }
    }

    pub async fn register_public_did(
        &self,
        did: &str,
        verkey: &str,
        alias: Option<String>,
        kind: LedgerBackendKind,
        role: Option<UpdateRole>,
    ) -> LedgerResult<String> {
        debug!("register_public_did >> did: {did}, ledger: {kind}");
        self.backend(kind)
            .register_public_did(&self.public_did, did, verkey, alias, role)
            .await
            .map_err(backend_failure("register_public_did", kind))
    }

    pub async fn get_public_did(&self, did: &str, kind: LedgerBackendKind) -> LedgerResult<NymRecord> {
        debug!("get_public_did >> did: {did}, ledger: {kind}");
        self.backend(kind)
            .get_public_did(did)
            .await
            .map_err(backend_failure("get_public_did", kind))
    }

    pub async fn register_schema(
        &self,
        template: &SchemaTemplate,
        kind: LedgerBackendKind,
    ) -> LedgerResult<Schema> {
        debug!(
            "register_schema >> name: {}, version: {}, ledger: {kind}",
            template.name, template.version
        );
        self.backend(kind)
            .register_schema(&self.public_did, template)
            .await
            .map_err(backend_failure("register_schema", kind))
    }

    pub async fn get_schema(&self, schema_id: &str, kind: LedgerBackendKind) -> LedgerResult<Schema> {
        debug!("get_schema >> schema_id: {schema_id}, ledger: {kind}");
        self.backend(kind)
            .get_schema(schema_id)
            .await
            .map_err(backend_failure("get_schema", kind))
    }

    pub async fn register_credential_definition(
        &self,
        template: &CredentialDefinitionTemplate,
        kind: LedgerBackendKind,
    ) -> LedgerResult<CredentialDefinition> {
        debug!(
            "register_credential_definition >> schema: {}, tag: {}, ledger: {kind}",
            template.schema.id, template.tag
        );
        self.backend(kind)
            .register_credential_definition(&self.public_did, template)
            .await
            .map_err(backend_failure("register_credential_definition", kind))
    }

    pub async fn get_credential_definition(
        &self,
        cred_def_id: &str,
        kind: LedgerBackendKind,
    ) -> LedgerResult<CredentialDefinition> {
        debug!("get_credential_definition >> cred_def_id: {cred_def_id}, ledger: {kind}");
        self.backend(kind)
            .get_credential_definition(cred_def_id)
            .await
            .map_err(backend_failure("get_credential_definition", kind))
    }
}
