use std::{
    fmt::Debug,
    sync::{Arc, OnceLock, RwLock},
};

use log::{debug, info, trace, warn};
use serde::de::DeserializeOwned;

use super::{
    ca_client::{CaClientFactory, TimeoutCaClient},
    config::{GatewayConfiguration, GatewaySettings, REQUIRED_SETTINGS},
    connection_profile::ConnectionProfile,
    enrollment::{enroll_admin, register_and_enroll_user},
    envelope::{ChaincodeFunction, OperationKind, TransactionEnvelope},
    gateway::{ChaincodeContract, Gateway, GatewayOptions, GatewaySession, SessionGuard},
    identity::IdentityStore,
};
use crate::{
    errors::error::{LedgerError, LedgerResult},
    ledger::request_signer::SignedRequest,
};

/// Profile and gateway options established by [`GatewayClient::connect_to_network`].
#[derive(Debug)]
struct NetworkConnection {
    profile: ConnectionProfile,
    options: GatewayOptions,
}

/// Client of a Fabric network. Configuration is set once; every submit or
/// read opens its own gateway session and closes it before returning.
#[derive(Debug)]
pub struct GatewayClient<G, F, S>
where
    G: Gateway,
    F: CaClientFactory,
    S: IdentityStore,
{
    gateway: G,
    ca_client_factory: F,
    identity_store: S,
    configuration: OnceLock<GatewayConfiguration>,
    connection: RwLock<Option<Arc<NetworkConnection>>>,
}

impl<G, F, S> GatewayClient<G, F, S>
where
    G: Gateway,
    F: CaClientFactory,
    S: IdentityStore,
{
    pub fn new(gateway: G, ca_client_factory: F, identity_store: S) -> Self {
        Self {
            gateway,
            ca_client_factory,
            identity_store,
            configuration: OnceLock::new(),
            connection: RwLock::new(None),
        }
    }

    pub fn identity_store(&self) -> &S {
        &self.identity_store
    }

    pub fn initialize(&self, settings: GatewaySettings) -> LedgerResult<()> {
        if self.configuration.get().is_some() {
            return Err(LedgerError::InvalidState(
                "Gateway client is already initialized".to_string(),
            ));
        }
        let configuration = settings.validate()?;
        debug!("initialize >> {configuration:?}");
        self.configuration.set(configuration).map_err(|_| {
            LedgerError::InvalidState("Gateway client is already initialized".to_string())
        })
    }

    pub fn configuration(&self) -> LedgerResult<&GatewayConfiguration> {
        self.configuration
            .get()
            .ok_or_else(|| LedgerError::ConfigurationMissing(REQUIRED_SETTINGS.to_vec()))
    }

    /// Parses the connection profile and makes sure the admin and the
    /// configured user are enrolled. Safe to call again; identities already
    /// in the store are reused.
    pub async fn connect_to_network(&self, raw_profile: &str) -> LedgerResult<()> {
        let config = self.configuration()?;
        debug!(
            "connect_to_network >> channel: {}, ca: {}",
            config.channel_name(),
            config.ca_host_name()
        );
        let profile = ConnectionProfile::parse(raw_profile)?;
        let ca = profile.certificate_authority(config.ca_host_name())?;
        let ca_client = TimeoutCaClient::new(
            self.ca_client_factory.build_ca_client(ca)?,
            config.ca_timeout(),
        );

        enroll_admin(
            &ca_client,
            &self.identity_store,
            config.msp_org(),
            config.admin_user_id(),
            config.admin_secret(),
        )
        .await?;
        register_and_enroll_user(
            &ca_client,
            &self.identity_store,
            config.msp_org(),
            config.org_user_id(),
            config.department(),
            config.admin_user_id(),
        )
        .await?;

        let connection = NetworkConnection {
            profile,
            options: GatewayOptions::for_user(config.org_user_id()),
        };
        *self.connection.write()? = Some(Arc::new(connection));
        info!(
            "Connected to network {} as {}",
            config.network_name(),
            config.org_user_id()
        );
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .read()
            .map(|connection| connection.is_some())
            .unwrap_or(false)
    }

    /// Key under which the chaincode stores the nym of `did`.
    pub fn network_scoped_did(&self, did: &str) -> LedgerResult<String> {
        Ok(format!("did:{}:{}", self.configuration()?.network_name(), did))
    }

    pub async fn submit_write(
        &self,
        operation: OperationKind,
        signed_request: &SignedRequest,
    ) -> LedgerResult<Vec<u8>> {
        debug!(
            "submit_write >> operation: {operation}, signer: {}",
            signed_request.signer_did()
        );
        let config = self.configuration()?;
        let connection = self.connection()?;
        let envelope = TransactionEnvelope::write(operation, signed_request, config.network_name());

        let response = self
            .execute(config, &connection, &envelope)
            .await
            .map_err(|err| LedgerError::submission_failure(operation, err))?;
        debug!("submit_write << {} bytes", response.len());
        Ok(response)
    }

    pub async fn read_record<T>(&self, operation: OperationKind, id: &str) -> LedgerResult<T>
    where
        T: DeserializeOwned,
    {
        debug!("read_record >> operation: {operation}, id: {id}");
        let config = self.configuration()?;
        let connection = self.connection()?;
        let envelope = TransactionEnvelope::read(operation, id);

        let response = self
            .execute(config, &connection, &envelope)
            .await
            .map_err(|err| LedgerError::read_failure(operation, err))?;
        trace!("read_record << {}", String::from_utf8_lossy(&response));
        if response.is_empty() {
            return Err(LedgerError::read_failure(
                operation,
                LedgerError::LedgerItemNotFound,
            ));
        }
        serde_json::from_slice(&response).map_err(|err| {
            LedgerError::read_failure(
                operation,
                LedgerError::InvalidLedgerResponse(format!("{operation} record: {err}")),
            )
        })
    }

    fn connection(&self) -> LedgerResult<Arc<NetworkConnection>> {
        self.connection
            .read()?
            .clone()
            .ok_or(LedgerError::GatewayNotConnected)
    }

    async fn open_session(
        &self,
        connection: &NetworkConnection,
    ) -> LedgerResult<SessionGuard<G::Session>> {
        let label = &connection.options.identity;
        let identity = self.identity_store.get(label).await?.ok_or_else(|| {
            LedgerError::IdentityStore(format!("identity {label} is not in the identity store"))
        })?;
        let session = self
            .gateway
            .connect(&connection.profile, &identity, &connection.options)
            .await?;
        Ok(SessionGuard::new(session))
    }

    /// Runs one chaincode call inside a fresh session; the session is closed
    /// before the outcome is returned.
    async fn execute(
        &self,
        config: &GatewayConfiguration,
        connection: &NetworkConnection,
        envelope: &TransactionEnvelope,
    ) -> LedgerResult<Vec<u8>> {
        let guard = self.open_session(connection).await?;
        let outcome = invoke(guard.session(), config, envelope).await;
        guard.release().await;
        if let Err(err) = &outcome {
            warn!(
                "{} {} failed: {err}",
                envelope.function(),
                envelope.operation()
            );
        }
        outcome
    }
}

async fn invoke<S>(
    session: &S,
    config: &GatewayConfiguration,
    envelope: &TransactionEnvelope,
) -> LedgerResult<Vec<u8>>
where
    S: GatewaySession,
{
    let contract = session
        .contract(config.channel_name(), config.chaincode_name())
        .await?;
    let function = envelope.function();
    let args = envelope.arguments();
    match function {
        ChaincodeFunction::CreateTransaction => {
            contract.submit_transaction(function.name(), &args).await
        }
        ChaincodeFunction::ReadTransaction => {
            contract.evaluate_transaction(function.name(), &args).await
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::ledger::fabric::{
        ca_client::{Enrollment, MockCaClient},
        connection_profile::CertificateAuthority,
        identity::{Identity, InMemoryIdentityStore},
    };

    const PROFILE: &str = r#"{
        "name": "test-network-org1",
        "certificateAuthorities": {
            "ca.org1.example.com": {
                "url": "https://localhost:7054",
                "caName": "ca-org1",
                "tlsCACerts": { "pem": ["-----BEGIN CERTIFICATE-----\nroot\n-----END CERTIFICATE-----\n"] },
                "httpOptions": { "verify": false }
            }
        }
    }"#;

    type Events = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct ScriptedCaFactory {
        clients: Mutex<Vec<MockCaClient>>,
    }

    impl CaClientFactory for ScriptedCaFactory {
        type Client = MockCaClient;

        fn build_ca_client(&self, ca: &CertificateAuthority) -> LedgerResult<MockCaClient> {
            assert_eq!(ca.url, "https://localhost:7054");
            self.clients
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| LedgerError::CertificateAuthority("no client scripted".into()))
        }
    }

    #[derive(Debug)]
    struct RecordingGateway {
        events: Events,
        chaincode_error: Option<String>,
        response: Vec<u8>,
    }

    #[derive(Debug)]
    struct RecordingSession {
        events: Events,
        chaincode_error: Option<String>,
        response: Vec<u8>,
    }

    #[derive(Debug)]
    struct RecordingContract {
        events: Events,
        chaincode_error: Option<String>,
        response: Vec<u8>,
    }

    #[async_trait]
    impl Gateway for RecordingGateway {
        type Session = RecordingSession;

        async fn connect(
            &self,
            _profile: &ConnectionProfile,
            identity: &Identity,
            options: &GatewayOptions,
        ) -> LedgerResult<RecordingSession> {
            assert_eq!(identity.id, options.identity);
            self.events
                .lock()
                .unwrap()
                .push(format!("connect:{}", options.identity));
            Ok(RecordingSession {
                events: self.events.clone(),
                chaincode_error: self.chaincode_error.clone(),
                response: self.response.clone(),
            })
        }
    }

    #[async_trait]
    impl GatewaySession for RecordingSession {
        type Contract = RecordingContract;

        async fn contract(&self, channel: &str, chaincode: &str) -> LedgerResult<RecordingContract> {
            self.events
                .lock()
                .unwrap()
                .push(format!("contract:{channel}/{chaincode}"));
            Ok(RecordingContract {
                events: self.events.clone(),
                chaincode_error: self.chaincode_error.clone(),
                response: self.response.clone(),
            })
        }

        async fn disconnect(&self) {
            self.events.lock().unwrap().push("disconnect".into());
        }
    }

    impl RecordingContract {
        fn call(&self, kind: &str, function: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
            self.events
                .lock()
                .unwrap()
                .push(format!("{kind}:{function}:{}", args.join("|")));
            match &self.chaincode_error {
                Some(err) => Err(LedgerError::Gateway(err.clone())),
                None => Ok(self.response.clone()),
            }
        }
    }

    #[async_trait]
    impl ChaincodeContract for RecordingContract {
        async fn submit_transaction(&self, function: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
            self.call("submit", function, args)
        }

        async fn evaluate_transaction(
            &self,
            function: &str,
            args: &[String],
        ) -> LedgerResult<Vec<u8>> {
            self.call("evaluate", function, args)
        }
    }

    fn settings() -> GatewaySettings {
        GatewaySettings::builder()
            .channel_name("mychannel")
            .chaincode_name("basic")
            .msp_org("Org1MSP")
            .org_user_id("appUser1")
            .ca_host_name("ca.org1.example.com")
            .department("org1.department1")
            .admin_user_id("admin")
            .admin_secret("adminpw")
            .network_name("test-network-org1")
            .build()
    }

    fn enrolling_ca() -> MockCaClient {
        let mut ca = MockCaClient::new();
        ca.expect_enroll().returning(|request| {
            Ok(Enrollment {
                certificate: format!("cert-{}", request.enrollment_id),
                private_key: format!("key-{}", request.enrollment_id),
            })
        });
        ca.expect_register()
            .returning(|request, _| Ok(format!("secret-{}", request.enrollment_id)));
        ca
    }

    fn client(
        clients: Vec<MockCaClient>,
        chaincode_error: Option<&str>,
        response: Value,
    ) -> (
        GatewayClient<RecordingGateway, ScriptedCaFactory, InMemoryIdentityStore>,
        Events,
    ) {
        let events = Events::default();
        let gateway = RecordingGateway {
            events: events.clone(),
            chaincode_error: chaincode_error.map(String::from),
            response: serde_json::to_vec(&response).unwrap(),
        };
        let factory = ScriptedCaFactory {
            clients: Mutex::new(clients),
        };
        (
            GatewayClient::new(gateway, factory, InMemoryIdentityStore::new()),
            events,
        )
    }

    #[tokio::test]
    async fn test_operations_before_initialize_fail() {
        let (client, events) = client(vec![], None, json!({}));

        let err = client.connect_to_network(PROFILE).await.unwrap_err();
        assert!(matches!(err, LedgerError::ConfigurationMissing(ref missing) if missing.len() == 9));
        let err = client
            .read_record::<Value>(OperationKind::Schema, "id")
            .await
            .unwrap_err();
        assert!(err.is_precondition());
        assert!(client.network_scoped_did("TL1EaPFCZ8Si5aUrqScBDt").is_err());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_initialize_only_once() {
        let (client, _) = client(vec![], None, json!({}));

        client.initialize(settings()).unwrap();
        let err = client.initialize(settings()).unwrap_err();

        assert!(matches!(err, LedgerError::InvalidState(_)));
        assert_eq!(client.configuration().unwrap().channel_name(), "mychannel");
    }

    #[test]
    fn test_initialize_rejects_incomplete_settings() {
        let (client, _) = client(vec![], None, json!({}));
        let incomplete = GatewaySettings::builder()
            .channel_name("mychannel")
            .network_name("test-network-org1")
            .build();

        let err = client.initialize(incomplete).unwrap_err();

        assert!(matches!(err, LedgerError::ConfigurationMissing(ref missing) if missing.len() == 7));
        assert!(client.configuration().is_err());
    }

    #[test]
    fn test_network_scoped_did() {
        let (client, _) = client(vec![], None, json!({}));
        client.initialize(settings()).unwrap();

        assert_eq!(
            client.network_scoped_did("TL1EaPFCZ8Si5aUrqScBDt").unwrap(),
            "did:test-network-org1:TL1EaPFCZ8Si5aUrqScBDt"
        );
    }

    #[tokio::test]
    async fn test_read_before_connect_fails() {
        let (client, events) = client(vec![], None, json!({}));
        client.initialize(settings()).unwrap();

        let err = client
            .read_record::<Value>(OperationKind::Nym, "did:test-network-org1:TL1EaPFCZ8Si5aUrqScBDt")
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::GatewayNotConnected));
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_to_network_enrolls_identities_once() {
        let mut idle_ca = MockCaClient::new();
        idle_ca.expect_enroll().never();
        idle_ca.expect_register().never();
        let (client, _) = client(vec![idle_ca, enrolling_ca()], None, json!({}));
        client.initialize(settings()).unwrap();

        client.connect_to_network(PROFILE).await.unwrap();
        client.connect_to_network(PROFILE).await.unwrap();

        assert!(client.is_connected());
        let mut labels = client.identity_store().list().await.unwrap();
        labels.sort();
        assert_eq!(labels, vec!["admin", "appUser1"]);
        let user = client.identity_store().get("appUser1").await.unwrap().unwrap();
        assert_eq!(user.credentials.certificate, "cert-appUser1");
        assert_eq!(user.msp_id, "Org1MSP");
    }

    #[tokio::test]
    async fn test_connect_with_unknown_ca_host() {
        let (client, _) = client(vec![enrolling_ca()], None, json!({}));
        client
            .initialize(
                GatewaySettings {
                    ca_host_name: Some("ca.org2.example.com".into()),
                    ..settings()
                },
            )
            .unwrap();

        let err = client.connect_to_network(PROFILE).await.unwrap_err();

        assert!(matches!(err, LedgerError::ConnectionProfileParse(_)));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_connect_with_malformed_profile() {
        let (client, _) = client(vec![enrolling_ca()], None, json!({}));
        client.initialize(settings()).unwrap();

        let err = client.connect_to_network("{\"name\": ").await.unwrap_err();

        assert!(matches!(err, LedgerError::ConnectionProfileParse(_)));
    }

    #[tokio::test]
    async fn test_read_record_runs_in_its_own_session() {
        let record = json!({ "dest": "TL1EaPFCZ8Si5aUrqScBDt", "role": "101" });
        let (client, events) = client(vec![enrolling_ca()], None, record.clone());
        client.initialize(settings()).unwrap();
        client.connect_to_network(PROFILE).await.unwrap();

        let read: Value = client
            .read_record(OperationKind::Nym, "did:test-network-org1:TL1EaPFCZ8Si5aUrqScBDt")
            .await
            .unwrap();

        assert_eq!(read, record);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "connect:appUser1".to_string(),
                "contract:mychannel/basic".to_string(),
                "evaluate:ReadTransaction:did:test-network-org1:TL1EaPFCZ8Si5aUrqScBDt|nym"
                    .to_string(),
                "disconnect".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_chaincode_failure_closes_session_first() {
        let (client, events) = client(vec![enrolling_ca()], Some("chaincode panicked"), json!({}));
        client.initialize(settings()).unwrap();
        client.connect_to_network(PROFILE).await.unwrap();

        let err = client
            .read_record::<Value>(OperationKind::Schema, "schema-id")
            .await
            .unwrap_err();

        match err {
            LedgerError::TransactionReadFailure { operation, source } => {
                assert_eq!(operation, OperationKind::Schema);
                assert!(matches!(*source, LedgerError::Gateway(_)));
            }
            other => panic!("unexpected error {other:?}"),
        }
        let events = events.lock().unwrap();
        assert_eq!(events.first().map(String::as_str), Some("connect:appUser1"));
        assert_eq!(events.last().map(String::as_str), Some("disconnect"));
    }

    #[tokio::test]
    async fn test_malformed_record_is_a_read_failure() {
        let (client, events) = client(vec![enrolling_ca()], None, json!("not a record"));
        client.initialize(settings()).unwrap();
        client.connect_to_network(PROFILE).await.unwrap();

        let err = client
            .read_record::<Identity>(OperationKind::CredentialDefinition, "cred-def-id")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::TransactionReadFailure { ref source, .. }
                if matches!(**source, LedgerError::InvalidLedgerResponse(_))
        ));
        assert_eq!(events.lock().unwrap().last().map(String::as_str), Some("disconnect"));
    }
}
