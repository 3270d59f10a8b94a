use std::sync::Arc;

use aries_ledger_gateway::{
    errors::error::LedgerError,
    ledger::fabric::{
        ca_client::{CaClientFactory, TimeoutCaClient},
        client::GatewayClient,
        config::DEFAULT_CA_TIMEOUT,
        connection_profile::ConnectionProfile,
        enrollment::{enroll_admin, register_and_enroll_user, EnrollmentOutcome},
        identity::{FileSystemIdentityStore, IdentityStore, InMemoryIdentityStore},
    },
};
use test_utils::{
    constants::{
        connection_profile, gateway_settings, ADMIN_SECRET, ADMIN_USER_ID, CA_HOST_NAME,
        DEPARTMENT, MSP_ORG, ORG_USER_ID,
    },
    fabric_network::{InMemoryCaClient, InMemoryFabricNetwork, NetworkEvent},
    logger::init_logger,
};

fn ca_client(network: &InMemoryFabricNetwork) -> TimeoutCaClient<InMemoryCaClient> {
    let profile = ConnectionProfile::parse(&connection_profile()).unwrap();
    let ca = profile.certificate_authority(CA_HOST_NAME).unwrap();
    TimeoutCaClient::new(
        network.ca_factory().build_ca_client(ca).unwrap(),
        DEFAULT_CA_TIMEOUT,
    )
}

#[tokio::test]
async fn test_enroll_admin_twice_contacts_ca_once() {
    init_logger();
    let network = InMemoryFabricNetwork::new();
    let ca = ca_client(&network);
    let store = InMemoryIdentityStore::new();

    let first = enroll_admin(&ca, &store, MSP_ORG, ADMIN_USER_ID, ADMIN_SECRET)
        .await
        .unwrap();
    let second = enroll_admin(&ca, &store, MSP_ORG, ADMIN_USER_ID, ADMIN_SECRET)
        .await
        .unwrap();

    assert_eq!(first, EnrollmentOutcome::Enrolled);
    assert_eq!(second, EnrollmentOutcome::AlreadyEnrolled);
    assert_eq!(network.ca_calls(), 1);
    assert_eq!(store.list().await.unwrap(), vec![ADMIN_USER_ID]);
}

#[tokio::test]
async fn test_register_user_before_admin_fails_without_ca_contact() {
    init_logger();
    let network = InMemoryFabricNetwork::new();
    let ca = ca_client(&network);
    let store = InMemoryIdentityStore::new();

    let err = register_and_enroll_user(
        &ca,
        &store,
        MSP_ORG,
        ORG_USER_ID,
        DEPARTMENT,
        ADMIN_USER_ID,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LedgerError::AdminNotEnrolled(_)));
    assert_eq!(network.ca_calls(), 0);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_then_user_enrollment() {
    init_logger();
    let network = InMemoryFabricNetwork::new();
    let ca = ca_client(&network);
    let store = InMemoryIdentityStore::new();

    enroll_admin(&ca, &store, MSP_ORG, ADMIN_USER_ID, ADMIN_SECRET)
        .await
        .unwrap();
    let outcome = register_and_enroll_user(
        &ca,
        &store,
        MSP_ORG,
        ORG_USER_ID,
        DEPARTMENT,
        ADMIN_USER_ID,
    )
    .await
    .unwrap();

    assert_eq!(outcome, EnrollmentOutcome::Enrolled);
    assert_eq!(
        network.events(),
        vec![
            NetworkEvent::Enroll(ADMIN_USER_ID.to_string()),
            NetworkEvent::Register {
                user: ORG_USER_ID.to_string(),
                registrar: ADMIN_USER_ID.to_string(),
            },
            NetworkEvent::Enroll(ORG_USER_ID.to_string()),
        ]
    );
    let user = store.get(ORG_USER_ID).await.unwrap().unwrap();
    assert_eq!(user.msp_id, MSP_ORG);
    assert_eq!(user.identity_type, "X.509");
}

#[tokio::test]
async fn test_wrong_admin_secret_stores_nothing() {
    init_logger();
    let network = InMemoryFabricNetwork::new();
    let ca = ca_client(&network);
    let store = InMemoryIdentityStore::new();

    let err = enroll_admin(&ca, &store, MSP_ORG, ADMIN_USER_ID, "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::CertificateAuthority(_)));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connect_to_network_is_repeatable() {
    init_logger();
    let network = InMemoryFabricNetwork::new();
    let client = GatewayClient::new(
        network.gateway(),
        network.ca_factory(),
        InMemoryIdentityStore::new(),
    );
    client.initialize(gateway_settings()).unwrap();

    client.connect_to_network(&connection_profile()).await.unwrap();
    assert_eq!(network.ca_calls(), 3);
    client.connect_to_network(&connection_profile()).await.unwrap();
    assert_eq!(network.ca_calls(), 3);

    let mut labels = client.identity_store().list().await.unwrap();
    labels.sort();
    assert_eq!(labels, vec![ADMIN_USER_ID, ORG_USER_ID]);
}

#[tokio::test]
async fn test_ca_outage_fails_connect_and_recovers() {
    init_logger();
    let network = InMemoryFabricNetwork::new();
    let client = GatewayClient::new(
        network.gateway(),
        network.ca_factory(),
        InMemoryIdentityStore::new(),
    );
    client.initialize(gateway_settings()).unwrap();
    network.fail_ca(Some("connect ECONNREFUSED 127.0.0.1:7054"));

    let err = client
        .connect_to_network(&connection_profile())
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::CertificateAuthority(_)));
    assert!(!client.is_connected());
    assert!(client.identity_store().list().await.unwrap().is_empty());

    network.fail_ca(None);
    client.connect_to_network(&connection_profile()).await.unwrap();
    assert!(client.is_connected());
}

#[tokio::test]
async fn test_file_system_store_survives_restart() {
    init_logger();
    let directory = std::env::temp_dir().join(format!("wallet-{}", uuid::Uuid::new_v4()));
    let network = InMemoryFabricNetwork::new();
    {
        let store = FileSystemIdentityStore::new(&directory).await.unwrap();
        let client = GatewayClient::new(network.gateway(), network.ca_factory(), store);
        client.initialize(gateway_settings()).unwrap();
        client.connect_to_network(&connection_profile()).await.unwrap();
    }
    assert!(directory.join(format!("{ADMIN_USER_ID}.id")).exists());
    assert!(directory.join(format!("{ORG_USER_ID}.id")).exists());
    let calls_before_restart = network.ca_calls();

    let store = Arc::new(FileSystemIdentityStore::new(&directory).await.unwrap());
    let client = GatewayClient::new(network.gateway(), network.ca_factory(), store.clone());
    client.initialize(gateway_settings()).unwrap();
    client.connect_to_network(&connection_profile()).await.unwrap();

    assert_eq!(network.ca_calls(), calls_before_restart);
    let user = store.get(ORG_USER_ID).await.unwrap().unwrap();
    assert_eq!(user.id, ORG_USER_ID);
    assert_eq!(user.msp_id, MSP_ORG);

    std::fs::remove_dir_all(&directory).unwrap();
}
