use aries_ledger_gateway::ledger::fabric::config::GatewaySettings;

pub const CHANNEL_NAME: &str = "mychannel";
pub const CHAINCODE_NAME: &str = "basic";
pub const MSP_ORG: &str = "Org1MSP";
pub const ORG_USER_ID: &str = "appUser1";
pub const CA_HOST_NAME: &str = "ca.org1.example.com";
pub const DEPARTMENT: &str = "org1.department1";
pub const ADMIN_USER_ID: &str = "admin";
pub const ADMIN_SECRET: &str = "adminpw";
pub const NETWORK_NAME: &str = "test-network-org1";

pub const TRUSTEE_DID: &str = "V4SGRU86Z58d6TV7PBUe6f";
pub const TARGET_DID: &str = "TL1EaPFCZ8Si5aUrqScBDt";
pub const TARGET_VERKEY: &str = "~43X4NhAFqREffK7eWdKgFH";
pub const ENDORSER_ROLE_CODE: &str = "101";

pub fn gateway_settings() -> GatewaySettings {
    GatewaySettings::builder()
        .channel_name(CHANNEL_NAME)
        .chaincode_name(CHAINCODE_NAME)
        .msp_org(MSP_ORG)
        .org_user_id(ORG_USER_ID)
        .ca_host_name(CA_HOST_NAME)
        .department(DEPARTMENT)
        .admin_user_id(ADMIN_USER_ID)
        .admin_secret(ADMIN_SECRET)
        .network_name(NETWORK_NAME)
        .build()
}

/// Connection profile of the first organization of the Fabric test network.
pub fn connection_profile() -> String {
    serde_json::json!({
        "name": NETWORK_NAME,
        "version": "1.0.0",
        "client": {
            "organization": "Org1",
            "connection": { "timeout": { "peer": { "endorser": "300" } } }
        },
        "organizations": {
            "Org1": {
                "mspid": MSP_ORG,
                "peers": ["peer0.org1.example.com"],
                "certificateAuthorities": [CA_HOST_NAME]
            }
        },
        "peers": {
            "peer0.org1.example.com": {
                "url": "grpcs://localhost:7051",
                "tlsCACerts": {
                    "pem": "-----BEGIN CERTIFICATE-----\nMIICJjCCAc2gAwIBAgIUORG1\n-----END CERTIFICATE-----\n"
                },
                "grpcOptions": {
                    "ssl-target-name-override": "peer0.org1.example.com",
                    "hostnameOverride": "peer0.org1.example.com"
                }
            }
        },
        "certificateAuthorities": {
            CA_HOST_NAME: {
                "url": "https://localhost:7054",
                "caName": "ca-org1",
                "tlsCACerts": {
                    "pem": ["-----BEGIN CERTIFICATE-----\nMIICJjCCAc2gAwIBAgIUORG1\n-----END CERTIFICATE-----\n"]
                },
                "httpOptions": { "verify": false }
            }
        }
    })
    .to_string()
}
