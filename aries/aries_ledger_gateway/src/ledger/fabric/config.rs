use std::time::Duration;

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::errors::error::{LedgerError, LedgerResult};

pub const DEFAULT_CA_TIMEOUT: Duration = Duration::from_secs(30);

pub const REQUIRED_SETTINGS: [&str; 9] = [
    "channelName",
    "chaincodeName",
    "mspOrg",
    "orgUserId",
    "caHostName",
    "department",
    "adminUserId",
    "adminSecret",
    "networkName",
];

/// Raw gateway settings as supplied by the host application. Every field is
/// optional here; [`GatewaySettings::validate`] turns them into a
/// [`GatewayConfiguration`] or reports all of the missing ones at once.
#[derive(Clone, Debug, Default, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(default, setter(strip_option, into)))]
pub struct GatewaySettings {
    pub channel_name: Option<String>,
    pub chaincode_name: Option<String>,
    pub msp_org: Option<String>,
    pub org_user_id: Option<String>,
    pub ca_host_name: Option<String>,
    pub department: Option<String>,
    pub admin_user_id: Option<String>,
    pub admin_secret: Option<String>,
    pub network_name: Option<String>,
    #[serde(default, with = "duration_secs")]
    pub ca_timeout: Option<Duration>,
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

impl GatewaySettings {
    pub fn from_json(json: &str) -> LedgerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(self) -> LedgerResult<GatewayConfiguration> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| -> String {
            match value {
                Some(value) if !value.is_empty() => value,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };
        let config = GatewayConfiguration {
            channel_name: require(self.channel_name, "channelName"),
            chaincode_name: require(self.chaincode_name, "chaincodeName"),
            msp_org: require(self.msp_org, "mspOrg"),
            org_user_id: require(self.org_user_id, "orgUserId"),
            ca_host_name: require(self.ca_host_name, "caHostName"),
            department: require(self.department, "department"),
            admin_user_id: require(self.admin_user_id, "adminUserId"),
            admin_secret: require(self.admin_secret, "adminSecret"),
            network_name: require(self.network_name, "networkName"),
            ca_timeout: self.ca_timeout.unwrap_or(DEFAULT_CA_TIMEOUT),
        };
        if !missing.is_empty() {
            return Err(LedgerError::ConfigurationMissing(missing));
        }
        Ok(config)
    }
}

/// Validated, immutable gateway configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfiguration {
    channel_name: String,
    chaincode_name: String,
    msp_org: String,
    org_user_id: String,
    ca_host_name: String,
    department: String,
    admin_user_id: String,
    admin_secret: String,
    network_name: String,
    ca_timeout: Duration,
}

impl GatewayConfiguration {
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn chaincode_name(&self) -> &str {
        &self.chaincode_name
    }

    pub fn msp_org(&self) -> &str {
        &self.msp_org
    }

    pub fn org_user_id(&self) -> &str {
        &self.org_user_id
    }

    pub fn ca_host_name(&self) -> &str {
        &self.ca_host_name
    }

    /// Affiliation new users are registered under.
    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn admin_user_id(&self) -> &str {
        &self.admin_user_id
    }

    pub fn admin_secret(&self) -> &str {
        &self.admin_secret
    }

    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    pub fn ca_timeout(&self) -> Duration {
        self.ca_timeout
    }
}

impl std::fmt::Debug for GatewayConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfiguration")
            .field("channel_name", &self.channel_name)
            .field("chaincode_name", &self.chaincode_name)
            .field("msp_org", &self.msp_org)
            .field("org_user_id", &self.org_user_id)
            .field("ca_host_name", &self.ca_host_name)
            .field("department", &self.department)
            .field("admin_user_id", &self.admin_user_id)
            .field("admin_secret", &"*****")
            .field("network_name", &self.network_name)
            .field("ca_timeout", &self.ca_timeout)
            .finish()
    }
}
