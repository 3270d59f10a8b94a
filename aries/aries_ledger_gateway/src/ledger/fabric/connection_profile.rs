//! Network topology documents ("common connection profiles") describing the
//! certificate authorities, organizations and peers of a Fabric network.
use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::error::{LedgerError, LedgerResult};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub organizations: HashMap<String, Organization>,
    #[serde(default)]
    pub peers: HashMap<String, Peer>,
    pub certificate_authorities: HashMap<String, CertificateAuthority>,
    /// Document as received; the gateway consumes it verbatim.
    #[serde(skip)]
    raw: Value,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub mspid: String,
    #[serde(default)]
    pub peers: Vec<String>,
    #[serde(default)]
    pub certificate_authorities: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub url: String,
    #[serde(default)]
    pub tls_ca_certs: Option<TlsCaCerts>,
    #[serde(default)]
    pub grpc_options: HashMap<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateAuthority {
    pub url: String,
    #[serde(default)]
    pub ca_name: Option<String>,
    #[serde(rename = "tlsCACerts")]
    pub tls_ca_certs: TlsCaCerts,
    #[serde(default)]
    pub http_options: Option<HttpOptions>,
}

impl CertificateAuthority {
    pub fn trusted_roots(&self) -> Vec<String> {
        match &self.tls_ca_certs.pem {
            Pem::Single(pem) => vec![pem.clone()],
            Pem::Chain(pems) => pems.clone(),
        }
    }

    pub fn verify_tls(&self) -> bool {
        self.http_options.as_ref().map_or(false, |opts| opts.verify)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TlsCaCerts {
    pub pem: Pem,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Pem {
    Single(String),
    Chain(Vec<String>),
}

#[derive(Clone, Debug, Deserialize)]
pub struct HttpOptions {
    #[serde(default)]
    pub verify: bool,
}

impl ConnectionProfile {
    pub fn parse(raw: &str) -> LedgerResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| LedgerError::ConnectionProfileParse(err.to_string()))?;
        let mut profile: ConnectionProfile = serde_json::from_value(value.clone())
            .map_err(|err| LedgerError::ConnectionProfileParse(err.to_string()))?;
        profile.raw = value;
        Ok(profile)
    }

    pub fn certificate_authority(&self, ca_host_name: &str) -> LedgerResult<&CertificateAuthority> {
        self.certificate_authorities
            .get(ca_host_name)
            .ok_or_else(|| {
                LedgerError::ConnectionProfileParse(format!(
                    "certificate authority {ca_host_name} is not defined in the connection profile"
                ))
            })
    }

    pub fn as_json(&self) -> &Value {
        &self.raw
    }
}
