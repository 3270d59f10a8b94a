use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::error::{LedgerError, LedgerResult};

pub const X509_IDENTITY_TYPE: &str = "X.509";
const IDENTITY_FILE_EXTENSION: &str = "id";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X509Credentials {
    pub certificate: String,
    pub private_key: String,
}

impl Debug for X509Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X509Credentials")
            .field("certificate", &self.certificate)
            .field("private_key", &"*****")
            .finish()
    }
}

/// CA-issued identity, stored in the same JSON layout Fabric SDK wallets use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Store label; not part of the persisted document.
    #[serde(skip)]
    pub id: String,
    pub credentials: X509Credentials,
    pub msp_id: String,
    #[serde(rename = "type")]
    pub identity_type: String,
    #[serde(default = "identity_version")]
    pub version: u32,
}

fn identity_version() -> u32 {
    1
}

impl Identity {
    pub fn new_x509(
        id: impl Into<String>,
        msp_id: impl Into<String>,
        certificate: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            credentials: X509Credentials {
                certificate: certificate.into(),
                private_key: private_key.into(),
            },
            msp_id: msp_id.into(),
            identity_type: X509_IDENTITY_TYPE.to_string(),
            version: identity_version(),
        }
    }

    /// Authentication context used when acting as this identity towards the CA.
    pub fn user_context(&self) -> LedgerResult<UserContext> {
        if self.identity_type != X509_IDENTITY_TYPE {
            return Err(LedgerError::IdentityStore(format!(
                "no provider for identity type {}",
                self.identity_type
            )));
        }
        Ok(UserContext {
            name: self.id.clone(),
            msp_id: self.msp_id.clone(),
            credentials: self.credentials.clone(),
        })
    }
}

/// Signing context of an enrolled user, as presented to the CA.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserContext {
    pub name: String,
    pub msp_id: String,
    pub credentials: X509Credentials,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Debug + Send + Sync {
    async fn get(&self, label: &str) -> LedgerResult<Option<Identity>>;

    async fn put(&self, label: &str, identity: Identity) -> LedgerResult<()>;

    async fn remove(&self, label: &str) -> LedgerResult<()>;

    async fn list(&self) -> LedgerResult<Vec<String>>;
}

#[async_trait]
impl<T> IdentityStore for Arc<T>
where
    T: IdentityStore + ?Sized,
{
    async fn get(&self, label: &str) -> LedgerResult<Option<Identity>> {
        self.as_ref().get(label).await
    }

    async fn put(&self, label: &str, identity: Identity) -> LedgerResult<()> {
        self.as_ref().put(label, identity).await
    }

    async fn remove(&self, label: &str) -> LedgerResult<()> {
        self.as_ref().remove(label).await
    }

    async fn list(&self) -> LedgerResult<Vec<String>> {
        self.as_ref().list().await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        info!("Built an in memory identity store");
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn get(&self, label: &str) -> LedgerResult<Option<Identity>> {
        Ok(self.identities.read()?.get(label).cloned())
    }

    async fn put(&self, label: &str, identity: Identity) -> LedgerResult<()> {
        let identity = Identity {
            id: label.to_string(),
            ..identity
        };
        self.identities.write()?.insert(label.to_string(), identity);
        Ok(())
    }

    async fn remove(&self, label: &str) -> LedgerResult<()> {
        self.identities.write()?.remove(label);
        Ok(())
    }

    async fn list(&self) -> LedgerResult<Vec<String>> {
        let mut labels: Vec<String> = self.identities.read()?.keys().cloned().collect();
        labels.sort();
        Ok(labels)
    }
}

/// One `<label>.id` JSON document per identity inside a directory.
#[derive(Debug, Clone)]
pub struct FileSystemIdentityStore {
    directory: PathBuf,
}

impl FileSystemIdentityStore {
    pub async fn new(directory: impl Into<PathBuf>) -> LedgerResult<Self> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await?;
        info!(
            "Built a file system identity store at {}",
            directory.display()
        );
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, label: &str) -> LedgerResult<PathBuf> {
        if label.is_empty() || label.contains(['/', '\\']) || label.starts_with('.') {
            return Err(LedgerError::IdentityStore(format!(
                "invalid identity label {label:?}"
            )));
        }
        Ok(self
            .directory
            .join(format!("{label}.{IDENTITY_FILE_EXTENSION}")))
    }
}

#[async_trait]
impl IdentityStore for FileSystemIdentityStore {
    async fn get(&self, label: &str) -> LedgerResult<Option<Identity>> {
        let path = self.path_for(label)?;
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut identity: Identity = serde_json::from_slice(&contents).map_err(|err| {
            LedgerError::IdentityStore(format!("corrupted identity {}: {err}", path.display()))
        })?;
        identity.id = label.to_string();
        Ok(Some(identity))
    }

    async fn put(&self, label: &str, identity: Identity) -> LedgerResult<()> {
        let path = self.path_for(label)?;
        let contents = serde_json::to_vec(&identity)?;
        tokio::fs::write(&path, contents).await?;
        debug!("put << stored identity {label} at {}", path.display());
        Ok(())
    }

    async fn remove(&self, label: &str) -> LedgerResult<()> {
        let path = self.path_for(label)?;
        match tokio::fs::remove_file(&path).await {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    async fn list(&self) -> LedgerResult<Vec<String>> {
        let mut labels = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(IDENTITY_FILE_EXTENSION) {
                continue;
            }
            if let Some(label) = path.file_stem().and_then(|stem| stem.to_str()) {
                labels.push(label.to_string());
            }
        }
        labels.sort();
        Ok(labels)
    }
}
