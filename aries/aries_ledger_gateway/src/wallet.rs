//! Signing capability the ledgers consume. Key storage lives with the wallet
//! implementation; the ledgers only ever ask for a signature by DID.
use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum WalletError {
    #[error("No key material stored for DID {0}")]
    DidNotFound(String),
    #[error("Signing failed: {0}")]
    Signing(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SigningWallet: Debug + Send + Sync {
    async fn sign(&self, did: &str, msg: &[u8]) -> Result<Vec<u8>, WalletError>;
}

#[async_trait]
impl<T> SigningWallet for Arc<T>
where
    T: SigningWallet + ?Sized,
{
    async fn sign(&self, did: &str, msg: &[u8]) -> Result<Vec<u8>, WalletError> {
        self.as_ref().sign(did, msg).await
    }
}
