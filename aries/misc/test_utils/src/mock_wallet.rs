use std::collections::HashSet;

use aries_ledger_gateway::wallet::{SigningWallet, WalletError};
use async_trait::async_trait;

pub const DID: &str = "FhrSrYtQcw3p9xwf7NYemf";
pub const VERKEY: &str = "91qMFrZjXDoi2Vc8Mm14Ys112tEZdDegBZZoembFEATE";

/// Wallet whose "signature" is the signed message itself. With
/// [`MockWallet::with_dids`] it only signs for the listed DIDs.
#[derive(Debug, Default)]
pub struct MockWallet {
    dids: Option<HashSet<String>>,
}

impl MockWallet {
    pub fn with_dids(dids: &[&str]) -> Self {
        Self {
            dids: Some(dids.iter().map(|did| did.to_string()).collect()),
        }
    }
}

#[async_trait]
impl SigningWallet for MockWallet {
    async fn sign(&self, did: &str, msg: &[u8]) -> Result<Vec<u8>, WalletError> {
        match &self.dids {
            Some(dids) if !dids.contains(did) => Err(WalletError::DidNotFound(did.to_string())),
            _ => Ok(msg.to_vec()),
        }
    }
}
