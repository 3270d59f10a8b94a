//! Connection-level traits of the Fabric gateway and the per-call session guard.
use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;

use super::{connection_profile::ConnectionProfile, identity::Identity};
use crate::errors::error::LedgerResult;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOptions {
    pub enabled: bool,
    pub as_localhost: bool,
}

/// Options passed to the gateway on every connect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOptions {
    /// Label of the identity the session acts as.
    pub identity: String,
    pub discovery: DiscoveryOptions,
}

impl GatewayOptions {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            identity: user_id.into(),
            discovery: DiscoveryOptions {
                enabled: true,
                as_localhost: true,
            },
        }
    }
}

#[async_trait]
pub trait Gateway: Debug + Send + Sync {
    type Session: GatewaySession + 'static;

    async fn connect(
        &self,
        profile: &ConnectionProfile,
        identity: &Identity,
        options: &GatewayOptions,
    ) -> LedgerResult<Self::Session>;
}

#[async_trait]
pub trait GatewaySession: Debug + Send + Sync {
    type Contract: ChaincodeContract;

    async fn contract(&self, channel_name: &str, chaincode_name: &str)
        -> LedgerResult<Self::Contract>;

    async fn disconnect(&self);
}

#[async_trait]
pub trait ChaincodeContract: Debug + Send + Sync {
    /// Endorses and commits a transaction.
    async fn submit_transaction(&self, function: &str, args: &[String]) -> LedgerResult<Vec<u8>>;

    /// Queries a peer without committing anything.
    async fn evaluate_transaction(&self, function: &str, args: &[String])
        -> LedgerResult<Vec<u8>>;
}

/// Owns an open gateway session. [`SessionGuard::release`] disconnects it;
/// a guard dropped before release (e.g. a cancelled call) schedules the
/// disconnect on the current runtime instead.
#[derive(Debug)]
pub struct SessionGuard<S>
where
    S: GatewaySession + 'static,
{
    session: Arc<S>,
    released: bool,
}

impl<S> SessionGuard<S>
where
    S: GatewaySession + 'static,
{
    pub fn new(session: S) -> Self {
        Self {
            session: Arc::new(session),
            released: false,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub async fn release(mut self) {
        self.released = true;
        debug!("release >> disconnecting gateway session");
        self.session.disconnect().await;
    }
}

impl<S> Drop for SessionGuard<S>
where
    S: GatewaySession + 'static,
{
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let session = self.session.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Gateway session dropped before release, scheduling disconnect");
                handle.spawn(async move { session.disconnect().await });
            }
            Err(_) => warn!("Gateway session dropped outside of a runtime, it was not disconnected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct CountingSession {
        disconnects: Arc<AtomicUsize>,
    }

    #[derive(Debug)]
    struct NoopContract;

    #[async_trait]
    impl ChaincodeContract for NoopContract {
        async fn submit_transaction(&self, _: &str, _: &[String]) -> LedgerResult<Vec<u8>> {
            Ok(vec![])
        }

        async fn evaluate_transaction(&self, _: &str, _: &[String]) -> LedgerResult<Vec<u8>> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl GatewaySession for CountingSession {
        type Contract = NoopContract;

        async fn contract(&self, _: &str, _: &str) -> LedgerResult<NoopContract> {
            Ok(NoopContract)
        }

        async fn disconnect(&self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_gateway_options_for_user() {
        let options = GatewayOptions::for_user("appUser1");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({
                "identity": "appUser1",
                "discovery": { "enabled": true, "asLocalhost": true }
            })
        );
    }

    #[tokio::test]
    async fn test_release_disconnects_once() {
        let disconnects = Arc::new(AtomicUsize::new(0));
        let guard = SessionGuard::new(CountingSession {
            disconnects: disconnects.clone(),
        });

        guard.release().await;

        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dropped_guard_schedules_disconnect() {
        let disconnects = Arc::new(AtomicUsize::new(0));
        let guard = SessionGuard::new(CountingSession {
            disconnects: disconnects.clone(),
        });

        drop(guard);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }

        assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    }
}
