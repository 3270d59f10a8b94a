use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use indy_vdr::pool::PreparedRequest;

use crate::errors::error::LedgerResult;

pub mod vdr_ledger;

/// Transport of the token ledger: sends a prepared request to the pool and
/// returns the raw JSON reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestSubmitter: Debug + Send + Sync {
    async fn submit(&self, request: PreparedRequest) -> LedgerResult<String>;
}

#[async_trait]
impl<T> RequestSubmitter for Arc<T>
where
    T: RequestSubmitter + ?Sized,
{
    async fn submit(&self, request: PreparedRequest) -> LedgerResult<String> {
        self.as_ref().submit(request).await
    }
}
