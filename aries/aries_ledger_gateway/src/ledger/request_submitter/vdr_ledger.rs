use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    path::Path,
    sync::Arc,
};

use async_trait::async_trait;
use indy_vdr::{
    common::error::VdrError,
    config::PoolConfig,
    pool::{
        PoolBuilder, PoolRunner, PoolTransactions, PreparedRequest, RequestResult,
        RequestResultMeta,
    },
};
use log::{info, trace};
use tokio::sync::oneshot;

use super::RequestSubmitter;
use crate::errors::error::{LedgerError, LedgerResult};

/// Connection pool to the validator nodes of a token ledger.
#[derive(Clone)]
pub struct IndyVdrLedgerPool {
    runner: Arc<PoolRunner>,
}

impl IndyVdrLedgerPool {
    pub fn new_from_runner(runner: PoolRunner) -> Self {
        Self {
            runner: Arc::new(runner),
        }
    }

    /// Opens a pool from a genesis transactions file. Nodes listed in
    /// `exclude_nodes` get zero weight and are never picked for requests.
    pub fn new(
        genesis_file_path: impl AsRef<Path>,
        pool_config: PoolConfig,
        exclude_nodes: Vec<String>,
    ) -> LedgerResult<Self> {
        let genesis_file_path = genesis_file_path.as_ref();
        info!(
            "IndyVdrLedgerPool::new >> genesis_file_path: {}, pool_config: {pool_config:?}",
            genesis_file_path.display()
        );
        let txns = PoolTransactions::from_json_file(genesis_file_path)?;
        let runner = PoolBuilder::new(pool_config, txns)
            .node_weights(Some(exclusion_weights(exclude_nodes)))
            .into_runner(None)?;
        Ok(Self::new_from_runner(runner))
    }
}

fn exclusion_weights(exclude_nodes: Vec<String>) -> HashMap<String, f32> {
    exclude_nodes
        .into_iter()
        .map(|node| (node, 0.0f32))
        .collect()
}

impl Debug for IndyVdrLedgerPool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndyVdrLedgerPool")
            .field("runner", &"PoolRunner")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct IndyVdrSubmitter {
    pool: IndyVdrLedgerPool,
}

impl IndyVdrSubmitter {
    pub fn new(pool: IndyVdrLedgerPool) -> Self {
        Self { pool }
    }
}

type PoolReply = Result<(RequestResult<String>, RequestResultMeta), VdrError>;

#[async_trait]
impl RequestSubmitter for IndyVdrSubmitter {
    async fn submit(&self, request: PreparedRequest) -> LedgerResult<String> {
        trace!("submit >> {}", request.req_json);
        // the pool runner reports through a callback; bridge it with a oneshot
        let (sender, receiver) = oneshot::channel::<PoolReply>();
        self.pool.runner.send_request(
            request,
            Box::new(move |result| {
                sender.send(result).ok();
            }),
        )?;

        let (result, _meta) = receiver
            .await
            .map_err(|err| LedgerError::InvalidState(format!("pool runner went away: {err}")))??;
        match result {
            RequestResult::Reply(reply) => {
                trace!("submit << {reply}");
                Ok(reply)
            }
            RequestResult::Failed(failed) => Err(failed.into()),
        }
    }
}
