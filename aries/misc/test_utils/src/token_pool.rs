//! Token-ledger pool answering indy requests from memory.
use std::{collections::HashMap, sync::Mutex};

use aries_ledger_gateway::{
    errors::error::LedgerResult,
    indy_vdr::pool::PreparedRequest,
    ledger::request_submitter::RequestSubmitter,
};
use async_trait::async_trait;
use serde_json::{json, Value};

const NYM: &str = "1";
const SCHEMA: &str = "101";
const CRED_DEF: &str = "102";
const GET_NYM: &str = "105";
const GET_SCHEMA: &str = "107";
const GET_CRED_DEF: &str = "108";

#[derive(Debug, Default)]
struct PoolState {
    seq_no: u32,
    nyms: HashMap<String, Value>,
    schemas: HashMap<String, (u32, Value)>,
    cred_defs: HashMap<String, (u32, Value)>,
    requests: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct InMemoryTokenPool {
    state: Mutex<PoolState>,
}

fn reply(result: Value) -> String {
    json!({ "op": "REPLY", "result": result }).to_string()
}

fn reqnack(reason: &str) -> String {
    json!({ "op": "REQNACK", "reason": reason }).to_string()
}

fn write_reply(txn_type: &str, seq_no: u32) -> String {
    reply(json!({
        "ver": "1",
        "txn": { "type": txn_type },
        "txnMetadata": { "seqNo": seq_no }
    }))
}

fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field].as_str().unwrap_or_default()
}

impl InMemoryTokenPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request the pool received, in order.
    pub fn requests(&self) -> Vec<Value> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    fn handle(state: &mut PoolState, request: &Value) -> String {
        let operation = &request["operation"];
        let identifier = str_field(request, "identifier");
        let txn_type = str_field(operation, "type");
        let is_write = matches!(txn_type, NYM | SCHEMA | CRED_DEF);
        if is_write && request.get("signature").is_none() {
            return reqnack("MissingSignature()");
        }
        match txn_type {
            NYM => {
                state.seq_no += 1;
                let dest = str_field(operation, "dest");
                state.nyms.insert(
                    dest.to_string(),
                    json!({
                        "dest": dest,
                        "identifier": identifier,
                        "role": operation.get("role").cloned().unwrap_or(Value::Null),
                        "verkey": operation.get("verkey").cloned().unwrap_or(Value::Null),
                        "seqNo": state.seq_no
                    }),
                );
                write_reply(NYM, state.seq_no)
            }
            GET_NYM => {
                let dest = str_field(operation, "dest");
                let data = state.nyms.get(dest).map(|nym| nym.to_string());
                reply(json!({ "type": GET_NYM, "dest": dest, "data": data }))
            }
            SCHEMA => {
                state.seq_no += 1;
                let data = &operation["data"];
                let id = format!(
                    "{identifier}:2:{}:{}",
                    str_field(data, "name"),
                    str_field(data, "version")
                );
                state.schemas.insert(id, (state.seq_no, data.clone()));
                write_reply(SCHEMA, state.seq_no)
            }
            GET_SCHEMA => {
                let dest = str_field(operation, "dest");
                let data = &operation["data"];
                let id = format!(
                    "{dest}:2:{}:{}",
                    str_field(data, "name"),
                    str_field(data, "version")
                );
                match state.schemas.get(&id) {
                    Some((seq_no, schema)) => reply(json!({
                        "type": GET_SCHEMA, "dest": dest, "seqNo": seq_no, "data": schema
                    })),
                    None => reply(json!({
                        "type": GET_SCHEMA, "dest": dest, "seqNo": null, "data": data
                    })),
                }
            }
            CRED_DEF => {
                state.seq_no += 1;
                let id = format!(
                    "{identifier}:3:{}:{}:{}",
                    str_field(operation, "signature_type"),
                    operation["ref"],
                    str_field(operation, "tag")
                );
                state.cred_defs.insert(id, (state.seq_no, operation.clone()));
                write_reply(CRED_DEF, state.seq_no)
            }
            GET_CRED_DEF => {
                let origin = str_field(operation, "origin");
                let signature_type = str_field(operation, "signature_type");
                let tag = str_field(operation, "tag");
                let id = format!("{origin}:3:{signature_type}:{}:{tag}", operation["ref"]);
                let (seq_no, data) = match state.cred_defs.get(&id) {
                    Some((seq_no, cred_def)) => (json!(seq_no), cred_def["data"].clone()),
                    None => (Value::Null, Value::Null),
                };
                reply(json!({
                    "type": GET_CRED_DEF,
                    "ref": operation["ref"],
                    "signature_type": signature_type,
                    "tag": tag,
                    "origin": origin,
                    "seqNo": seq_no,
                    "data": data
                }))
            }
            other => reqnack(&format!("unsupported transaction type {other}")),
        }
    }
}

#[async_trait]
impl RequestSubmitter for InMemoryTokenPool {
    async fn submit(&self, request: PreparedRequest) -> LedgerResult<String> {
        let mut state = self.state.lock()?;
        state.requests.push(request.req_json.clone());
        Ok(Self::handle(&mut state, &request.req_json))
    }
}
