//! Parsing of token-ledger replies into ledger records.
use ledger_types::{
    identifiers::{cred_def_id::CredentialDefinitionId, schema_id::SchemaId},
    ledger::{
        cred_def::{CredentialDefinition, CredentialDefinitionData, SignatureType},
        nym::NymRecord,
        schema::{AttributeNames, Schema, SCHEMA_VER},
    },
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::error::{LedgerError, LedgerResult};

#[derive(Deserialize)]
#[serde(tag = "op")]
enum Message {
    #[serde(rename = "REPLY")]
    Reply { result: Value },
    #[serde(rename = "REQNACK")]
    ReqNack { reason: Option<String> },
    #[serde(rename = "REJECT")]
    Reject { reason: Option<String> },
}

fn reply_result(response: &str) -> LedgerResult<Value> {
    let message: Message = serde_json::from_str(response)
        .map_err(|err| LedgerError::InvalidLedgerResponse(format!("{err}: {response}")))?;
    match message {
        Message::Reply { result } => Ok(result),
        Message::ReqNack { reason } | Message::Reject { reason } => Err(
            LedgerError::InvalidLedgerResponse(reason.unwrap_or_else(|| response.to_string())),
        ),
    }
}

fn parse_result<T>(result: Value) -> LedgerResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(result).map_err(|err| LedgerError::InvalidLedgerResponse(err.to_string()))
}

#[derive(Deserialize)]
struct WriteResult {
    #[serde(rename = "txnMetadata")]
    txn_metadata: TxnMetadata,
}

#[derive(Deserialize)]
struct TxnMetadata {
    #[serde(rename = "seqNo")]
    seq_no: u32,
}

/// Sequence number the ledger assigned to a written transaction.
pub fn parse_write_response(response: &str) -> LedgerResult<u32> {
    let result: WriteResult = parse_result(reply_result(response)?)?;
    Ok(result.txn_metadata.seq_no)
}

#[derive(Deserialize)]
struct GetNymResult {
    data: Option<String>,
}

#[derive(Deserialize)]
struct GetNymData {
    dest: String,
    verkey: Option<String>,
    role: Option<String>,
}

pub fn parse_get_nym_response(response: &str) -> LedgerResult<NymRecord> {
    let result: GetNymResult = parse_result(reply_result(response)?)?;
    let data = result.data.ok_or(LedgerError::LedgerItemNotFound)?;
    let nym: GetNymData = serde_json::from_str(&data)
        .map_err(|err| LedgerError::InvalidLedgerResponse(format!("GET_NYM data: {err}")))?;
    Ok(NymRecord {
        did: nym.dest,
        verkey: nym.verkey,
        role: nym.role,
    })
}

#[derive(Deserialize)]
struct GetSchemaResult {
    #[serde(rename = "seqNo")]
    seq_no: Option<u32>,
    dest: String,
    data: Option<GetSchemaData>,
}

#[derive(Deserialize)]
struct GetSchemaData {
    name: String,
    version: String,
    #[serde(default)]
    attr_names: Option<Vec<String>>,
}

pub fn parse_get_schema_response(response: &str) -> LedgerResult<Schema> {
    let result: GetSchemaResult = parse_result(reply_result(response)?)?;
    // the ledger echoes name and version for unknown schemas, without attributes
    let (seq_no, data) = match (result.seq_no, result.data) {
        (Some(seq_no), Some(data)) if data.attr_names.is_some() => (seq_no, data),
        _ => return Err(LedgerError::LedgerItemNotFound),
    };
    Ok(Schema {
        id: SchemaId::new_legacy(&result.dest, &data.name, &data.version),
        name: data.name,
        version: data.version,
        attr_names: AttributeNames(data.attr_names.unwrap_or_default()),
        seq_no: Some(seq_no),
        ver: SCHEMA_VER.to_string(),
    })
}

#[derive(Deserialize)]
struct GetCredDefResult {
    #[serde(rename = "ref")]
    schema_ref: u32,
    signature_type: String,
    tag: Option<String>,
    origin: String,
    data: Option<CredentialDefinitionData>,
}

pub fn parse_get_cred_def_response(response: &str) -> LedgerResult<CredentialDefinition> {
    let result: GetCredDefResult = parse_result(reply_result(response)?)?;
    let value = result.data.ok_or(LedgerError::LedgerItemNotFound)?;
    let signature_type: SignatureType = result.signature_type.parse()?;
    let tag = result.tag.unwrap_or_default();
    let schema_ref = result.schema_ref.to_string();
    Ok(CredentialDefinition {
        id: CredentialDefinitionId::new_legacy(
            &result.origin,
            signature_type.as_str(),
            &schema_ref,
            &tag,
        ),
        schema_id: SchemaId::new_unchecked(schema_ref),
        signature_type,
        tag,
        value,
        ver: SCHEMA_VER.to_string(),
    })
}
