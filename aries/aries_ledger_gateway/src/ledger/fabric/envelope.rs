use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ledger::request_signer::SignedRequest;

/// Kind of ledger object a chaincode transaction carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Nym,
    Schema,
    CredentialDefinition,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nym => "nym",
            Self::Schema => "schema",
            Self::CredentialDefinition => "credentialDefinition",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChaincodeFunction {
    CreateTransaction,
    ReadTransaction,
}

impl ChaincodeFunction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTransaction => "CreateTransaction",
            Self::ReadTransaction => "ReadTransaction",
        }
    }
}

impl fmt::Display for ChaincodeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chaincode call arguments for one operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEnvelope {
    function: ChaincodeFunction,
    operation: OperationKind,
    payload: String,
    network_name: Option<String>,
}

impl TransactionEnvelope {
    /// Network name is attached to nym writes only.
    pub fn write(operation: OperationKind, signed_request: &SignedRequest, network_name: &str) -> Self {
        Self {
            function: ChaincodeFunction::CreateTransaction,
            operation,
            payload: signed_request.to_payload(),
            network_name: (operation == OperationKind::Nym).then(|| network_name.to_string()),
        }
    }

    pub fn read(operation: OperationKind, id: &str) -> Self {
        Self {
            function: ChaincodeFunction::ReadTransaction,
            operation,
            payload: id.to_string(),
            network_name: None,
        }
    }

    pub fn function(&self) -> ChaincodeFunction {
        self.function
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn network_name(&self) -> Option<&str> {
        self.network_name.as_deref()
    }

    /// Ordered string arguments of the chaincode call.
    pub fn arguments(&self) -> Vec<String> {
        match self.function {
            ChaincodeFunction::CreateTransaction => vec![
                self.payload.clone(),
                self.operation.to_string(),
                self.network_name.clone().unwrap_or_default(),
            ],
            ChaincodeFunction::ReadTransaction => {
                vec![self.payload.clone(), self.operation.to_string()]
            }
        }
    }
}
