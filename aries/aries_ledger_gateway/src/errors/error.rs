use std::time::Duration;

use ledger_types::LedgerTypesError;
use thiserror::Error as ThisError;

use crate::ledger::{fabric::envelope::OperationKind, ledger_kind::LedgerBackendKind};

pub type LedgerResult<T> = Result<T, LedgerError>;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, ThisError)]
pub enum LedgerError {
    #[error("{0} as a ledger is not supported")]
    LedgerNotSupported(String),
    #[error("Gateway configuration is missing: {}", .0.join(", "))]
    ConfigurationMissing(Vec<&'static str>),
    #[error("Connection profile parse error: {0}")]
    ConnectionProfileParse(String),
    #[error("An identity for the admin user {0} does not exist in the identity store")]
    AdminNotEnrolled(String),
    #[error("Failed to sign request with DID {did}: {source}")]
    SigningFailure {
        did: String,
        #[source]
        source: BoxedError,
    },
    #[error("Failed to submit {operation} transaction: {source}")]
    TransactionSubmissionFailure {
        operation: OperationKind,
        #[source]
        source: Box<LedgerError>,
    },
    #[error("Failed to read {operation} transaction: {source}")]
    TransactionReadFailure {
        operation: OperationKind,
        #[source]
        source: Box<LedgerError>,
    },
    #[error("{operation} on the {backend} ledger failed: {source}")]
    LedgerBackendFailure {
        backend: LedgerBackendKind,
        operation: &'static str,
        #[source]
        source: Box<LedgerError>,
    },
    #[error("Gateway is not connected, connect to the network before submitting transactions")]
    GatewayNotConnected,
    #[error("Certificate authority error: {0}")]
    CertificateAuthority(String),
    #[error("Certificate authority did not answer within {0:?}")]
    CertificateAuthorityTimeout(Duration),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("Identity store error: {0}")]
    IdentityStore(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Ledger item not found")]
    LedgerItemNotFound,
    #[error("Invalid ledger response {0}")]
    InvalidLedgerResponse(String),
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid ledger type: {0}")]
    InvalidLedgerType(#[from] LedgerTypesError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Issuer error: {0}")]
    Issuer(String),
    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl LedgerError {
    pub fn signing_failure(
        did: impl Into<String>,
        err: impl Into<BoxedError>,
    ) -> Self {
        Self::SigningFailure {
            did: did.into(),
            source: err.into(),
        }
    }

    /// Wraps a session failure unless it already carries a more specific kind.
    pub fn submission_failure(operation: OperationKind, err: LedgerError) -> Self {
        match err {
            err @ (Self::SigningFailure { .. } | Self::TransactionSubmissionFailure { .. }) => err,
            err => Self::TransactionSubmissionFailure {
                operation,
                source: Box::new(err),
            },
        }
    }

    pub fn read_failure(operation: OperationKind, err: LedgerError) -> Self {
        match err {
            err @ Self::TransactionReadFailure { .. } => err,
            err => Self::TransactionReadFailure {
                operation,
                source: Box::new(err),
            },
        }
    }

    pub fn backend_failure(
        backend: LedgerBackendKind,
        operation: &'static str,
        err: LedgerError,
    ) -> Self {
        match err {
            err @ Self::LedgerBackendFailure { .. } => err,
            err => Self::LedgerBackendFailure {
                backend,
                operation,
                source: Box::new(err),
            },
        }
    }

    /// The error with any backend context peeled off.
    pub fn kind(&self) -> &LedgerError {
        match self {
            Self::LedgerBackendFailure { source, .. } => source.kind(),
            err => err,
        }
    }

    pub fn into_kind(self) -> LedgerError {
        match self {
            Self::LedgerBackendFailure { source, .. } => source.into_kind(),
            err => err,
        }
    }

    /// Backend that produced the error, when it went through the router.
    pub fn backend(&self) -> Option<LedgerBackendKind> {
        match self {
            Self::LedgerBackendFailure { backend, .. } => Some(*backend),
            _ => None,
        }
    }

    /// Errors raised because an ordering step of the write pipeline was skipped.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.kind(),
            Self::ConfigurationMissing(_) | Self::GatewayNotConnected | Self::AdminNotEnrolled(_)
        )
    }
}
