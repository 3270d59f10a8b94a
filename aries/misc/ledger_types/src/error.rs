use thiserror::Error as ThisError;

pub type LedgerTypesResult<T> = Result<T, LedgerTypesError>;

#[derive(Debug, ThisError)]
pub enum LedgerTypesError {
    #[error("type: {kind}, identifier: {value} is invalid. It MUST be a URI or legacy identifier.")]
    InvalidIdentifier { kind: &'static str, value: String },
    #[error("Invalid attributes: {0}")]
    InvalidAttributes(String),
    #[error("Invalid signature type: {0}")]
    InvalidSignatureType(String),
}
