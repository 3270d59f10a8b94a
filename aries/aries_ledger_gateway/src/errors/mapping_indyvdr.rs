use indy_vdr::{
    common::error::{VdrError, VdrErrorKind},
    utils::ValidationError,
};

use crate::errors::error::LedgerError;

impl From<VdrError> for LedgerError {
    fn from(err: VdrError) -> Self {
        match err.kind() {
            VdrErrorKind::Config => Self::InvalidConfiguration(err.to_string()),
            VdrErrorKind::Connection | VdrErrorKind::FileSystem => {
                Self::UnknownError(err.to_string())
            }
            VdrErrorKind::Input => Self::InvalidInput(err.to_string()),
            VdrErrorKind::Resource
            | VdrErrorKind::Unavailable
            | VdrErrorKind::Unexpected
            | VdrErrorKind::Incompatible
            | VdrErrorKind::PoolNoConsensus
            | VdrErrorKind::Resolver
            | VdrErrorKind::PoolTimeout => Self::UnknownError(err.to_string()),
            VdrErrorKind::PoolRequestFailed(_) => Self::InvalidLedgerResponse(err.to_string()),
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::InvalidInput(err.to_string())
    }
}
