use std::sync::PoisonError;

use super::error::LedgerError;

impl<T> From<PoisonError<T>> for LedgerError {
    fn from(err: PoisonError<T>) -> Self {
        LedgerError::InvalidState(err.to_string())
    }
}
