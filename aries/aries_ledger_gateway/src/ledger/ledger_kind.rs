use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::error::LedgerError;

/// Closed set of ledger backends the router can dispatch to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LedgerBackendKind {
    /// Indy-style ledger accepting signed write requests directly.
    TokenLedger,
    /// Fabric network reached through chaincode behind a gateway.
    SmartContractLedger,
}

impl LedgerBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenLedger => "indy",
            Self::SmartContractLedger => "fabric",
        }
    }
}

impl FromStr for LedgerBackendKind {
    type Err = LedgerError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "indy" | "token" => Ok(Self::TokenLedger),
            "fabric" | "smart-contract" => Ok(Self::SmartContractLedger),
            other => Err(LedgerError::LedgerNotSupported(other.to_string())),
        }
    }
}

impl TryFrom<String> for LedgerBackendKind {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LedgerBackendKind> for String {
    fn from(kind: LedgerBackendKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for LedgerBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        assert_eq!(
            "indy".parse::<LedgerBackendKind>().unwrap(),
            LedgerBackendKind::TokenLedger
        );
        assert_eq!(
            "token".parse::<LedgerBackendKind>().unwrap(),
            LedgerBackendKind::TokenLedger
        );
        assert_eq!(
            "fabric".parse::<LedgerBackendKind>().unwrap(),
            LedgerBackendKind::SmartContractLedger
        );
        assert_eq!(
            "smart-contract".parse::<LedgerBackendKind>().unwrap(),
            LedgerBackendKind::SmartContractLedger
        );
    }

    #[test]
    fn test_unknown_tags_are_not_supported() {
        for tag in ["", "besu", "Indy", "FABRIC", "ethereum"] {
            let err = tag.parse::<LedgerBackendKind>().unwrap_err();
            assert!(
                matches!(&err, LedgerError::LedgerNotSupported(t) if t == tag),
                "unexpected error for {tag:?}: {err}"
            );
        }
    }

    #[test]
    fn test_serde_uses_tags() {
        let kind: LedgerBackendKind = serde_json::from_str("\"fabric\"").unwrap();
        assert_eq!(kind, LedgerBackendKind::SmartContractLedger);
        assert!(serde_json::from_str::<LedgerBackendKind>("\"besu\"").is_err());
        assert_eq!(
            serde_json::to_string(&LedgerBackendKind::TokenLedger).unwrap(),
            "\"indy\""
        );
    }
}
