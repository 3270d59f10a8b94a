/// Ledger view of a public DID: the verkey it is bound to and its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NymRecord {
    pub did: String,
    #[serde(default)]
    pub verkey: Option<String>,
    /// Numeric role code as the ledger stores it (e.g. `"101"` for ENDORSER).
    #[serde(default)]
    pub role: Option<String>,
}
