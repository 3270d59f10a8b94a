use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use indy_vdr::pool::PreparedRequest;
use log::{debug, trace};

use crate::{
    errors::error::{LedgerError, LedgerResult},
    wallet::SigningWallet,
};

/// A ledger request carrying the submitter's signature. The embedded request
/// JSON already contains the signature field, so it can be sent as-is to a
/// token ledger or wrapped into a chaincode envelope.
pub struct SignedRequest {
    signer_did: String,
    signature: Vec<u8>,
    request: PreparedRequest,
}

impl SignedRequest {
    pub fn signer_did(&self) -> &str {
        &self.signer_did
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn request_json(&self) -> &serde_json::Value {
        &self.request.req_json
    }

    /// Serialized form placed as the payload of a chaincode write.
    pub fn to_payload(&self) -> String {
        self.request.req_json.to_string()
    }

    pub fn into_prepared_request(self) -> PreparedRequest {
        self.request
    }
}

impl Debug for SignedRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedRequest")
            .field("signer_did", &self.signer_did)
            .field("request", &self.request.req_json)
            .finish()
    }
}

#[async_trait]
pub trait RequestSigner: Debug + Send + Sync {
    async fn sign(&self, did: &str, request: PreparedRequest) -> LedgerResult<SignedRequest>;
}

/// Signs ledger requests with keys held by a [`SigningWallet`].
#[derive(Debug)]
pub struct WalletRequestSigner<W>
where
    W: SigningWallet,
{
    wallet: W,
}

impl<W> WalletRequestSigner<W>
where
    W: SigningWallet,
{
    pub fn new(wallet: W) -> Self {
        Self { wallet }
    }
}

#[async_trait]
impl<W> RequestSigner for WalletRequestSigner<W>
where
    W: SigningWallet,
{
    async fn sign(&self, did: &str, request: PreparedRequest) -> LedgerResult<SignedRequest> {
        debug!("sign >> did: {did}");
        let mut request = request;
        let to_sign = request
            .get_signature_input()
            .map_err(|err| LedgerError::signing_failure(did, err))?;
        trace!("sign >> signature input: {to_sign}");
        let signature = self
            .wallet
            .sign(did, to_sign.as_bytes())
            .await
            .map_err(|err| LedgerError::signing_failure(did, err))?;
        request
            .set_signature(&signature)
            .map_err(|err| LedgerError::signing_failure(did, err))?;
        debug!("sign << request signed by {did}");
        Ok(SignedRequest {
            signer_did: did.to_string(),
            signature,
            request,
        })
    }
}
