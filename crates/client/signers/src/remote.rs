//! Signer delegating to an HTTP signing service.
//!
//! The service holds the key; this client only ever sends hashes. Expected
//! endpoints: `GET <base>/public_key` returning `{"public_key": "0x..."}`
//! and `POST <base>/sign` with `{"hash": "0x..."}` returning
//! `{"signature": {"r": "0x...", "s": "0x..."}}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use saros_felt::Felt;

use crate::key_pair::VerifyingKey;
use crate::{Signature, Signer};

#[derive(Clone, Debug)]
pub struct RemoteSigner {
    client: reqwest::Client,
    public_key_url: String,
    sign_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteSignerError {
    /// The signing service could not be reached. The account layer may retry
    /// this; the signer itself never does.
    #[error("signing service unavailable: {0}")]
    Unavailable(reqwest::Error),
    /// The service answered but refused to sign.
    #[error("signing service rejected the request with status {status}")]
    Rejected { status: u16 },
    /// The service answered with something that is not a signature.
    #[error("malformed response from signing service: {0}")]
    MalformedResponse(reqwest::Error),
}

#[derive(Serialize)]
struct SignRequest {
    hash: Felt,
}

#[derive(Deserialize)]
struct SignResponse {
    signature: Signature,
}

#[derive(Deserialize)]
struct PublicKeyResponse {
    public_key: Felt,
}

impl RemoteSigner {
    pub fn new(base_url: Url) -> Self {
        let base = base_url.as_str().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            public_key_url: format!("{base}/public_key"),
            sign_url: format!("{base}/sign"),
        }
    }
}

#[async_trait]
impl Signer for RemoteSigner {
    type SignError = RemoteSignerError;

    async fn get_public_key(&self) -> Result<VerifyingKey, Self::SignError> {
        let response = self
            .client
            .get(&self.public_key_url)
            .send()
            .await
            .map_err(RemoteSignerError::Unavailable)?;
        if !response.status().is_success() {
            return Err(RemoteSignerError::Rejected { status: response.status().as_u16() });
        }
        let body: PublicKeyResponse =
            response.json().await.map_err(RemoteSignerError::MalformedResponse)?;
        Ok(VerifyingKey::from_scalar(body.public_key))
    }

    async fn sign_hash(&self, hash: &Felt) -> Result<Signature, Self::SignError> {
        log::debug!("delegating signature of {hash} to remote signer");
        let response = self
            .client
            .post(&self.sign_url)
            .json(&SignRequest { hash: *hash })
            .send()
            .await
            .map_err(RemoteSignerError::Unavailable)?;
        if !response.status().is_success() {
            return Err(RemoteSignerError::Rejected { status: response.status().as_u16() });
        }
        let body: SignResponse =
            response.json().await.map_err(RemoteSignerError::MalformedResponse)?;
        Ok(body.signature)
    }

    /// Transient transport failures are worth a bounded retry upstream.
    fn is_retryable(&self) -> bool {
        true
    }
}
