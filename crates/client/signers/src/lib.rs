//! Signers produce STARK-curve ECDSA signatures over transaction hashes.
//!
//! A signer owns its key material exclusively: callers hand it hashes and
//! receive signatures, nothing else crosses the boundary. Two variants are
//! provided, a [`LocalWallet`] over an in-process key and a [`RemoteSigner`]
//! delegating to a signing service. Signers never retry on their own; whether
//! a failure is worth retrying is reported through
//! [`Signer::is_retryable`] and acted on by the account layer.

mod key_pair;
mod local_wallet;
mod remote;

use async_trait::async_trait;
pub use key_pair::{EcdsaSignError, EcdsaVerifyError, SigningKey, VerifyingKey};
pub use local_wallet::LocalWallet;
pub use remote::{RemoteSigner, RemoteSignerError};
use saros_felt::Felt;
use serde::{Deserialize, Serialize};

/// A STARK-curve ECDSA signature, bound to exactly one transaction hash and
/// one public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub r: Felt,
    pub s: Felt,
}

/// Wire form: the flat `[r, s]` felt list carried by a transaction.
impl From<Signature> for Vec<Felt> {
    fn from(signature: Signature) -> Self {
        vec![signature.r, signature.s]
    }
}

impl core::fmt::Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.r, self.s)
    }
}

/// Anything that can sign transaction hashes on behalf of an account.
#[async_trait]
pub trait Signer {
    type SignError: std::error::Error + Send + Sync;

    /// The verifying key matching the signing key this signer holds.
    async fn get_public_key(&self) -> Result<VerifyingKey, Self::SignError>;

    /// Signs a transaction hash. Failures are surfaced to the caller; a
    /// signer never retries internally.
    async fn sign_hash(&self, hash: &Felt) -> Result<Signature, Self::SignError>;

    /// Whether the account layer may retry a failed signing attempt.
    /// Deterministic local signing never benefits from a retry; transports
    /// to delegated signers may.
    fn is_retryable(&self) -> bool {
        false
    }
}
