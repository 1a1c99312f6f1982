//! In-process signer over a [`SigningKey`].

use async_trait::async_trait;

use saros_felt::Felt;

use crate::key_pair::{EcdsaSignError, SigningKey, VerifyingKey};
use crate::{Signature, Signer};

/// A signer holding its key in process memory.
#[derive(Clone, Debug)]
pub struct LocalWallet {
    signing_key: SigningKey,
}

impl LocalWallet {
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl From<SigningKey> for LocalWallet {
    fn from(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }
}

#[async_trait]
impl Signer for LocalWallet {
    type SignError = EcdsaSignError;

    async fn get_public_key(&self) -> Result<VerifyingKey, Self::SignError> {
        Ok(self.signing_key.verifying_key())
    }

    async fn sign_hash(&self, hash: &Felt) -> Result<Signature, Self::SignError> {
        self.signing_key.sign(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wallet_signs_like_its_key() {
        let key = SigningKey::from_secret_scalar(Felt::from(12345u64));
        let wallet = LocalWallet::from(key.clone());
        let hash = Felt::from(67890u64);

        assert_eq!(wallet.sign_hash(&hash).await.unwrap(), key.sign(&hash).unwrap());
        assert_eq!(wallet.get_public_key().await.unwrap(), key.verifying_key());
        assert!(!wallet.is_retryable());
    }
}
