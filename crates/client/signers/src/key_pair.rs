//! Local STARK-curve key pair.

use saros_felt::Felt;
use starknet_crypto::{ecdsa_sign, ecdsa_verify, get_public_key};
use thiserror::Error;

use crate::Signature;

/// A private signing key. The scalar never leaves this type: the only
/// operations are signing a hash and deriving the verifying key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningKey {
    secret_scalar: Felt,
}

/// A public key against which signatures are verified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    scalar: Felt,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum EcdsaSignError {
    /// The key material is degenerate and cannot sign anything.
    #[error("invalid signing key")]
    InvalidKey,
    /// Hashes must be smaller than `2^251` to be signable.
    #[error("message hash out of range")]
    MessageHashOutOfRange,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum EcdsaVerifyError {
    #[error("message hash out of range")]
    MessageHashOutOfRange,
    /// The signature's `r` or `s` value is outside the valid range.
    #[error("signature out of range")]
    SignatureOutOfRange,
}

impl SigningKey {
    pub fn from_secret_scalar(secret_scalar: Felt) -> Self {
        Self { secret_scalar }
    }

    /// Signs a transaction hash with a deterministic (RFC 6979) nonce:
    /// identical key and hash always produce the identical signature.
    pub fn sign(&self, hash: &Felt) -> Result<Signature, EcdsaSignError> {
        if self.secret_scalar == Felt::ZERO {
            return Err(EcdsaSignError::InvalidKey);
        }
        match ecdsa_sign(&self.secret_scalar.0, &hash.0) {
            Ok(extended) => Ok(Signature { r: Felt(extended.r), s: Felt(extended.s) }),
            Err(_) => Err(EcdsaSignError::MessageHashOutOfRange),
        }
    }

    /// Derives the matching verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey { scalar: Felt(get_public_key(&self.secret_scalar.0)) }
    }
}

impl VerifyingKey {
    pub fn from_scalar(scalar: Felt) -> Self {
        Self { scalar }
    }

    pub fn scalar(&self) -> Felt {
        self.scalar
    }

    /// Checks a signature over a hash. Returns `Ok(false)` for a well-formed
    /// signature that simply does not match; malformed signatures and
    /// out-of-range hashes are errors.
    pub fn verify(&self, hash: &Felt, signature: &Signature) -> Result<bool, EcdsaVerifyError> {
        let signature = starknet_crypto::Signature { r: signature.r.0, s: signature.s.0 };
        match ecdsa_verify(&self.scalar.0, &hash.0, &signature) {
            Ok(valid) => Ok(valid),
            Err(starknet_crypto::VerifyError::InvalidMessageHash) => {
                Err(EcdsaVerifyError::MessageHashOutOfRange)
            }
            Err(_) => Err(EcdsaVerifyError::SignatureOutOfRange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Key pair published in a devnet genesis configuration.
    const PRIVATE: &str = "0x00c1cf1490de1352865301bb8705143f3ef938f97fdf892f1090dcb5ac7bcd1d";
    const PUBLIC: &str = "0x03603a2692a2ae60abb343e832ee53b55d6b25f02a3ef1565ec691edc7a209b2";

    fn signing_key() -> SigningKey {
        SigningKey::from_secret_scalar(Felt::from_hex_be(PRIVATE).unwrap())
    }

    #[test]
    fn public_key_derivation_matches_known_pair() {
        assert_eq!(signing_key().verifying_key().scalar(), Felt::from_hex_be(PUBLIC).unwrap());
    }

    #[test]
    fn sign_verify_round_trip() {
        let key = signing_key();
        let hash = Felt::from_hex_be("0x062633b1f3d64708df3d0d44706b388f841ed4534346be6ad60336c8eb2f4b3e")
            .unwrap();

        let signature = key.sign(&hash).unwrap();
        assert!(key.verifying_key().verify(&hash, &signature).unwrap());
    }

    #[test]
    fn signing_is_deterministic() {
        let key = signing_key();
        let hash = Felt::from(1234u64);
        assert_eq!(key.sign(&hash).unwrap(), key.sign(&hash).unwrap());
    }

    #[test]
    fn verify_rejects_a_flipped_hash() {
        let key = signing_key();
        let hash = Felt::from(1234u64);
        let signature = key.sign(&hash).unwrap();

        let flipped = hash + Felt::ONE;
        assert!(!key.verifying_key().verify(&flipped, &signature).unwrap());
    }

    #[test]
    fn verify_rejects_a_tampered_signature() {
        let key = signing_key();
        let hash = Felt::from(1234u64);
        let signature = key.sign(&hash).unwrap();

        let tampered = Signature { r: signature.r + Felt::ONE, s: signature.s };
        assert!(!key.verifying_key().verify(&hash, &tampered).unwrap());
    }

    #[test]
    fn wrong_public_key_does_not_verify() {
        let key = signing_key();
        let hash = Felt::from(1234u64);
        let signature = key.sign(&hash).unwrap();

        let other = SigningKey::from_secret_scalar(Felt::from(99u8)).verifying_key();
        assert!(!other.verify(&hash, &signature).unwrap());
    }

    #[test]
    fn zero_key_cannot_sign() {
        let key = SigningKey::from_secret_scalar(Felt::ZERO);
        assert_eq!(key.sign(&Felt::ONE), Err(EcdsaSignError::InvalidKey));
    }

    #[test]
    fn oversized_hash_is_rejected() {
        // 2^251 is outside the signable range.
        let key = signing_key();
        let hash = Felt::from_hex_be("0x800000000000000000000000000000000000000000000000000000000000000")
            .unwrap();
        assert_eq!(key.sign(&hash), Err(EcdsaSignError::MessageHashOutOfRange));
    }
}
