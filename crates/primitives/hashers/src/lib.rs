//! Hashers used to build call-data digests and transaction commitment
//! hashes. Two functions are in play on the network: Pedersen for the legacy
//! (v1/v2) transaction layouts and Poseidon for the v3 layouts.
pub mod pedersen;
pub mod poseidon;

use saros_felt::Felt;

/// A hash function over field elements.
pub trait HasherT {
    /// Hashes raw bytes by folding them into 31-byte chunks. Used for
    /// protocol-level ASCII strings; each chunk fits the field, so the
    /// per-chunk conversion cannot fail.
    fn hash_bytes(data: &[u8]) -> Felt;

    /// Hashes two elements.
    fn hash_elements(a: Felt, b: Felt) -> Felt;

    /// Hashes an ordered sequence of elements. The sequence length is bound
    /// into the digest, so sequences that merely flatten to the same elements
    /// hash differently.
    fn compute_hash_on_elements(elements: &[Felt]) -> Felt;
}

#[cfg(test)]
mod tests {
    use super::pedersen::PedersenHasher;
    use super::poseidon::PoseidonHasher;
    use super::*;

    #[test]
    fn pedersen_sequence_hash_is_length_suffixed_chain() {
        // h([a, b]) = h(h(h(0, a), b), 2)
        let a = Felt::from(11u8);
        let b = Felt::from(22u8);
        let chained = PedersenHasher::hash_elements(
            PedersenHasher::hash_elements(PedersenHasher::hash_elements(Felt::ZERO, a), b),
            Felt::TWO,
        );
        assert_eq!(PedersenHasher::compute_hash_on_elements(&[a, b]), chained);
    }

    #[test]
    fn sequence_hash_is_length_sensitive() {
        let flat = [Felt::ONE, Felt::TWO];
        let padded = [Felt::ONE, Felt::TWO, Felt::ZERO];
        assert_ne!(
            PedersenHasher::compute_hash_on_elements(&flat),
            PedersenHasher::compute_hash_on_elements(&padded)
        );
        assert_ne!(
            PoseidonHasher::compute_hash_on_elements(&flat),
            PoseidonHasher::compute_hash_on_elements(&padded)
        );
    }

    #[test]
    fn pedersen_and_poseidon_diverge() {
        let data = [Felt::ONE, Felt::TWO, Felt::THREE];
        assert_ne!(
            PedersenHasher::compute_hash_on_elements(&data),
            PoseidonHasher::compute_hash_on_elements(&data)
        );
    }

    #[test]
    fn short_byte_input_is_a_single_chunk() {
        // Fewer than 31 bytes fold into one field element.
        let message = b"deploy_account";
        let as_felt = Felt::from_byte_slice_be(message).unwrap();
        assert_eq!(
            PedersenHasher::hash_bytes(message),
            PedersenHasher::hash_elements(Felt::ZERO, as_felt)
        );
    }
}
