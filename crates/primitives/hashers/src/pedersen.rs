//! Pedersen hash module.
use saros_felt::Felt;
use starknet_core::crypto::compute_hash_on_elements;
use starknet_crypto::{pedersen_hash, FieldElement};

use super::HasherT;

/// The Pedersen hasher.
#[derive(Clone, Copy, Debug, Default)]
pub struct PedersenHasher;

impl HasherT for PedersenHasher {
    fn hash_bytes(data: &[u8]) -> Felt {
        // One byte of headroom per chunk keeps each value below the field
        // modulus: 31 bytes is 248 bits < 2^251 + 17 * 2^192.
        const CHUNK_SIZE: usize = 31;
        let mut hash_value = FieldElement::ZERO;

        for chunk in data.chunks(CHUNK_SIZE) {
            let field_element = FieldElement::from_byte_slice_be(chunk).unwrap();
            hash_value = pedersen_hash(&hash_value, &field_element);
        }

        Felt(hash_value)
    }

    #[inline(always)]
    fn hash_elements(a: Felt, b: Felt) -> Felt {
        Felt(pedersen_hash(&a.0, &b.0))
    }

    /// Hash chain over the sequence with the length appended:
    /// h(h(h(h(0, data\[0\]), data\[1\]), ...), n).
    #[inline]
    fn compute_hash_on_elements(elements: &[Felt]) -> Felt {
        let elements = elements.iter().map(|x| x.0).collect::<Vec<FieldElement>>();
        Felt(compute_hash_on_elements(&elements))
    }
}
