//! Poseidon hash module.
use saros_felt::Felt;
use starknet_crypto::{poseidon_hash, poseidon_hash_many, FieldElement};

use super::HasherT;

/// The Poseidon hasher.
#[derive(Clone, Copy, Debug, Default)]
pub struct PoseidonHasher;

impl HasherT for PoseidonHasher {
    fn hash_bytes(data: &[u8]) -> Felt {
        // Same 31-byte chunking as the Pedersen variant; the sponge absorbs
        // the chunk count, so no explicit length suffix is needed.
        const CHUNK_SIZE: usize = 31;
        let chunks = data.chunks(CHUNK_SIZE);

        let mut elements: Vec<FieldElement> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            elements.push(FieldElement::from_byte_slice_be(chunk).unwrap());
        }

        Felt(poseidon_hash_many(&elements))
    }

    #[inline(always)]
    fn hash_elements(a: Felt, b: Felt) -> Felt {
        Felt(poseidon_hash(a.0, b.0))
    }

    #[inline]
    fn compute_hash_on_elements(elements: &[Felt]) -> Felt {
        let elements = elements.iter().map(|x| x.0).collect::<Vec<FieldElement>>();
        Felt(poseidon_hash_many(&elements))
    }
}
