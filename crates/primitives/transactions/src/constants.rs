//! Domain tags and version constants fixed by the network specification.

use saros_felt::Felt;
use starknet_ff::FieldElement;

/// Domain tag for invoke transaction hashes.
pub const INVOKE_PREFIX: &[u8] = b"invoke";
/// Domain tag for declare transaction hashes.
pub const DECLARE_PREFIX: &[u8] = b"declare";
/// Domain tag for deploy-account transaction hashes.
pub const DEPLOY_ACCOUNT_PREFIX: &[u8] = b"deploy_account";

/// Resource names bound into the v3 fee hash.
pub const L1_GAS: &[u8] = b"L1_GAS";
pub const L2_GAS: &[u8] = b"L2_GAS";

/// Version offset (`2^128`) marking query-only transactions, used when
/// estimating or simulating so the payload can never be replayed for real.
pub const QUERY_VERSION_OFFSET: Felt = Felt(FieldElement::from_mont([
    18446744073700081665,
    17407,
    18446744073709551584,
    576460752142434320,
]));

/// Felt encoding of an ASCII domain tag.
pub(crate) fn prefix_as_felt(prefix: &[u8]) -> Felt {
    // Tags are at most 14 bytes, far below the 31-byte field capacity.
    Felt::from_byte_slice_be(prefix).unwrap()
}

/// The version field of a transaction: the base version, offset into the
/// query range for query-only payloads.
pub(crate) fn transaction_version(base: u8, query_only: bool) -> Felt {
    let base = Felt::from(base);
    if query_only { QUERY_VERSION_OFFSET + base } else { base }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_version_offset_is_2_pow_128() {
        let expected = Felt::from_hex_be("0x100000000000000000000000000000000").unwrap();
        assert_eq!(QUERY_VERSION_OFFSET, expected);
    }

    #[test]
    fn version_felts() {
        assert_eq!(transaction_version(1, false), Felt::ONE);
        assert_eq!(
            transaction_version(1, true).to_hex(),
            "0x100000000000000000000000000000001"
        );
        assert_eq!(
            transaction_version(3, true).to_hex(),
            "0x100000000000000000000000000000003"
        );
    }
}
