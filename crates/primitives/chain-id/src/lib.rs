//! Well-known chain identifiers.
//!
//! A chain id is the ASCII short-string encoding of the network name. The
//! constants below need to be usable in constant contexts, which rules out
//! the runtime byte-slice conversion, hence `from_mont`.

use saros_felt::{Felt, FeltError};

/// Chain id for Starknet mainnet (`SN_MAIN`).
pub const SN_MAIN_CHAIN_ID: Felt = Felt(starknet_ff::FieldElement::from_mont([
    17696389056366564951,
    18446744073709551615,
    18446744073709551615,
    502562008147966918,
]));

/// Chain id for the Starknet Goerli testnet (`SN_GOERLI`).
pub const SN_GOERLI_CHAIN_ID: Felt = Felt(starknet_ff::FieldElement::from_mont([
    3753493103916128178,
    18446744073709548950,
    18446744073709551615,
    398700013197595345,
]));

/// Encodes an arbitrary network name (for example a custom devnet's) as its
/// chain id felt.
pub fn chain_id_from_name(name: &str) -> Result<Felt, FeltError> {
    Felt::from_short_string(name)
}

#[cfg(test)]
mod tests;
