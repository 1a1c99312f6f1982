//! Runtime ABI model for Starknet contract interfaces.
//!
//! Contract interfaces are discovered at runtime, so argument types are a
//! tagged-variant tree ([`AbiType`]) and values a matching tagged union
//! ([`AbiValue`]); one generic codec pair flattens values to calldata felt
//! sequences and back. There is no generated per-type code path.

mod codec;
mod function;
mod types;

pub use codec::{decode, decode_exact, encode};
pub use function::AbiFunction;
use thiserror::Error;
pub use types::{AbiType, AbiValue};

/// Errors raised while encoding or decoding ABI values.
///
/// All of these are local errors: they are never worth retrying and are
/// surfaced to the caller immediately.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum AbiError {
    /// The felt sequence does not describe a well-formed value of the
    /// requested type.
    #[error("malformed ABI data: {0}")]
    MalformedAbiData(&'static str),
    /// The value's shape does not match the declared type.
    #[error("type mismatch: expected a value of type {expected}")]
    TypeMismatch { expected: String },
    /// Wrong number of arguments for a function signature.
    #[error("wrong arity: expected {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    /// Entry point names must be ASCII to derive a selector.
    #[error("entry point name is not ASCII")]
    NonAsciiName,
}
