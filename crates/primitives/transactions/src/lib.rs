//! Starknet transaction types, canonical hashing and the intent builder.

pub mod builder;
pub mod compute_hash;
pub mod constants;
pub mod types;

pub use builder::{
    build, BuildError, ChainContext, SignedTransaction, TransactionIntent, TransactionVersion,
    UnsignedTransaction,
};
pub use compute_hash::{derive_contract_address, ComputeTransactionHash};
pub use constants::QUERY_VERSION_OFFSET;
pub use types::{
    encode_calls, BroadcastedTransaction, Call, DataAvailabilityMode, DeclareTransaction,
    DeclareTransactionV2, DeclareTransactionV3, DeployAccountTransaction,
    DeployAccountTransactionV1, DeployAccountTransactionV3, EntryPointsByType, ExecutionEncoding,
    FeeBounds, FlattenedSierraClass, InvokeTransaction, InvokeTransactionV1, InvokeTransactionV3,
    ResourceBounds, ResourceBoundsMapping, SierraEntryPoint,
};
