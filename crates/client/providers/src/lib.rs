//! The RPC collaborator surface: what the account layer needs from a node.
//!
//! [`Provider`] is the abstract capability (nonce, call, fee estimation,
//! submission, receipts); [`JsonRpcClient`] is the HTTP implementation.
//! Remote failures keep the node's original error code and message so no
//! information is lost on the way up.

mod jsonrpc;
mod types;

use async_trait::async_trait;
pub use jsonrpc::JsonRpcClient;
use saros_felt::Felt;
use saros_transactions::{
    BroadcastedTransaction, DeclareTransaction, DeployAccountTransaction, InvokeTransaction,
};
use thiserror::Error;
pub use types::{
    BlockId, BlockTag, DeclareTransactionResult, DeployAccountTransactionResult, FeeEstimate,
    FunctionCall, InvokeTransactionResult, TransactionExecutionStatus, TransactionFinalityStatus,
    TransactionReceipt,
};

/// Error codes of the node API, from the published RPC specification.
pub mod error_codes {
    pub const FAILED_TO_RECEIVE_TXN: i64 = 1;
    pub const CONTRACT_NOT_FOUND: i64 = 20;
    pub const BLOCK_NOT_FOUND: i64 = 24;
    pub const INVALID_TXN_INDEX: i64 = 27;
    pub const CLASS_HASH_NOT_FOUND: i64 = 28;
    pub const TXN_HASH_NOT_FOUND: i64 = 29;
    pub const PAGE_SIZE_TOO_BIG: i64 = 31;
    pub const NO_BLOCKS: i64 = 32;
    pub const INVALID_CONTINUATION_TOKEN: i64 = 33;
    pub const TOO_MANY_KEYS_IN_FILTER: i64 = 34;
    pub const CONTRACT_ERROR: i64 = 40;
    pub const INVALID_CONTRACT_CLASS: i64 = 50;
    pub const CLASS_ALREADY_DECLARED: i64 = 51;
    pub const INVALID_TRANSACTION_NONCE: i64 = 52;
    pub const INSUFFICIENT_MAX_FEE: i64 = 53;
    pub const INSUFFICIENT_ACCOUNT_BALANCE: i64 = 54;
    pub const VALIDATION_FAILURE: i64 = 55;
    pub const COMPILATION_FAILED: i64 = 56;
    pub const DUPLICATE_TX: i64 = 59;
    pub const UNSUPPORTED_TX_VERSION: i64 = 61;
    pub const UNEXPECTED_ERROR: i64 = 63;
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The node rejected the request; the original code and message are
    /// preserved verbatim.
    #[error("node error {code}: {message}")]
    StarknetError { code: i64, message: String },
    /// The node asked us to back off.
    #[error("rate limited by the node")]
    RateLimited,
    /// The request never produced a node answer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The node answered something outside the protocol.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ProviderError {
    /// Whether this is the one remote rejection the account layer re-fetches
    /// the nonce and retries for. A duplicate-transaction rejection counts:
    /// it is what the losing side of a concurrent-send race sees when the
    /// identical payload already landed, and a fresh nonce resolves it.
    pub fn is_nonce_conflict(&self) -> bool {
        matches!(
            self,
            ProviderError::StarknetError { code, .. }
                if *code == error_codes::INVALID_TRANSACTION_NONCE
                    || *code == error_codes::DUPLICATE_TX
        )
    }
}

/// The node capability the account pipeline consumes. Every method is a
/// suspension point; implementations must be usable concurrently from many
/// account flows.
#[async_trait]
pub trait Provider {
    /// The chain identifier the node is serving.
    async fn chain_id(&self) -> Result<Felt, ProviderError>;

    /// The current nonce of a contract.
    async fn get_nonce(&self, block_id: BlockId, contract_address: Felt)
        -> Result<Felt, ProviderError>;

    /// Calls a read-only entry point; the returned felts are a contiguous
    /// buffer of the declared outputs.
    async fn call(&self, request: &FunctionCall, block_id: BlockId)
        -> Result<Vec<Felt>, ProviderError>;

    /// Estimates fees for query-only transactions, one estimate per input.
    async fn estimate_fee(
        &self,
        transactions: &[BroadcastedTransaction],
        block_id: BlockId,
    ) -> Result<Vec<FeeEstimate>, ProviderError>;

    async fn add_invoke_transaction(
        &self,
        transaction: &InvokeTransaction,
    ) -> Result<InvokeTransactionResult, ProviderError>;

    async fn add_declare_transaction(
        &self,
        transaction: &DeclareTransaction,
    ) -> Result<DeclareTransactionResult, ProviderError>;

    async fn add_deploy_account_transaction(
        &self,
        transaction: &DeployAccountTransaction,
    ) -> Result<DeployAccountTransactionResult, ProviderError>;

    async fn get_transaction_receipt(
        &self,
        transaction_hash: Felt,
    ) -> Result<TransactionReceipt, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_conflict_recognition() {
        let conflict = ProviderError::StarknetError {
            code: error_codes::INVALID_TRANSACTION_NONCE,
            message: "Invalid transaction nonce".to_string(),
        };
        assert!(conflict.is_nonce_conflict());

        let duplicate = ProviderError::StarknetError {
            code: error_codes::DUPLICATE_TX,
            message: "A transaction with the same hash already exists in the mempool".to_string(),
        };
        assert!(duplicate.is_nonce_conflict());

        let other = ProviderError::StarknetError {
            code: error_codes::VALIDATION_FAILURE,
            message: "Account validation failed".to_string(),
        };
        assert!(!other.is_nonce_conflict());
        assert!(!ProviderError::RateLimited.is_nonce_conflict());
    }
}
