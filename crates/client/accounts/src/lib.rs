//! Account layer: the façade that turns caller intent into submitted
//! transactions.
//!
//! One `send` resolves the nonce and fee (from explicit overrides or the
//! node), builds and signs exactly one transaction, and submits it. Batched
//! calls become a single multicall transaction: one nonce, one signature,
//! one submission.
//!
//! # Concurrency
//!
//! Concurrent sends from the *same* account race on the account's nonce; the
//! account does not serialize them. Callers that need strict nonce ordering
//! must await each submission before starting the next. Flows for different
//! accounts are independent and may run concurrently freely.

pub mod blocking;
mod declaration;
mod execution;
mod factory;
mod single_owner;

use std::time::Duration;

use async_trait::async_trait;
pub use declaration::Declaration;
pub use execution::Execution;
pub use factory::{AccountDeployment, OpenZeppelinAccountFactory};
use saros_abi::{AbiError, AbiFunction, AbiValue};
use saros_felt::Felt;
use saros_providers::{
    BlockId, BlockTag, FunctionCall, Provider, ProviderError, TransactionReceipt,
};
use saros_transactions::{BuildError, Call, ExecutionEncoding};
pub use single_owner::SingleOwnerAccount;
use thiserror::Error;

/// Something that can sign transactions for a fixed address on a fixed
/// chain.
#[async_trait]
pub trait Account {
    type SignError: std::error::Error + Send + Sync;

    fn address(&self) -> Felt;

    fn chain_id(&self) -> Felt;

    /// How this account's contract expects batched calls to be flattened.
    fn execution_encoding(&self) -> ExecutionEncoding;

    /// Signs a transaction hash, returning the wire-form signature.
    async fn sign_hash(&self, hash: &Felt) -> Result<Vec<Felt>, Self::SignError>;

    /// Whether a failed signing attempt may be retried.
    fn is_signer_retryable(&self) -> bool {
        false
    }

    /// Starts a multicall execution from this account.
    fn execute(&self, calls: Vec<Call>) -> Execution<'_, Self>
    where
        Self: Sized,
    {
        Execution::new(calls, self)
    }

    /// Starts a class declaration from this account.
    fn declare(
        &self,
        contract_class: std::sync::Arc<saros_transactions::FlattenedSierraClass>,
        class_hash: Felt,
        compiled_class_hash: Felt,
    ) -> Declaration<'_, Self>
    where
        Self: Sized,
    {
        Declaration::new(contract_class, class_hash, compiled_class_hash, self)
    }
}

/// An [`Account`] that also has a node connection, and can therefore resolve
/// its own nonce and fees.
#[async_trait]
pub trait ConnectedAccount: Account {
    type Provider: Provider + Sync;

    fn provider(&self) -> &Self::Provider;

    /// Block the account reads chain state against.
    fn block_id(&self) -> BlockId {
        BlockId::Tag(BlockTag::Latest)
    }

    /// Retry policy applied to nonce-conflict rejections.
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    async fn get_nonce(&self) -> Result<Felt, ProviderError> {
        self.provider().get_nonce(self.block_id(), self.address()).await
    }
}

/// Bounded retry applied when the node reports a nonce conflict: re-fetch
/// the nonce, rebuild, re-sign, resubmit, with a fixed pause between
/// attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, backoff: Duration::from_millis(200) }
    }
}

/// Errors of the account façade. Remote errors keep the node's original
/// code and message; nothing is swallowed.
#[derive(Debug, Error)]
pub enum AccountError<S> {
    #[error("signing error: {0}")]
    Signing(S),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("build error: {0}")]
    Build(#[from] BuildError),
    #[error("encoding error: {0}")]
    Encoding(#[from] AbiError),
    #[error("estimated fee overflows the fee bound type")]
    FeeOutOfRange,
}

/// Errors of a read-only contract call.
#[derive(Debug, Error)]
pub enum ContractCallError {
    #[error(transparent)]
    Encoding(#[from] AbiError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Calls a read-only entry point through its declared interface: encodes the
/// arguments, runs the call, decodes the response buffer into the declared
/// return values.
pub async fn call_contract<P: Provider + Sync>(
    provider: &P,
    contract_address: Felt,
    function: &AbiFunction,
    arguments: &[AbiValue],
    block_id: BlockId,
) -> Result<Vec<AbiValue>, ContractCallError> {
    let request = FunctionCall {
        contract_address,
        entry_point_selector: function.selector()?,
        calldata: function.encode_inputs(arguments)?,
    };
    let output = provider.call(&request, block_id).await?;
    Ok(function.decode_outputs(&output)?)
}

/// Polls for a transaction receipt until the node has one. There is a delay
/// between submission and the transaction landing in a block, so
/// `TXN_HASH_NOT_FOUND` is retried up to `max_polls` times; any other error
/// propagates immediately.
pub async fn wait_for_receipt<P: Provider + Sync>(
    provider: &P,
    transaction_hash: Felt,
    polling_interval: Duration,
    max_polls: u32,
) -> Result<TransactionReceipt, ProviderError> {
    let mut last_error = ProviderError::UnexpectedResponse("receipt never polled".to_string());
    for _ in 0..max_polls {
        match provider.get_transaction_receipt(transaction_hash).await {
            Ok(receipt) => return Ok(receipt),
            Err(error @ ProviderError::StarknetError { code, .. })
                if code == saros_providers::error_codes::TXN_HASH_NOT_FOUND =>
            {
                last_error = error;
                tokio::time::sleep(polling_interval).await;
            }
            Err(error) => return Err(error),
        }
    }
    Err(last_error)
}
