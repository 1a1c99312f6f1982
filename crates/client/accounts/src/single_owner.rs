//! Account controlled by a single signing key.

use async_trait::async_trait;

use saros_felt::Felt;
use saros_providers::{BlockId, Provider};
use saros_signers::Signer;
use saros_transactions::ExecutionEncoding;

use crate::{Account, ConnectedAccount, RetryPolicy};

/// The standard account: one provider, one signer, one address, one chain.
///
/// Constructed once and reused across calls; there is no hidden global
/// state. See the crate-level notes for the nonce-ordering obligation on
/// concurrent sends.
#[derive(Clone, Debug)]
pub struct SingleOwnerAccount<P, S> {
    provider: P,
    signer: S,
    address: Felt,
    chain_id: Felt,
    encoding: ExecutionEncoding,
    block_id: BlockId,
    retry_policy: RetryPolicy,
}

impl<P, S> SingleOwnerAccount<P, S>
where
    P: Provider + Sync + Send,
    S: Signer + Sync + Send,
{
    pub fn new(provider: P, signer: S, address: Felt, chain_id: Felt, encoding: ExecutionEncoding) -> Self {
        Self {
            provider,
            signer,
            address,
            chain_id,
            encoding,
            block_id: BlockId::Tag(saros_providers::BlockTag::Latest),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Changes the block chain state is read against (nonce, estimates).
    pub fn set_block_id(&mut self, block_id: BlockId) -> &mut Self {
        self.block_id = block_id;
        self
    }

    /// Changes the nonce-conflict retry policy.
    pub fn set_retry_policy(&mut self, retry_policy: RetryPolicy) -> &mut Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }
}

#[async_trait]
impl<P, S> Account for SingleOwnerAccount<P, S>
where
    P: Provider + Sync + Send,
    S: Signer + Sync + Send,
{
    type SignError = S::SignError;

    fn address(&self) -> Felt {
        self.address
    }

    fn chain_id(&self) -> Felt {
        self.chain_id
    }

    fn execution_encoding(&self) -> ExecutionEncoding {
        self.encoding
    }

    async fn sign_hash(&self, hash: &Felt) -> Result<Vec<Felt>, Self::SignError> {
        let signature = self.signer.sign_hash(hash).await?;
        Ok(signature.into())
    }

    fn is_signer_retryable(&self) -> bool {
        self.signer.is_retryable()
    }
}

#[async_trait]
impl<P, S> ConnectedAccount for SingleOwnerAccount<P, S>
where
    P: Provider + Sync + Send,
    S: Signer + Sync + Send,
{
    type Provider = P;

    fn provider(&self) -> &Self::Provider {
        &self.provider
    }

    fn block_id(&self) -> BlockId {
        self.block_id
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }
}
