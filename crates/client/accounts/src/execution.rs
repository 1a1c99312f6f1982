//! Multicall execution flow: resolve, build, sign, submit.

use saros_felt::Felt;
use saros_providers::{FeeEstimate, InvokeTransactionResult, ProviderError};
use saros_transactions::{
    build, BroadcastedTransaction, Call, ChainContext, FeeBounds, ResourceBounds,
    ResourceBoundsMapping, TransactionIntent, TransactionVersion,
};

use crate::{AccountError, ConnectedAccount, RetryPolicy};

/// Default safety multiplier applied to fee estimates, as an exact integer
/// ratio (3/2 = 1.5x).
const DEFAULT_FEE_MULTIPLIER: (u64, u64) = (3, 2);

/// An invoke execution being prepared: the caller's batch of calls plus
/// optional overrides for everything the account would otherwise resolve
/// from the node.
#[derive(Debug)]
pub struct Execution<'a, A> {
    account: &'a A,
    calls: Vec<Call>,
    nonce: Option<Felt>,
    fee: Option<FeeBounds>,
    version: TransactionVersion,
    fee_estimate_multiplier: (u64, u64),
}

impl<'a, A> Execution<'a, A> {
    pub fn new(calls: Vec<Call>, account: &'a A) -> Self {
        Self {
            account,
            calls,
            nonce: None,
            fee: None,
            version: TransactionVersion::V1,
            fee_estimate_multiplier: DEFAULT_FEE_MULTIPLIER,
        }
    }

    /// Pins the nonce instead of fetching it. A pinned nonce also disables
    /// the nonce-conflict retry: there is nothing to re-fetch.
    pub fn nonce(self, nonce: Felt) -> Self {
        Self { nonce: Some(nonce), ..self }
    }

    /// Pins a v1 fee bound instead of estimating.
    pub fn max_fee(self, max_fee: u128) -> Self {
        Self { fee: Some(FeeBounds::MaxFee(max_fee)), ..self }
    }

    /// Pins v3 resource bounds instead of estimating.
    pub fn resource_bounds(self, resource_bounds: ResourceBoundsMapping) -> Self {
        Self { fee: Some(FeeBounds::ResourceBounds(resource_bounds)), ..self }
    }

    pub fn version(self, version: TransactionVersion) -> Self {
        Self { version, ..self }
    }

    /// Changes the safety multiplier applied to fee estimates, as a
    /// numerator/denominator pair.
    pub fn fee_estimate_multiplier(self, numerator: u64, denominator: u64) -> Self {
        Self { fee_estimate_multiplier: (numerator, denominator), ..self }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }
}

impl<'a, A> Execution<'a, A>
where
    A: ConnectedAccount + Sync,
{
    /// Estimates the fee of this execution with a query-only payload.
    pub async fn estimate_fee(&self) -> Result<FeeEstimate, AccountError<A::SignError>> {
        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => self.account.get_nonce().await?,
        };
        self.estimate_fee_with_nonce(nonce).await
    }

    /// Resolves nonce and fee, then builds, signs and submits exactly one
    /// transaction carrying the whole batch.
    ///
    /// A nonce-conflict rejection re-fetches the nonce and repeats the
    /// build-sign-submit cycle under the account's [`RetryPolicy`]; a signing
    /// failure is repeated only for signers marked retryable. Every other
    /// error propagates unchanged.
    pub async fn send(&self) -> Result<InvokeTransactionResult, AccountError<A::SignError>> {
        let retry_policy = self.account.retry_policy();
        let mut attempt = 1u32;

        loop {
            match self.send_once().await {
                Ok(result) => return Ok(result),
                Err(AccountError::Provider(error))
                    if self.nonce.is_none()
                        && error.is_nonce_conflict()
                        && attempt < retry_policy.max_attempts =>
                {
                    log::warn!(
                        "nonce conflict on submission attempt {attempt}, re-fetching nonce ({error})"
                    );
                    backoff(retry_policy).await;
                }
                Err(AccountError::Signing(error))
                    if self.account.is_signer_retryable() && attempt < retry_policy.max_attempts =>
                {
                    log::warn!("retryable signing failure on attempt {attempt}: {error}");
                    backoff(retry_policy).await;
                }
                Err(error) => return Err(error),
            }
            attempt += 1;
        }
    }

    /// One build-sign-submit cycle against a fresh chain snapshot.
    async fn send_once(&self) -> Result<InvokeTransactionResult, AccountError<A::SignError>> {
        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => self.account.get_nonce().await?,
        };
        let fee = self.resolve_fee(nonce).await?;

        let context = ChainContext { chain_id: self.account.chain_id(), nonce, fee };
        let unsigned = build(&self.intent(false), &context)?;

        log::debug!(
            "submitting transaction {} (nonce {nonce}) from {}",
            unsigned.hash(),
            self.account.address()
        );

        let signature =
            self.account.sign_hash(&unsigned.hash()).await.map_err(AccountError::Signing)?;
        let signed = unsigned.into_signed(signature);

        let BroadcastedTransaction::Invoke(invoke) = signed.transaction() else {
            // Invoke intents build invoke transactions.
            unreachable!()
        };
        Ok(self.account.provider().add_invoke_transaction(invoke).await?)
    }

    /// The caller intent this execution describes. Nonce and fee are left to
    /// the chain snapshot; they were resolved before the build.
    fn intent(&self, query_only: bool) -> TransactionIntent {
        TransactionIntent {
            sender_address: self.account.address(),
            calls: self.calls.clone(),
            nonce: None,
            fee: None,
            version: self.version,
            encoding: self.account.execution_encoding(),
            query_only,
        }
    }

    /// The fee committed to the transaction: the explicit override when
    /// given, otherwise the node's estimate padded by the safety multiplier.
    async fn resolve_fee(&self, nonce: Felt) -> Result<FeeBounds, AccountError<A::SignError>> {
        if let Some(fee) = self.fee {
            return Ok(fee);
        }
        let estimate = self.estimate_fee_with_nonce(nonce).await?;
        let (numerator, denominator) = self.fee_estimate_multiplier;

        match self.version {
            TransactionVersion::V1 => {
                let max_fee = estimate
                    .overall_fee
                    .checked_mul(numerator as u128)
                    .map(|fee| fee / denominator as u128)
                    .ok_or(AccountError::FeeOutOfRange)?;
                Ok(FeeBounds::MaxFee(max_fee))
            }
            TransactionVersion::V3 => {
                let max_amount = estimate
                    .gas_consumed
                    .checked_mul(numerator)
                    .map(|gas| gas / denominator)
                    .ok_or(AccountError::FeeOutOfRange)?;
                let max_price_per_unit = estimate
                    .gas_price
                    .checked_mul(numerator as u128)
                    .map(|price| price / denominator as u128)
                    .ok_or(AccountError::FeeOutOfRange)?;
                Ok(FeeBounds::ResourceBounds(ResourceBoundsMapping {
                    l1_gas: ResourceBounds { max_amount, max_price_per_unit },
                    l2_gas: ResourceBounds::default(),
                }))
            }
            version => Err(AccountError::Build(saros_transactions::BuildError::UnsupportedVersion(
                version,
            ))),
        }
    }

    /// Builds a signed query-only payload and asks the node for an estimate.
    async fn estimate_fee_with_nonce(
        &self,
        nonce: Felt,
    ) -> Result<FeeEstimate, AccountError<A::SignError>> {
        let zero_fee = match self.version {
            TransactionVersion::V3 => FeeBounds::ResourceBounds(ResourceBoundsMapping::default()),
            _ => FeeBounds::MaxFee(0),
        };
        let context = ChainContext { chain_id: self.account.chain_id(), nonce, fee: zero_fee };
        let unsigned = build(&self.intent(true), &context)?;

        log::debug!("estimating fee for {} from {}", unsigned.hash(), self.account.address());
        let signature =
            self.account.sign_hash(&unsigned.hash()).await.map_err(AccountError::Signing)?;
        let signed = unsigned.into_signed(signature);

        let estimates = self
            .account
            .provider()
            .estimate_fee(std::slice::from_ref(signed.transaction()), self.account.block_id())
            .await?;
        estimates.into_iter().next().ok_or_else(|| {
            AccountError::Provider(ProviderError::UnexpectedResponse(
                "empty fee estimation result".to_string(),
            ))
        })
    }
}

async fn backoff(policy: RetryPolicy) {
    if !policy.backoff.is_zero() {
        tokio::time::sleep(policy.backoff).await;
    }
}
