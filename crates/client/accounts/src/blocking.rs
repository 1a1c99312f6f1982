//! Blocking call surface for non-concurrent callers.
//!
//! One dedicated runtime drives the async account; there is no duplicated
//! synchronous logic. Do not use this from inside an async context: it
//! blocks the calling thread for the whole flow.

use std::future::Future;

use saros_felt::Felt;
use saros_providers::{FeeEstimate, InvokeTransactionResult, ProviderError};
use saros_transactions::Call;

use crate::{AccountError, ConnectedAccount, Execution};

/// Wraps a [`ConnectedAccount`] so every operation can be called from plain
/// blocking code.
pub struct BlockingAccount<A> {
    account: A,
    runtime: tokio::runtime::Runtime,
}

impl<A> BlockingAccount<A>
where
    A: ConnectedAccount + Sync,
{
    pub fn new(account: A) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        Ok(Self { account, runtime })
    }

    /// Blocking equivalent of building and sending a multicall execution.
    pub fn execute(
        &self,
        calls: Vec<Call>,
    ) -> Result<InvokeTransactionResult, AccountError<A::SignError>> {
        self.runtime.block_on(Execution::new(calls, &self.account).send())
    }

    /// Blocking equivalent of estimating a multicall execution's fee.
    pub fn estimate_fee(&self, calls: Vec<Call>) -> Result<FeeEstimate, AccountError<A::SignError>> {
        self.runtime.block_on(Execution::new(calls, &self.account).estimate_fee())
    }

    /// Blocking equivalent of [`ConnectedAccount::get_nonce`].
    pub fn get_nonce(&self) -> Result<Felt, ProviderError> {
        self.runtime.block_on(self.account.get_nonce())
    }

    /// Drives any future on the account's runtime, for flows without a
    /// dedicated wrapper (declarations, deployments, receipt polling).
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn account(&self) -> &A {
        &self.account
    }

    pub fn into_inner(self) -> A {
        self.account
    }
}
