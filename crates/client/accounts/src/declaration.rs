//! Class declaration flow.

use std::sync::Arc;

use saros_felt::Felt;
use saros_providers::{DeclareTransactionResult, FeeEstimate, ProviderError};
use saros_transactions::{
    BroadcastedTransaction, BuildError, DeclareTransaction, DeclareTransactionV2,
    DeclareTransactionV3, FeeBounds, FlattenedSierraClass, ResourceBounds, ResourceBoundsMapping,
    TransactionVersion, UnsignedTransaction,
};

use crate::{AccountError, ConnectedAccount};

/// A class declaration being prepared. The class itself comes from the
/// compilation toolchain; the account only resolves nonce and fee, signs and
/// submits.
#[derive(Debug)]
pub struct Declaration<'a, A> {
    account: &'a A,
    contract_class: Arc<FlattenedSierraClass>,
    class_hash: Felt,
    compiled_class_hash: Felt,
    nonce: Option<Felt>,
    fee: Option<FeeBounds>,
    version: TransactionVersion,
    fee_estimate_multiplier: (u64, u64),
}

impl<'a, A> Declaration<'a, A> {
    pub fn new(
        contract_class: Arc<FlattenedSierraClass>,
        class_hash: Felt,
        compiled_class_hash: Felt,
        account: &'a A,
    ) -> Self {
        Self {
            account,
            contract_class,
            class_hash,
            compiled_class_hash,
            nonce: None,
            fee: None,
            version: TransactionVersion::V2,
            fee_estimate_multiplier: (3, 2),
        }
    }

    pub fn nonce(self, nonce: Felt) -> Self {
        Self { nonce: Some(nonce), ..self }
    }

    pub fn max_fee(self, max_fee: u128) -> Self {
        Self { fee: Some(FeeBounds::MaxFee(max_fee)), ..self }
    }

    pub fn resource_bounds(self, resource_bounds: ResourceBoundsMapping) -> Self {
        Self { fee: Some(FeeBounds::ResourceBounds(resource_bounds)), ..self }
    }

    pub fn version(self, version: TransactionVersion) -> Self {
        Self { version, ..self }
    }
}

impl<'a, A> Declaration<'a, A>
where
    A: ConnectedAccount + Sync,
{
    pub async fn estimate_fee(&self) -> Result<FeeEstimate, AccountError<A::SignError>> {
        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => self.account.get_nonce().await?,
        };
        self.estimate_fee_with_nonce(nonce).await
    }

    /// Resolves nonce and fee, signs and submits the declaration.
    pub async fn send(&self) -> Result<DeclareTransactionResult, AccountError<A::SignError>> {
        let nonce = match self.nonce {
            Some(nonce) => nonce,
            None => self.account.get_nonce().await?,
        };
        let fee = match self.fee {
            Some(fee) => fee,
            None => self.padded_fee(self.estimate_fee_with_nonce(nonce).await?)?,
        };

        let unsigned = self.build(nonce, fee, false)?;
        let signature =
            self.account.sign_hash(&unsigned.hash()).await.map_err(AccountError::Signing)?;
        let signed = unsigned.into_signed(signature);

        let BroadcastedTransaction::Declare(declare) = signed.transaction() else {
            // Declarations build declare transactions.
            unreachable!()
        };
        Ok(self.account.provider().add_declare_transaction(declare).await?)
    }

    fn build(
        &self,
        nonce: Felt,
        fee: FeeBounds,
        query_only: bool,
    ) -> Result<UnsignedTransaction, AccountError<A::SignError>> {
        let transaction = match self.version {
            TransactionVersion::V2 => {
                let FeeBounds::MaxFee(max_fee) = fee else {
                    return Err(BuildError::FeeBoundsMismatch { version: self.version }.into());
                };
                DeclareTransaction::V2(DeclareTransactionV2 {
                    sender_address: self.account.address(),
                    class_hash: self.class_hash,
                    compiled_class_hash: self.compiled_class_hash,
                    max_fee,
                    signature: vec![],
                    nonce,
                    contract_class: self.contract_class.clone(),
                    is_query: query_only,
                })
            }
            TransactionVersion::V3 => {
                let FeeBounds::ResourceBounds(resource_bounds) = fee else {
                    return Err(BuildError::FeeBoundsMismatch { version: self.version }.into());
                };
                DeclareTransaction::V3(DeclareTransactionV3 {
                    sender_address: self.account.address(),
                    class_hash: self.class_hash,
                    compiled_class_hash: self.compiled_class_hash,
                    signature: vec![],
                    nonce,
                    contract_class: self.contract_class.clone(),
                    resource_bounds,
                    tip: 0,
                    paymaster_data: vec![],
                    account_deployment_data: vec![],
                    nonce_data_availability_mode: Default::default(),
                    fee_data_availability_mode: Default::default(),
                    is_query: query_only,
                })
            }
            version => return Err(BuildError::UnsupportedVersion(version).into()),
        };

        Ok(UnsignedTransaction::new(
            BroadcastedTransaction::Declare(transaction),
            self.account.chain_id(),
        ))
    }

    fn padded_fee(&self, estimate: FeeEstimate) -> Result<FeeBounds, AccountError<A::SignError>> {
        let (numerator, denominator) = self.fee_estimate_multiplier;
        match self.version {
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
            _ => {
                let max_fee = estimate
                    .overall_fee
                    .checked_mul(numerator as u128)
                    .map(|fee| fee / denominator as u128)
                    .ok_or(AccountError::FeeOutOfRange)?;
                Ok(FeeBounds::MaxFee(max_fee))
            }
        }
    }

    async fn estimate_fee_with_nonce(
        &self,
        nonce: Felt,
    ) -> Result<FeeEstimate, AccountError<A::SignError>> {
        let zero_fee = match self.version {
            TransactionVersion::V3 => FeeBounds::ResourceBounds(ResourceBoundsMapping::default()),
            _ => FeeBounds::MaxFee(0),
        };
        let unsigned = self.build(nonce, zero_fee, true)?;
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
