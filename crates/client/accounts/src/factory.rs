//! Deploy-account flow: counterfactual deployment of a fresh account
//! contract.
//!
//! The account does not exist yet, so there is no nonce to fetch (a fresh
//! account starts at zero) and the transaction is signed by the key that
//! will own it. The deployed address is derived locally from the salt, the
//! class hash and the constructor calldata, and must be funded before the
//! deployment lands.

use saros_felt::Felt;
use saros_providers::{
    BlockId, BlockTag, DeployAccountTransactionResult, FeeEstimate, Provider, ProviderError,
};
use saros_signers::Signer;
use saros_transactions::{
    derive_contract_address, BroadcastedTransaction, BuildError, DeployAccountTransaction,
    DeployAccountTransactionV1, DeployAccountTransactionV3, FeeBounds, ResourceBounds,
    ResourceBoundsMapping, TransactionVersion, UnsignedTransaction,
};

use crate::AccountError;

/// Factory for accounts backed by the OpenZeppelin account contract, whose
/// constructor takes the owner's public key.
#[derive(Debug)]
pub struct OpenZeppelinAccountFactory<P, S> {
    provider: P,
    signer: S,
    class_hash: Felt,
    chain_id: Felt,
    public_key: Felt,
    block_id: BlockId,
}

impl<P, S> OpenZeppelinAccountFactory<P, S>
where
    P: Provider + Sync + Send,
    S: Signer + Sync + Send,
{
    /// Derives the owner public key from the signer, so construction is a
    /// suspension point for remote signers.
    pub async fn new(
        class_hash: Felt,
        chain_id: Felt,
        signer: S,
        provider: P,
    ) -> Result<Self, S::SignError> {
        let public_key = signer.get_public_key().await?.scalar();
        Ok(Self {
            provider,
            signer,
            class_hash,
            chain_id,
            public_key,
            block_id: BlockId::Tag(BlockTag::Latest),
        })
    }

    pub fn deploy(&self, contract_address_salt: Felt) -> AccountDeployment<'_, P, S> {
        AccountDeployment::new(contract_address_salt, self)
    }

    fn constructor_calldata(&self) -> Vec<Felt> {
        vec![self.public_key]
    }
}

/// A deploy-account transaction being prepared.
#[derive(Debug)]
pub struct AccountDeployment<'a, P, S> {
    factory: &'a OpenZeppelinAccountFactory<P, S>,
    contract_address_salt: Felt,
    fee: Option<FeeBounds>,
    version: TransactionVersion,
    fee_estimate_multiplier: (u64, u64),
}

impl<'a, P, S> AccountDeployment<'a, P, S>
where
    P: Provider + Sync + Send,
    S: Signer + Sync + Send,
{
    fn new(contract_address_salt: Felt, factory: &'a OpenZeppelinAccountFactory<P, S>) -> Self {
        Self {
            factory,
            contract_address_salt,
            fee: None,
            version: TransactionVersion::V1,
            fee_estimate_multiplier: (3, 2),
        }
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

    /// The address this deployment will instantiate. Useful for funding the
    /// account before sending.
    pub fn address(&self) -> Felt {
        derive_contract_address(
            self.contract_address_salt,
            self.factory.class_hash,
            &self.factory.constructor_calldata(),
        )
    }

    pub async fn estimate_fee(&self) -> Result<FeeEstimate, AccountError<S::SignError>> {
        let zero_fee = match self.version {
            TransactionVersion::V3 => FeeBounds::ResourceBounds(ResourceBoundsMapping::default()),
            _ => FeeBounds::MaxFee(0),
        };
        let unsigned = self.build(zero_fee, true)?;
        let signature = self.sign(&unsigned).await?;
        let signed = unsigned.into_signed(signature);

        let estimates = self
            .factory
            .provider
            .estimate_fee(std::slice::from_ref(signed.transaction()), self.factory.block_id)
            .await?;
        estimates.into_iter().next().ok_or_else(|| {
            AccountError::Provider(ProviderError::UnexpectedResponse(
                "empty fee estimation result".to_string(),
            ))
        })
    }

    /// Signs and submits the deployment.
    pub async fn send(&self) -> Result<DeployAccountTransactionResult, AccountError<S::SignError>> {
        let fee = match self.fee {
            Some(fee) => fee,
            None => self.padded_fee(self.estimate_fee().await?)?,
        };

        let unsigned = self.build(fee, false)?;
        let signature = self.sign(&unsigned).await?;
        let signed = unsigned.into_signed(signature);

        let BroadcastedTransaction::DeployAccount(deploy) = signed.transaction() else {
            // Deployments build deploy-account transactions.
            unreachable!()
        };
        Ok(self.factory.provider.add_deploy_account_transaction(deploy).await?)
    }

    async fn sign(
        &self,
        unsigned: &UnsignedTransaction,
    ) -> Result<Vec<Felt>, AccountError<S::SignError>> {
        let signature = self
            .factory
            .signer
            .sign_hash(&unsigned.hash())
            .await
            .map_err(AccountError::Signing)?;
        Ok(signature.into())
    }

    fn build(
        &self,
        fee: FeeBounds,
        query_only: bool,
    ) -> Result<UnsignedTransaction, AccountError<S::SignError>> {
        // A fresh account always deploys at nonce zero.
        let nonce = Felt::ZERO;
        let transaction = match self.version {
            TransactionVersion::V1 => {
                let FeeBounds::MaxFee(max_fee) = fee else {
                    return Err(BuildError::FeeBoundsMismatch { version: self.version }.into());
                };
                DeployAccountTransaction::V1(DeployAccountTransactionV1 {
                    max_fee,
                    signature: vec![],
                    nonce,
                    contract_address_salt: self.contract_address_salt,
                    constructor_calldata: self.factory.constructor_calldata(),
                    class_hash: self.factory.class_hash,
                    is_query: query_only,
                })
            }
            TransactionVersion::V3 => {
                let FeeBounds::ResourceBounds(resource_bounds) = fee else {
                    return Err(BuildError::FeeBoundsMismatch { version: self.version }.into());
                };
                DeployAccountTransaction::V3(DeployAccountTransactionV3 {
                    signature: vec![],
                    nonce,
                    contract_address_salt: self.contract_address_salt,
                    constructor_calldata: self.factory.constructor_calldata(),
                    class_hash: self.factory.class_hash,
                    resource_bounds,
                    tip: 0,
                    paymaster_data: vec![],
                    nonce_data_availability_mode: Default::default(),
                    fee_data_availability_mode: Default::default(),
                    is_query: query_only,
                })
            }
            version => return Err(BuildError::UnsupportedVersion(version).into()),
        };

        Ok(UnsignedTransaction::new(
            BroadcastedTransaction::DeployAccount(transaction),
            self.factory.chain_id,
        ))
    }

    fn padded_fee(&self, estimate: FeeEstimate) -> Result<FeeBounds, AccountError<S::SignError>> {
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
}
