//! Canonical transaction hashes.
//!
//! The input ordering of every layout here is fixed by the network
//! specification and reproduced bit-exact: the v1/v2 family is a Pedersen
//! hash over a flat field list, the v3 family a Poseidon hash over a list
//! with nested fee/paymaster digests. Any divergence produces transactions
//! the network rejects, so the layouts are pinned by reference vectors in the
//! test module.

use saros_felt::Felt;
use saros_hashers::pedersen::PedersenHasher;
use saros_hashers::poseidon::PoseidonHasher;
use saros_hashers::HasherT;
use starknet_core::utils::get_contract_address;

use crate::constants::{
    prefix_as_felt, transaction_version, DECLARE_PREFIX, DEPLOY_ACCOUNT_PREFIX, INVOKE_PREFIX, L1_GAS,
    L2_GAS,
};
use crate::types::{
    BroadcastedTransaction, DataAvailabilityMode, DeclareTransaction, DeclareTransactionV2,
    DeclareTransactionV3, DeployAccountTransaction, DeployAccountTransactionV1,
    DeployAccountTransactionV3, InvokeTransaction, InvokeTransactionV1, InvokeTransactionV3,
    ResourceBounds, ResourceBoundsMapping,
};

/// Computes the canonical hash binding a transaction to one chain.
pub trait ComputeTransactionHash {
    fn compute_hash(&self, chain_id: Felt) -> Felt;
}

/// Packs one resource bound as `0 0 | name (6) | max_amount (8) | max_price (16)`.
fn prepare_resource_bound_value(name: &[u8], bounds: ResourceBounds) -> Felt {
    let mut buffer = [0u8; 32];
    buffer[2..8].copy_from_slice(name);
    buffer[8..16].copy_from_slice(&bounds.max_amount.to_be_bytes());
    buffer[16..].copy_from_slice(&bounds.max_price_per_unit.to_be_bytes());

    // The most significant bytes stay empty, so the value fits the field.
    Felt::from_bytes_be(&buffer).unwrap()
}

/// Packs the two DA modes as `nonce_mode << 32 | fee_mode`.
fn prepare_data_availability_modes(
    nonce_data_availability_mode: DataAvailabilityMode,
    fee_data_availability_mode: DataAvailabilityMode,
) -> Felt {
    Felt::from((nonce_data_availability_mode.bits() << 32) + fee_data_availability_mode.bits())
}

/// The address a deploy-account transaction will instantiate, derived from
/// the salt, class hash and constructor arguments with a zero deployer.
pub fn derive_contract_address(
    contract_address_salt: Felt,
    class_hash: Felt,
    constructor_calldata: &[Felt],
) -> Felt {
    let constructor_calldata: Vec<_> = constructor_calldata.iter().map(|f| f.0).collect();
    Felt(get_contract_address(
        contract_address_salt.0,
        class_hash.0,
        &constructor_calldata,
        starknet_ff::FieldElement::ZERO,
    ))
}

impl ComputeTransactionHash for InvokeTransactionV1 {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        let prefix = prefix_as_felt(INVOKE_PREFIX);
        let version = transaction_version(1, self.is_query);
        let calldata_hash = PedersenHasher::compute_hash_on_elements(&self.calldata);

        PedersenHasher::compute_hash_on_elements(&[
            prefix,
            version,
            self.sender_address,
            Felt::ZERO,
            calldata_hash,
            Felt::from(self.max_fee),
            chain_id,
            self.nonce,
        ])
    }
}

impl ComputeTransactionHash for InvokeTransactionV3 {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        let account_deployment_data_hash =
            PoseidonHasher::compute_hash_on_elements(&self.account_deployment_data);
        let calldata_hash = PoseidonHasher::compute_hash_on_elements(&self.calldata);

        compute_transaction_hash_common_v3(
            prefix_as_felt(INVOKE_PREFIX),
            transaction_version(3, self.is_query),
            self.sender_address,
            chain_id,
            self.nonce,
            self.tip,
            &self.paymaster_data,
            self.nonce_data_availability_mode,
            self.fee_data_availability_mode,
            &self.resource_bounds,
            vec![account_deployment_data_hash, calldata_hash],
        )
    }
}

impl ComputeTransactionHash for DeclareTransactionV2 {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        let prefix = prefix_as_felt(DECLARE_PREFIX);
        let version = transaction_version(2, self.is_query);
        let calldata_hash = PedersenHasher::compute_hash_on_elements(&[self.class_hash]);

        PedersenHasher::compute_hash_on_elements(&[
            prefix,
            version,
            self.sender_address,
            Felt::ZERO,
            calldata_hash,
            Felt::from(self.max_fee),
            chain_id,
            self.nonce,
            self.compiled_class_hash,
        ])
    }
}

impl ComputeTransactionHash for DeclareTransactionV3 {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        let account_deployment_data_hash =
            PoseidonHasher::compute_hash_on_elements(&self.account_deployment_data);

        compute_transaction_hash_common_v3(
            prefix_as_felt(DECLARE_PREFIX),
            transaction_version(3, self.is_query),
            self.sender_address,
            chain_id,
            self.nonce,
            self.tip,
            &self.paymaster_data,
            self.nonce_data_availability_mode,
            self.fee_data_availability_mode,
            &self.resource_bounds,
            vec![account_deployment_data_hash, self.class_hash, self.compiled_class_hash],
        )
    }
}

impl ComputeTransactionHash for DeployAccountTransactionV1 {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        let contract_address = derive_contract_address(
            self.contract_address_salt,
            self.class_hash,
            &self.constructor_calldata,
        );
        let prefix = prefix_as_felt(DEPLOY_ACCOUNT_PREFIX);
        let version = transaction_version(1, self.is_query);

        let mut calldata: Vec<Felt> = Vec::with_capacity(self.constructor_calldata.len() + 2);
        calldata.push(self.class_hash);
        calldata.push(self.contract_address_salt);
        calldata.extend_from_slice(&self.constructor_calldata);
        let calldata_hash = PedersenHasher::compute_hash_on_elements(&calldata);

        PedersenHasher::compute_hash_on_elements(&[
            prefix,
            version,
            contract_address,
            Felt::ZERO,
            calldata_hash,
            Felt::from(self.max_fee),
            chain_id,
            self.nonce,
        ])
    }
}

impl ComputeTransactionHash for DeployAccountTransactionV3 {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        let contract_address = derive_contract_address(
            self.contract_address_salt,
            self.class_hash,
            &self.constructor_calldata,
        );
        let constructor_calldata_hash =
            PoseidonHasher::compute_hash_on_elements(&self.constructor_calldata);

        compute_transaction_hash_common_v3(
            prefix_as_felt(DEPLOY_ACCOUNT_PREFIX),
            transaction_version(3, self.is_query),
            contract_address,
            chain_id,
            self.nonce,
            self.tip,
            &self.paymaster_data,
            self.nonce_data_availability_mode,
            self.fee_data_availability_mode,
            &self.resource_bounds,
            vec![constructor_calldata_hash, self.class_hash, self.contract_address_salt],
        )
    }
}

impl ComputeTransactionHash for InvokeTransaction {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        match self {
            InvokeTransaction::V1(tx) => tx.compute_hash(chain_id),
            InvokeTransaction::V3(tx) => tx.compute_hash(chain_id),
        }
    }
}

impl ComputeTransactionHash for DeclareTransaction {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        match self {
            DeclareTransaction::V2(tx) => tx.compute_hash(chain_id),
            DeclareTransaction::V3(tx) => tx.compute_hash(chain_id),
        }
    }
}

impl ComputeTransactionHash for DeployAccountTransaction {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        match self {
            DeployAccountTransaction::V1(tx) => tx.compute_hash(chain_id),
            DeployAccountTransaction::V3(tx) => tx.compute_hash(chain_id),
        }
    }
}

impl ComputeTransactionHash for BroadcastedTransaction {
    fn compute_hash(&self, chain_id: Felt) -> Felt {
        match self {
            BroadcastedTransaction::Invoke(tx) => tx.compute_hash(chain_id),
            BroadcastedTransaction::Declare(tx) => tx.compute_hash(chain_id),
            BroadcastedTransaction::DeployAccount(tx) => tx.compute_hash(chain_id),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn compute_transaction_hash_common_v3(
    tx_hash_prefix: Felt,
    version: Felt,
    sender_address: Felt,
    chain_id: Felt,
    nonce: Felt,
    tip: u64,
    paymaster_data: &[Felt],
    nonce_data_availability_mode: DataAvailabilityMode,
    fee_data_availability_mode: DataAvailabilityMode,
    resource_bounds: &ResourceBoundsMapping,
    additional_data: Vec<Felt>,
) -> Felt {
    let gas_hash = PoseidonHasher::compute_hash_on_elements(&[
        Felt::from(tip),
        prepare_resource_bound_value(L1_GAS, resource_bounds.l1_gas),
        prepare_resource_bound_value(L2_GAS, resource_bounds.l2_gas),
    ]);
    let paymaster_hash = PoseidonHasher::compute_hash_on_elements(paymaster_data);
    let data_availability_modes =
        prepare_data_availability_modes(nonce_data_availability_mode, fee_data_availability_mode);

    let mut data_to_hash = vec![
        tx_hash_prefix,
        version,
        sender_address,
        gas_hash,
        paymaster_hash,
        chain_id,
        nonce,
        data_availability_modes,
    ];
    data_to_hash.extend(additional_data);

    PoseidonHasher::compute_hash_on_elements(&data_to_hash)
}

#[cfg(test)]
#[path = "compute_hash_tests.rs"]
mod compute_hash_tests;
