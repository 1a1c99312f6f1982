//! Transaction types in their broadcast (wire) form.
//!
//! Serialization follows the JSON-RPC write-api shapes: felts and fee values
//! as hex strings, the kind in a `type` tag, the version including the query
//! offset when the payload is query-only. Only serialization is implemented;
//! broadcast payloads are produced locally, never parsed.

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use saros_felt::Felt;

use crate::constants::transaction_version;

/// One contract call: target contract, entry point selector, encoded
/// arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub to: Felt,
    pub selector: Felt,
    pub calldata: Vec<Felt>,
}

/// How an account contract expects a batch of calls to be flattened into
/// `__execute__` calldata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExecutionEncoding {
    /// Cairo 0 convention: a call-array of (to, selector, offset, len)
    /// entries followed by one shared calldata buffer.
    Legacy,
    /// Cairo 1 convention: each call carries its own length-prefixed
    /// calldata inline.
    #[default]
    New,
}

/// Flattens calls into account `__execute__` calldata, preserving call
/// order. This is the multicall surface: the output of every call is
/// concatenated into a single transaction's calldata.
pub fn encode_calls(calls: &[Call], encoding: ExecutionEncoding) -> Vec<Felt> {
    match encoding {
        ExecutionEncoding::Legacy => {
            let mut concated_calldata: Vec<Felt> = vec![];
            let mut execute_calldata: Vec<Felt> = vec![Felt::from(calls.len() as u64)];
            for call in calls {
                execute_calldata.push(call.to);
                execute_calldata.push(call.selector);
                execute_calldata.push(Felt::from(concated_calldata.len() as u64));
                execute_calldata.push(Felt::from(call.calldata.len() as u64));
                concated_calldata.extend_from_slice(&call.calldata);
            }
            execute_calldata.push(Felt::from(concated_calldata.len() as u64));
            execute_calldata.extend(concated_calldata);
            execute_calldata
        }
        ExecutionEncoding::New => {
            let mut execute_calldata: Vec<Felt> = vec![Felt::from(calls.len() as u64)];
            for call in calls {
                execute_calldata.push(call.to);
                execute_calldata.push(call.selector);
                execute_calldata.push(Felt::from(call.calldata.len() as u64));
                execute_calldata.extend_from_slice(&call.calldata);
            }
            execute_calldata
        }
    }
}

/// Data availability mode for v3 nonce and fee payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DataAvailabilityMode {
    #[default]
    L1,
    L2,
}

impl DataAvailabilityMode {
    pub(crate) fn bits(self) -> u64 {
        match self {
            DataAvailabilityMode::L1 => 0,
            DataAvailabilityMode::L2 => 1,
        }
    }
}

/// Maximum amount and unit price the sender is willing to pay for one
/// resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ResourceBounds {
    pub max_amount: u64,
    pub max_price_per_unit: u128,
}

/// Per-resource bounds of a v3 transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ResourceBoundsMapping {
    pub l1_gas: ResourceBounds,
    pub l2_gas: ResourceBounds,
}

impl Serialize for ResourceBounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResourceBounds", 2)?;
        s.serialize_field("max_amount", &format!("{:#x}", self.max_amount))?;
        s.serialize_field("max_price_per_unit", &format!("{:#x}", self.max_price_per_unit))?;
        s.end()
    }
}

impl Serialize for ResourceBoundsMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResourceBoundsMapping", 2)?;
        s.serialize_field("l1_gas", &self.l1_gas)?;
        s.serialize_field("l2_gas", &self.l2_gas)?;
        s.end()
    }
}

/// The fee commitment of a transaction, in the layout of its version family:
/// a single overall bound for v1/v2, per-resource bounds for v3. The two
/// layouts hash differently and must match the requested version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeBounds {
    MaxFee(u128),
    ResourceBounds(ResourceBoundsMapping),
}

/// A Sierra contract class, flattened for broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlattenedSierraClass {
    pub sierra_program: Vec<Felt>,
    pub contract_class_version: String,
    pub entry_points_by_type: EntryPointsByType,
    pub abi: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryPointsByType {
    #[serde(rename = "CONSTRUCTOR")]
    pub constructor: Vec<SierraEntryPoint>,
    #[serde(rename = "EXTERNAL")]
    pub external: Vec<SierraEntryPoint>,
    #[serde(rename = "L1_HANDLER")]
    pub l1_handler: Vec<SierraEntryPoint>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SierraEntryPoint {
    pub selector: Felt,
    pub function_idx: u64,
}

/// Invoke with a single overall fee bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeTransactionV1 {
    pub sender_address: Felt,
    pub calldata: Vec<Felt>,
    pub max_fee: u128,
    pub signature: Vec<Felt>,
    pub nonce: Felt,
    pub is_query: bool,
}

/// Invoke with per-resource fee bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeTransactionV3 {
    pub sender_address: Felt,
    pub calldata: Vec<Felt>,
    pub signature: Vec<Felt>,
    pub nonce: Felt,
    pub resource_bounds: ResourceBoundsMapping,
    pub tip: u64,
    pub paymaster_data: Vec<Felt>,
    pub account_deployment_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub is_query: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclareTransactionV2 {
    pub sender_address: Felt,
    /// Hash of `contract_class`; computed by the compilation toolchain and
    /// bound into the transaction hash, but not part of the wire payload.
    pub class_hash: Felt,
    pub compiled_class_hash: Felt,
    pub max_fee: u128,
    pub signature: Vec<Felt>,
    pub nonce: Felt,
    pub contract_class: Arc<FlattenedSierraClass>,
    pub is_query: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclareTransactionV3 {
    pub sender_address: Felt,
    pub class_hash: Felt,
    pub compiled_class_hash: Felt,
    pub signature: Vec<Felt>,
    pub nonce: Felt,
    pub contract_class: Arc<FlattenedSierraClass>,
    pub resource_bounds: ResourceBoundsMapping,
    pub tip: u64,
    pub paymaster_data: Vec<Felt>,
    pub account_deployment_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub is_query: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployAccountTransactionV1 {
    pub max_fee: u128,
    pub signature: Vec<Felt>,
    pub nonce: Felt,
    pub contract_address_salt: Felt,
    pub constructor_calldata: Vec<Felt>,
    pub class_hash: Felt,
    pub is_query: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployAccountTransactionV3 {
    pub signature: Vec<Felt>,
    pub nonce: Felt,
    pub contract_address_salt: Felt,
    pub constructor_calldata: Vec<Felt>,
    pub class_hash: Felt,
    pub resource_bounds: ResourceBoundsMapping,
    pub tip: u64,
    pub paymaster_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
    pub is_query: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvokeTransaction {
    V1(InvokeTransactionV1),
    V3(InvokeTransactionV3),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclareTransaction {
    V2(DeclareTransactionV2),
    V3(DeclareTransactionV3),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployAccountTransaction {
    V1(DeployAccountTransactionV1),
    V3(DeployAccountTransactionV3),
}

/// Any transaction an account client can broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BroadcastedTransaction {
    Invoke(InvokeTransaction),
    Declare(DeclareTransaction),
    DeployAccount(DeployAccountTransaction),
}

impl BroadcastedTransaction {
    /// Replaces the signature, producing the submittable form.
    pub fn with_signature(mut self, signature: Vec<Felt>) -> Self {
        match &mut self {
            BroadcastedTransaction::Invoke(InvokeTransaction::V1(tx)) => tx.signature = signature,
            BroadcastedTransaction::Invoke(InvokeTransaction::V3(tx)) => tx.signature = signature,
            BroadcastedTransaction::Declare(DeclareTransaction::V2(tx)) => tx.signature = signature,
            BroadcastedTransaction::Declare(DeclareTransaction::V3(tx)) => tx.signature = signature,
            BroadcastedTransaction::DeployAccount(DeployAccountTransaction::V1(tx)) => {
                tx.signature = signature
            }
            BroadcastedTransaction::DeployAccount(DeployAccountTransaction::V3(tx)) => {
                tx.signature = signature
            }
        }
        self
    }

    pub fn signature(&self) -> &[Felt] {
        match self {
            BroadcastedTransaction::Invoke(InvokeTransaction::V1(tx)) => &tx.signature,
            BroadcastedTransaction::Invoke(InvokeTransaction::V3(tx)) => &tx.signature,
            BroadcastedTransaction::Declare(DeclareTransaction::V2(tx)) => &tx.signature,
            BroadcastedTransaction::Declare(DeclareTransaction::V3(tx)) => &tx.signature,
            BroadcastedTransaction::DeployAccount(DeployAccountTransaction::V1(tx)) => &tx.signature,
            BroadcastedTransaction::DeployAccount(DeployAccountTransaction::V3(tx)) => &tx.signature,
        }
    }
}

impl Serialize for InvokeTransactionV1 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("InvokeTransactionV1", 7)?;
        s.serialize_field("type", "INVOKE")?;
        s.serialize_field("sender_address", &self.sender_address)?;
        s.serialize_field("calldata", &self.calldata)?;
        s.serialize_field("max_fee", &format!("{:#x}", self.max_fee))?;
        s.serialize_field("version", &transaction_version(1, self.is_query))?;
        s.serialize_field("signature", &self.signature)?;
        s.serialize_field("nonce", &self.nonce)?;
        s.end()
    }
}

impl Serialize for InvokeTransactionV3 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("InvokeTransactionV3", 12)?;
        s.serialize_field("type", "INVOKE")?;
        s.serialize_field("sender_address", &self.sender_address)?;
        s.serialize_field("calldata", &self.calldata)?;
        s.serialize_field("version", &transaction_version(3, self.is_query))?;
        s.serialize_field("signature", &self.signature)?;
        s.serialize_field("nonce", &self.nonce)?;
        s.serialize_field("resource_bounds", &self.resource_bounds)?;
        s.serialize_field("tip", &format!("{:#x}", self.tip))?;
        s.serialize_field("paymaster_data", &self.paymaster_data)?;
        s.serialize_field("account_deployment_data", &self.account_deployment_data)?;
        s.serialize_field("nonce_data_availability_mode", &self.nonce_data_availability_mode)?;
        s.serialize_field("fee_data_availability_mode", &self.fee_data_availability_mode)?;
        s.end()
    }
}

impl Serialize for DeclareTransactionV2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DeclareTransactionV2", 8)?;
        s.serialize_field("type", "DECLARE")?;
        s.serialize_field("sender_address", &self.sender_address)?;
        s.serialize_field("compiled_class_hash", &self.compiled_class_hash)?;
        s.serialize_field("max_fee", &format!("{:#x}", self.max_fee))?;
        s.serialize_field("version", &transaction_version(2, self.is_query))?;
        s.serialize_field("signature", &self.signature)?;
        s.serialize_field("nonce", &self.nonce)?;
        s.serialize_field("contract_class", &*self.contract_class)?;
        s.end()
    }
}

impl Serialize for DeclareTransactionV3 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DeclareTransactionV3", 13)?;
        s.serialize_field("type", "DECLARE")?;
        s.serialize_field("sender_address", &self.sender_address)?;
        s.serialize_field("compiled_class_hash", &self.compiled_class_hash)?;
        s.serialize_field("version", &transaction_version(3, self.is_query))?;
        s.serialize_field("signature", &self.signature)?;
        s.serialize_field("nonce", &self.nonce)?;
        s.serialize_field("contract_class", &*self.contract_class)?;
        s.serialize_field("resource_bounds", &self.resource_bounds)?;
        s.serialize_field("tip", &format!("{:#x}", self.tip))?;
        s.serialize_field("paymaster_data", &self.paymaster_data)?;
        s.serialize_field("account_deployment_data", &self.account_deployment_data)?;
        s.serialize_field("nonce_data_availability_mode", &self.nonce_data_availability_mode)?;
        s.serialize_field("fee_data_availability_mode", &self.fee_data_availability_mode)?;
        s.end()
    }
}

impl Serialize for DeployAccountTransactionV1 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DeployAccountTransactionV1", 8)?;
        s.serialize_field("type", "DEPLOY_ACCOUNT")?;
        s.serialize_field("max_fee", &format!("{:#x}", self.max_fee))?;
        s.serialize_field("version", &transaction_version(1, self.is_query))?;
        s.serialize_field("signature", &self.signature)?;
        s.serialize_field("nonce", &self.nonce)?;
        s.serialize_field("contract_address_salt", &self.contract_address_salt)?;
        s.serialize_field("constructor_calldata", &self.constructor_calldata)?;
        s.serialize_field("class_hash", &self.class_hash)?;
        s.end()
    }
}

impl Serialize for DeployAccountTransactionV3 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DeployAccountTransactionV3", 12)?;
        s.serialize_field("type", "DEPLOY_ACCOUNT")?;
        s.serialize_field("version", &transaction_version(3, self.is_query))?;
        s.serialize_field("signature", &self.signature)?;
        s.serialize_field("nonce", &self.nonce)?;
        s.serialize_field("contract_address_salt", &self.contract_address_salt)?;
        s.serialize_field("constructor_calldata", &self.constructor_calldata)?;
        s.serialize_field("class_hash", &self.class_hash)?;
        s.serialize_field("resource_bounds", &self.resource_bounds)?;
        s.serialize_field("tip", &format!("{:#x}", self.tip))?;
        s.serialize_field("paymaster_data", &self.paymaster_data)?;
        s.serialize_field("nonce_data_availability_mode", &self.nonce_data_availability_mode)?;
        s.serialize_field("fee_data_availability_mode", &self.fee_data_availability_mode)?;
        s.end()
    }
}

impl Serialize for InvokeTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InvokeTransaction::V1(tx) => tx.serialize(serializer),
            InvokeTransaction::V3(tx) => tx.serialize(serializer),
        }
    }
}

impl Serialize for DeclareTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeclareTransaction::V2(tx) => tx.serialize(serializer),
            DeclareTransaction::V3(tx) => tx.serialize(serializer),
        }
    }
}

impl Serialize for DeployAccountTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeployAccountTransaction::V1(tx) => tx.serialize(serializer),
            DeployAccountTransaction::V3(tx) => tx.serialize(serializer),
        }
    }
}

impl Serialize for BroadcastedTransaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BroadcastedTransaction::Invoke(tx) => tx.serialize(serializer),
            BroadcastedTransaction::Declare(tx) => tx.serialize(serializer),
            BroadcastedTransaction::DeployAccount(tx) => tx.serialize(serializer),
        }
    }
}
