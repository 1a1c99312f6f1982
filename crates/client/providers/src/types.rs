//! Request and response types of the provider surface.

use serde::{Deserialize, Serialize, Serializer};

use saros_felt::Felt;

/// Which block state a query runs against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockId {
    Hash(Felt),
    Number(u64),
    Tag(BlockTag),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Pending,
}

impl Serialize for BlockId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct BlockHash {
            block_hash: Felt,
        }
        #[derive(Serialize)]
        struct BlockNumber {
            block_number: u64,
        }
        match self {
            BlockId::Hash(hash) => BlockHash { block_hash: *hash }.serialize(serializer),
            BlockId::Number(number) => BlockNumber { block_number: *number }.serialize(serializer),
            BlockId::Tag(BlockTag::Latest) => serializer.serialize_str("latest"),
            BlockId::Tag(BlockTag::Pending) => serializer.serialize_str("pending"),
        }
    }
}

/// A read-only entry point invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionCall {
    pub contract_address: Felt,
    pub entry_point_selector: Felt,
    pub calldata: Vec<Felt>,
}

pub(crate) mod hex_u64 {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = String::deserialize(deserializer)?;
        let digits = value.strip_prefix("0x").ok_or_else(|| D::Error::custom("missing 0x prefix"))?;
        u64::from_str_radix(digits, 16).map_err(D::Error::custom)
    }

    pub fn serialize<S: serde::Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }
}

pub(crate) mod hex_u128 {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let value = String::deserialize(deserializer)?;
        let digits = value.strip_prefix("0x").ok_or_else(|| D::Error::custom("missing 0x prefix"))?;
        u128::from_str_radix(digits, 16).map_err(D::Error::custom)
    }

    pub fn serialize<S: serde::Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }
}

/// One fee estimation result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeEstimate {
    #[serde(with = "hex_u64")]
    pub gas_consumed: u64,
    #[serde(with = "hex_u128")]
    pub gas_price: u128,
    #[serde(with = "hex_u128")]
    pub overall_fee: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionFinalityStatus {
    #[serde(rename = "ACCEPTED_ON_L2")]
    AcceptedOnL2,
    #[serde(rename = "ACCEPTED_ON_L1")]
    AcceptedOnL1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExecutionStatus {
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "REVERTED")]
    Reverted,
}

/// Status of a transaction the node has processed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: Felt,
    pub actual_fee: Felt,
    pub finality_status: TransactionFinalityStatus,
    pub execution_status: TransactionExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeTransactionResult {
    pub transaction_hash: Felt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclareTransactionResult {
    pub transaction_hash: Felt,
    pub class_hash: Felt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployAccountTransactionResult {
    pub transaction_hash: Felt,
    pub contract_address: Felt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_id_wire_forms() {
        assert_eq!(serde_json::to_string(&BlockId::Tag(BlockTag::Latest)).unwrap(), "\"latest\"");
        assert_eq!(serde_json::to_string(&BlockId::Tag(BlockTag::Pending)).unwrap(), "\"pending\"");
        assert_eq!(
            serde_json::to_string(&BlockId::Number(42)).unwrap(),
            "{\"block_number\":42}"
        );
        assert_eq!(
            serde_json::to_string(&BlockId::Hash(Felt::from(0xabcu64))).unwrap(),
            "{\"block_hash\":\"0xabc\"}"
        );
    }

    #[test]
    fn fee_estimate_parses_hex_fields() {
        let estimate: FeeEstimate = serde_json::from_str(
            "{\"gas_consumed\":\"0x3b9\",\"gas_price\":\"0x2540be400\",\"overall_fee\":\"0x8aee9d5f5a400\"}",
        )
        .unwrap();
        assert_eq!(estimate.gas_consumed, 0x3b9);
        assert_eq!(estimate.gas_price, 0x2540be400);
        assert_eq!(estimate.overall_fee, 0x8aee9d5f5a400);
    }

    #[test]
    fn receipt_parses_status_tags() {
        let receipt: TransactionReceipt = serde_json::from_str(
            "{\"transaction_hash\":\"0x1\",\"actual_fee\":\"0x20\",\
             \"finality_status\":\"ACCEPTED_ON_L2\",\"execution_status\":\"REVERTED\",\
             \"revert_reason\":\"out of gas\",\"block_number\":7}",
        )
        .unwrap();
        assert_eq!(receipt.finality_status, TransactionFinalityStatus::AcceptedOnL2);
        assert_eq!(receipt.execution_status, TransactionExecutionStatus::Reverted);
        assert_eq!(receipt.revert_reason.as_deref(), Some("out of gas"));
    }
}
