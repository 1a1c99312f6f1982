//! From caller intent plus a chain snapshot to a hashable, signable
//! transaction.

use thiserror::Error;

use saros_felt::Felt;

use crate::compute_hash::ComputeTransactionHash;
use crate::types::{
    encode_calls, BroadcastedTransaction, Call, DataAvailabilityMode, ExecutionEncoding, FeeBounds,
    InvokeTransaction, InvokeTransactionV1, InvokeTransactionV3,
};

/// Requested transaction version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionVersion {
    V0,
    V1,
    V2,
    V3,
}

impl core::fmt::Display for TransactionVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransactionVersion::V0 => write!(f, "v0"),
            TransactionVersion::V1 => write!(f, "v1"),
            TransactionVersion::V2 => write!(f, "v2"),
            TransactionVersion::V3 => write!(f, "v3"),
        }
    }
}

/// What the caller wants executed: an ordered batch of calls from one sender,
/// with optional overrides for everything the chain snapshot would otherwise
/// supply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionIntent {
    pub sender_address: Felt,
    pub calls: Vec<Call>,
    /// Overrides the snapshot nonce when set.
    pub nonce: Option<Felt>,
    /// Overrides the snapshot fee when set.
    pub fee: Option<FeeBounds>,
    pub version: TransactionVersion,
    pub encoding: ExecutionEncoding,
    /// Marks the built transaction as non-submittable (estimation and
    /// simulation payloads).
    pub query_only: bool,
}

impl TransactionIntent {
    pub fn new(sender_address: Felt, calls: Vec<Call>) -> Self {
        Self {
            sender_address,
            calls,
            nonce: None,
            fee: None,
            version: TransactionVersion::V1,
            encoding: ExecutionEncoding::New,
            query_only: false,
        }
    }
}

/// Immutable snapshot of the chain state a single build consumes: chain
/// identifier, the sender's current nonce and the fee the caller is prepared
/// to commit to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainContext {
    pub chain_id: Felt,
    pub nonce: Felt,
    pub fee: FeeBounds,
}

/// A fully resolved transaction and its canonical hash. Immutable once
/// constructed; signing produces a [`SignedTransaction`] without touching it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    transaction: BroadcastedTransaction,
    hash: Felt,
}

impl UnsignedTransaction {
    /// Wraps an already-assembled transaction, computing its hash.
    pub fn new(transaction: BroadcastedTransaction, chain_id: Felt) -> Self {
        let hash = transaction.compute_hash(chain_id);
        Self { transaction, hash }
    }

    pub fn hash(&self) -> Felt {
        self.hash
    }

    pub fn transaction(&self) -> &BroadcastedTransaction {
        &self.transaction
    }

    /// Attaches a signature over [`Self::hash`], producing the only entity
    /// eligible for submission.
    pub fn into_signed(self, signature: Vec<Felt>) -> SignedTransaction {
        SignedTransaction {
            transaction: self.transaction.with_signature(signature),
            hash: self.hash,
        }
    }
}

/// A signed, submittable transaction. Never mutated; a retry under a changed
/// chain snapshot builds a fresh one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: BroadcastedTransaction,
    hash: Felt,
}

impl SignedTransaction {
    pub fn hash(&self) -> Felt {
        self.hash
    }

    pub fn transaction(&self) -> &BroadcastedTransaction {
        &self.transaction
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The requested version is not one the builder implements.
    #[error("unsupported transaction version {0}")]
    UnsupportedVersion(TransactionVersion),
    /// The fee layout does not fit the requested version (a single overall
    /// bound for v1, per-resource bounds for v3).
    #[error("fee bounds do not match transaction version {version}")]
    FeeBoundsMismatch { version: TransactionVersion },
}

/// Assembles and hashes an invoke transaction from an intent and a chain
/// snapshot.
///
/// Pure: identical inputs produce a bit-identical result, so hashes may be
/// cached and builds replayed in tests. The calldata is the in-order
/// concatenation of the intent's calls under its execution encoding; nonce
/// and fee come from the snapshot unless the intent overrides them.
pub fn build(intent: &TransactionIntent, context: &ChainContext) -> Result<UnsignedTransaction, BuildError> {
    let calldata = encode_calls(&intent.calls, intent.encoding);
    let nonce = intent.nonce.unwrap_or(context.nonce);
    let fee = intent.fee.unwrap_or(context.fee);

    let transaction = match intent.version {
        TransactionVersion::V1 => {
            let FeeBounds::MaxFee(max_fee) = fee else {
                return Err(BuildError::FeeBoundsMismatch { version: intent.version });
            };
            InvokeTransaction::V1(InvokeTransactionV1 {
                sender_address: intent.sender_address,
                calldata,
                max_fee,
                signature: vec![],
                nonce,
                is_query: intent.query_only,
            })
        }
        TransactionVersion::V3 => {
            let FeeBounds::ResourceBounds(resource_bounds) = fee else {
                return Err(BuildError::FeeBoundsMismatch { version: intent.version });
            };
            InvokeTransaction::V3(InvokeTransactionV3 {
                sender_address: intent.sender_address,
                calldata,
                signature: vec![],
                nonce,
                resource_bounds,
                tip: 0,
                paymaster_data: vec![],
                account_deployment_data: vec![],
                nonce_data_availability_mode: DataAvailabilityMode::L1,
                fee_data_availability_mode: DataAvailabilityMode::L1,
                is_query: intent.query_only,
            })
        }
        version => return Err(BuildError::UnsupportedVersion(version)),
    };

    Ok(UnsignedTransaction::new(BroadcastedTransaction::Invoke(transaction), context.chain_id))
}

#[cfg(test)]
mod tests {
    use saros_chain_id::SN_GOERLI_CHAIN_ID;

    use super::*;
    use crate::types::{ResourceBounds, ResourceBoundsMapping};

    fn transfer_call() -> Call {
        Call {
            to: Felt::from(0xfee0u64),
            selector: Felt::from(0x83afd3u64),
            calldata: vec![Felt::from(0xbeefu64), Felt::from(1000u64), Felt::ZERO],
        }
    }

    fn context() -> ChainContext {
        ChainContext { chain_id: SN_GOERLI_CHAIN_ID, nonce: Felt::from(7u8), fee: FeeBounds::MaxFee(5000) }
    }

    #[test]
    fn build_is_deterministic() {
        let intent = TransactionIntent::new(Felt::ONE, vec![transfer_call()]);
        let a = build(&intent, &context()).unwrap();
        let b = build(&intent, &context()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn snapshot_supplies_nonce_and_fee() {
        let intent = TransactionIntent::new(Felt::ONE, vec![transfer_call()]);
        let unsigned = build(&intent, &context()).unwrap();

        let BroadcastedTransaction::Invoke(InvokeTransaction::V1(tx)) = unsigned.transaction() else {
            panic!("expected an invoke v1 transaction");
        };
        assert_eq!(tx.nonce, Felt::from(7u8));
        assert_eq!(tx.max_fee, 5000);
    }

    #[test]
    fn explicit_overrides_win() {
        // Account at nonce 7, intent pins nonce 5 and a 1000 fee bound.
        let mut intent = TransactionIntent::new(Felt::ONE, vec![transfer_call()]);
        intent.nonce = Some(Felt::from(5u8));
        intent.fee = Some(FeeBounds::MaxFee(1000));

        let unsigned = build(&intent, &context()).unwrap();
        let BroadcastedTransaction::Invoke(InvokeTransaction::V1(tx)) = unsigned.transaction() else {
            panic!("expected an invoke v1 transaction");
        };
        assert_eq!(tx.nonce, Felt::from(5u8));
        assert_eq!(tx.max_fee, 1000);
        assert!(!tx.is_query);

        // The hash commits to the overridden fields.
        use crate::compute_hash::ComputeTransactionHash;
        assert_eq!(unsigned.hash(), tx.compute_hash(SN_GOERLI_CHAIN_ID));
    }

    #[test]
    fn calldata_is_the_ordered_concatenation() {
        let calls = vec![
            Call { to: Felt::from(0xau8 as u64), selector: Felt::ONE, calldata: vec![Felt::TWO] },
            Call { to: Felt::from(0xbu8 as u64), selector: Felt::TWO, calldata: vec![Felt::THREE] },
        ];
        let intent = TransactionIntent::new(Felt::ONE, calls.clone());
        let unsigned = build(&intent, &context()).unwrap();

        let BroadcastedTransaction::Invoke(InvokeTransaction::V1(tx)) = unsigned.transaction() else {
            panic!("expected an invoke v1 transaction");
        };
        assert_eq!(tx.calldata, encode_calls(&calls, ExecutionEncoding::New));
    }

    #[test]
    fn v3_requires_resource_bounds() {
        let mut intent = TransactionIntent::new(Felt::ONE, vec![transfer_call()]);
        intent.version = TransactionVersion::V3;

        // Snapshot still carries a v1-style fee: mismatch.
        assert_eq!(
            build(&intent, &context()),
            Err(BuildError::FeeBoundsMismatch { version: TransactionVersion::V3 })
        );

        intent.fee = Some(FeeBounds::ResourceBounds(ResourceBoundsMapping {
            l1_gas: ResourceBounds { max_amount: 100, max_price_per_unit: 10 },
            l2_gas: ResourceBounds::default(),
        }));
        let unsigned = build(&intent, &context()).unwrap();
        assert!(matches!(
            unsigned.transaction(),
            BroadcastedTransaction::Invoke(InvokeTransaction::V3(_))
        ));
    }

    #[test]
    fn legacy_versions_are_unsupported() {
        let mut intent = TransactionIntent::new(Felt::ONE, vec![transfer_call()]);
        intent.version = TransactionVersion::V0;
        assert_eq!(build(&intent, &context()), Err(BuildError::UnsupportedVersion(TransactionVersion::V0)));
    }

    #[test]
    fn signing_preserves_the_hash() {
        let intent = TransactionIntent::new(Felt::ONE, vec![transfer_call()]);
        let unsigned = build(&intent, &context()).unwrap();
        let hash = unsigned.hash();

        let signed = unsigned.into_signed(vec![Felt::ONE, Felt::TWO]);
        assert_eq!(signed.hash(), hash);
        assert_eq!(signed.transaction().signature(), &[Felt::ONE, Felt::TWO]);
    }
}
