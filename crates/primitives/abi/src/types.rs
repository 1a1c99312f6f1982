//! Tagged type and value trees for contract interfaces.

use saros_felt::Felt;

/// A contract argument or return type.
///
/// The set is closed and recursive; nesting depth is only bounded by what the
/// contract declares. Struct field names are carried for decoding convenience
/// and never encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiType {
    /// A single field element.
    Felt,
    /// A 256-bit unsigned integer, flattened to two 128-bit limbs.
    U256,
    /// A length-prefixed homogeneous array.
    Array(Box<AbiType>),
    /// An anonymous product type, flattened in order.
    Tuple(Vec<AbiType>),
    /// A named product type, flattened in declared field order.
    Struct {
        name: String,
        fields: Vec<(String, AbiType)>,
    },
    /// An optional value, prefixed with a variant discriminant.
    Option(Box<AbiType>),
}

impl AbiType {
    /// Display name used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            AbiType::Felt => "felt".to_string(),
            AbiType::U256 => "u256".to_string(),
            AbiType::Array(inner) => format!("array<{}>", inner.type_name()),
            AbiType::Tuple(members) => {
                let inner: Vec<String> = members.iter().map(|m| m.type_name()).collect();
                format!("({})", inner.join(", "))
            }
            AbiType::Struct { name, .. } => name.clone(),
            AbiType::Option(inner) => format!("option<{}>", inner.type_name()),
        }
    }
}

/// A runtime value of some [`AbiType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Felt(Felt),
    U256 { low: u128, high: u128 },
    Array(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
    Struct {
        name: String,
        fields: Vec<(String, AbiValue)>,
    },
    Option(Option<Box<AbiValue>>),
}

impl From<Felt> for AbiValue {
    fn from(felt: Felt) -> Self {
        AbiValue::Felt(felt)
    }
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::Felt(Felt::from(value))
    }
}
