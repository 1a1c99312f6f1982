//! Function signatures from a contract's declared interface.

use saros_felt::Felt;
use starknet_core::utils::get_selector_from_name;

use crate::codec::{decode, encode};
use crate::types::{AbiType, AbiValue};
use crate::AbiError;

/// A single entry point of a contract interface: its name and the declared
/// input and output types, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiFunction {
    name: String,
    inputs: Vec<(String, AbiType)>,
    outputs: Vec<AbiType>,
}

impl AbiFunction {
    pub fn new(name: impl Into<String>, inputs: Vec<(String, AbiType)>, outputs: Vec<AbiType>) -> Self {
        Self { name: name.into(), inputs, outputs }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry point selector: the starknet keccak of the function name.
    pub fn selector(&self) -> Result<Felt, AbiError> {
        get_selector_from_name(&self.name).map(Felt).map_err(|_| AbiError::NonAsciiName)
    }

    /// Encodes call arguments against the declared inputs, in declared order.
    /// The number of values must match the declared arity exactly.
    pub fn encode_inputs(&self, values: &[AbiValue]) -> Result<Vec<Felt>, AbiError> {
        if values.len() != self.inputs.len() {
            return Err(AbiError::ArityMismatch { expected: self.inputs.len(), got: values.len() });
        }
        let mut calldata = Vec::new();
        for (value, (_, ty)) in values.iter().zip(&self.inputs) {
            calldata.extend(encode(value, ty)?);
        }
        Ok(calldata)
    }

    /// Decodes a contiguous response buffer into the declared return values.
    /// The buffer must be consumed exactly.
    pub fn decode_outputs(&self, data: &[Felt]) -> Result<Vec<AbiValue>, AbiError> {
        let mut rest = data;
        let mut outputs = Vec::with_capacity(self.outputs.len());
        for ty in &self.outputs {
            let (value, next) = decode(rest, ty)?;
            outputs.push(value);
            rest = next;
        }
        if !rest.is_empty() {
            return Err(AbiError::MalformedAbiData("trailing data after outputs"));
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer() -> AbiFunction {
        AbiFunction::new(
            "transfer",
            vec![
                ("recipient".to_string(), AbiType::Felt),
                ("amount".to_string(), AbiType::U256),
            ],
            vec![AbiType::Felt],
        )
    }

    #[test]
    fn selector_matches_known_vector() {
        // starknet_keccak("transfer"), as published for the ERC-20 entry point.
        assert_eq!(
            transfer().selector().unwrap(),
            Felt::from_hex_be("0x83afd3f4caedc6eebf44246fe54e38c95e3179a5ec9ea81740eca5b482d12e2")
                .unwrap()
        );
    }

    #[test]
    fn encode_inputs_in_order() {
        let calldata = transfer()
            .encode_inputs(&[
                AbiValue::Felt(Felt::from(0xdeadu64)),
                AbiValue::U256 { low: 5000, high: 0 },
            ])
            .unwrap();
        assert_eq!(calldata, vec![Felt::from(0xdeadu64), Felt::from(5000u64), Felt::ZERO]);
    }

    #[test]
    fn arity_is_checked() {
        let err = transfer().encode_inputs(&[AbiValue::Felt(Felt::ONE)]).unwrap_err();
        assert_eq!(err, AbiError::ArityMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn decode_outputs_consumes_buffer() {
        let outputs = transfer().decode_outputs(&[Felt::ONE]).unwrap();
        assert_eq!(outputs, vec![AbiValue::Felt(Felt::ONE)]);

        let err = transfer().decode_outputs(&[Felt::ONE, Felt::TWO]).unwrap_err();
        assert_eq!(err, AbiError::MalformedAbiData("trailing data after outputs"));
    }

    #[test]
    fn multi_output_buffer_decodes_sequentially() {
        let function = AbiFunction::new(
            "get_state",
            vec![],
            vec![AbiType::U256, AbiType::Array(Box::new(AbiType::Felt))],
        );
        let outputs = function
            .decode_outputs(&[Felt::from(9u8), Felt::ZERO, Felt::TWO, Felt::ONE, Felt::TWO])
            .unwrap();
        assert_eq!(
            outputs,
            vec![
                AbiValue::U256 { low: 9, high: 0 },
                AbiValue::Array(vec![AbiValue::Felt(Felt::ONE), AbiValue::Felt(Felt::TWO)]),
            ]
        );
    }
}
