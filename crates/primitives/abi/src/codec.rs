//! Flattening codec between [`AbiValue`] trees and calldata felt sequences.

use saros_felt::Felt;

use crate::types::{AbiType, AbiValue};
use crate::AbiError;

// Cairo's Option<T> enum layout: variant 0 is Some, variant 1 is None.
const OPTION_SOME: Felt = Felt::ZERO;
const OPTION_NONE: Felt = Felt::ONE;

/// Encodes a value of the given type into a flat felt sequence.
///
/// Encoding rules: a felt is itself; an array is its length followed by each
/// element's encoding; tuples and structs are the concatenation of their
/// members in declared order; an option is a discriminant followed by the
/// payload when present; a u256 is its low limb then its high limb.
pub fn encode(value: &AbiValue, ty: &AbiType) -> Result<Vec<Felt>, AbiError> {
    let mut out = Vec::new();
    encode_into(value, ty, &mut out)?;
    Ok(out)
}

fn encode_into(value: &AbiValue, ty: &AbiType, out: &mut Vec<Felt>) -> Result<(), AbiError> {
    match (ty, value) {
        (AbiType::Felt, AbiValue::Felt(felt)) => {
            out.push(*felt);
            Ok(())
        }
        (AbiType::U256, AbiValue::U256 { low, high }) => {
            out.push(Felt::from(*low));
            out.push(Felt::from(*high));
            Ok(())
        }
        (AbiType::Array(element_ty), AbiValue::Array(elements)) => {
            out.push(Felt::from(elements.len() as u64));
            for element in elements {
                encode_into(element, element_ty, out)?;
            }
            Ok(())
        }
        (AbiType::Tuple(member_tys), AbiValue::Tuple(members)) => {
            if member_tys.len() != members.len() {
                return Err(AbiError::TypeMismatch { expected: ty.type_name() });
            }
            for (member, member_ty) in members.iter().zip(member_tys) {
                encode_into(member, member_ty, out)?;
            }
            Ok(())
        }
        (
            AbiType::Struct { name: ty_name, fields: field_tys },
            AbiValue::Struct { name, fields },
        ) => {
            if ty_name != name || field_tys.len() != fields.len() {
                return Err(AbiError::TypeMismatch { expected: ty.type_name() });
            }
            for ((field_name, field), (ty_field_name, field_ty)) in fields.iter().zip(field_tys) {
                if field_name != ty_field_name {
                    return Err(AbiError::TypeMismatch { expected: ty.type_name() });
                }
                encode_into(field, field_ty, out)?;
            }
            Ok(())
        }
        (AbiType::Option(inner_ty), AbiValue::Option(inner)) => match inner {
            Some(inner) => {
                out.push(OPTION_SOME);
                encode_into(inner, inner_ty, out)
            }
            None => {
                out.push(OPTION_NONE);
                Ok(())
            }
        },
        _ => Err(AbiError::TypeMismatch { expected: ty.type_name() }),
    }
}

/// Decodes one value of the given type from the front of `data`, returning
/// the value and the remaining sequence.
///
/// Decoding is pure: no caller-visible state is touched, and the remainder
/// supports decoding a contiguous buffer holding several values. Exhausted
/// input and out-of-range lengths or discriminants fail with
/// [`AbiError::MalformedAbiData`].
pub fn decode<'a>(data: &'a [Felt], ty: &AbiType) -> Result<(AbiValue, &'a [Felt]), AbiError> {
    match ty {
        AbiType::Felt => {
            let (first, rest) = take_one(data, "felt")?;
            Ok((AbiValue::Felt(first), rest))
        }
        AbiType::U256 => {
            let (low, rest) = take_one(data, "u256 low limb")?;
            let (high, rest) = take_one(rest, "u256 high limb")?;
            let low =
                u128::try_from(low).map_err(|_| AbiError::MalformedAbiData("u256 low limb out of range"))?;
            let high = u128::try_from(high)
                .map_err(|_| AbiError::MalformedAbiData("u256 high limb out of range"))?;
            Ok((AbiValue::U256 { low, high }, rest))
        }
        AbiType::Array(element_ty) => {
            let (len, mut rest) = take_one(data, "array length")?;
            let len = usize::try_from(
                u64::try_from(len).map_err(|_| AbiError::MalformedAbiData("array length out of range"))?,
            )
            .map_err(|_| AbiError::MalformedAbiData("array length out of range"))?;
            // Each element takes at least one felt; anything longer than the
            // remainder cannot be well formed.
            if len > rest.len() {
                return Err(AbiError::MalformedAbiData("array length exceeds available data"));
            }
            let mut elements = Vec::with_capacity(len);
            for _ in 0..len {
                let (element, next) = decode(rest, element_ty)?;
                elements.push(element);
                rest = next;
            }
            Ok((AbiValue::Array(elements), rest))
        }
        AbiType::Tuple(member_tys) => {
            let mut rest = data;
            let mut members = Vec::with_capacity(member_tys.len());
            for member_ty in member_tys {
                let (member, next) = decode(rest, member_ty)?;
                members.push(member);
                rest = next;
            }
            Ok((AbiValue::Tuple(members), rest))
        }
        AbiType::Struct { name, fields: field_tys } => {
            let mut rest = data;
            let mut fields = Vec::with_capacity(field_tys.len());
            for (field_name, field_ty) in field_tys {
                let (field, next) = decode(rest, field_ty)?;
                fields.push((field_name.clone(), field));
                rest = next;
            }
            Ok((AbiValue::Struct { name: name.clone(), fields }, rest))
        }
        AbiType::Option(inner_ty) => {
            let (discriminant, rest) = take_one(data, "option discriminant")?;
            if discriminant == OPTION_SOME {
                let (inner, rest) = decode(rest, inner_ty)?;
                Ok((AbiValue::Option(Some(Box::new(inner))), rest))
            } else if discriminant == OPTION_NONE {
                Ok((AbiValue::Option(None), rest))
            } else {
                Err(AbiError::MalformedAbiData("invalid option discriminant"))
            }
        }
    }
}

/// Like [`decode`] but requires the value to consume the whole sequence.
pub fn decode_exact(data: &[Felt], ty: &AbiType) -> Result<AbiValue, AbiError> {
    let (value, rest) = decode(data, ty)?;
    if !rest.is_empty() {
        return Err(AbiError::MalformedAbiData("trailing data after value"));
    }
    Ok(value)
}

fn take_one<'a>(data: &'a [Felt], context: &'static str) -> Result<(Felt, &'a [Felt]), AbiError> {
    match data.split_first() {
        Some((first, rest)) => Ok((*first, rest)),
        None => Err(AbiError::MalformedAbiData(context)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint256() -> AbiType {
        AbiType::U256
    }

    fn user_struct() -> AbiType {
        AbiType::Struct {
            name: "User".to_string(),
            fields: vec![
                ("id".to_string(), AbiType::Felt),
                ("balance".to_string(), uint256()),
                ("tags".to_string(), AbiType::Array(Box::new(AbiType::Felt))),
            ],
        }
    }

    fn user_value() -> AbiValue {
        AbiValue::Struct {
            name: "User".to_string(),
            fields: vec![
                ("id".to_string(), AbiValue::Felt(Felt::from(7u8))),
                ("balance".to_string(), AbiValue::U256 { low: 1000, high: 1 }),
                (
                    "tags".to_string(),
                    AbiValue::Array(vec![
                        AbiValue::Felt(Felt::ONE),
                        AbiValue::Felt(Felt::TWO),
                    ]),
                ),
            ],
        }
    }

    #[test]
    fn felt_encodes_to_itself() {
        let encoded = encode(&AbiValue::Felt(Felt::from(5u8)), &AbiType::Felt).unwrap();
        assert_eq!(encoded, vec![Felt::from(5u8)]);
    }

    #[test]
    fn array_is_length_prefixed() {
        let ty = AbiType::Array(Box::new(AbiType::Felt));
        let value = AbiValue::Array(vec![AbiValue::Felt(Felt::ONE), AbiValue::Felt(Felt::TWO)]);
        let encoded = encode(&value, &ty).unwrap();
        assert_eq!(encoded, vec![Felt::TWO, Felt::ONE, Felt::TWO]);
    }

    #[test]
    fn struct_flattens_in_declared_order() {
        let encoded = encode(&user_value(), &user_struct()).unwrap();
        // id, balance.low, balance.high, tags.len, tags[0], tags[1]
        assert_eq!(
            encoded,
            vec![
                Felt::from(7u8),
                Felt::from(1000u64),
                Felt::ONE,
                Felt::TWO,
                Felt::ONE,
                Felt::TWO,
            ]
        );
    }

    #[test]
    fn nested_round_trip() {
        let ty = AbiType::Tuple(vec![
            user_struct(),
            AbiType::Option(Box::new(AbiType::Array(Box::new(uint256())))),
        ]);
        let value = AbiValue::Tuple(vec![
            user_value(),
            AbiValue::Option(Some(Box::new(AbiValue::Array(vec![
                AbiValue::U256 { low: 3, high: 0 },
                AbiValue::U256 { low: u128::MAX, high: u128::MAX },
            ])))),
        ]);

        let encoded = encode(&value, &ty).unwrap();
        let (decoded, rest) = decode(&encoded, &ty).unwrap();
        assert_eq!(decoded, value);
        assert!(rest.is_empty());
    }

    #[test]
    fn option_round_trips_both_variants() {
        let ty = AbiType::Option(Box::new(AbiType::Felt));

        let some = AbiValue::Option(Some(Box::new(AbiValue::Felt(Felt::THREE))));
        let encoded = encode(&some, &ty).unwrap();
        assert_eq!(encoded, vec![Felt::ZERO, Felt::THREE]);
        assert_eq!(decode_exact(&encoded, &ty).unwrap(), some);

        let none = AbiValue::Option(None);
        let encoded = encode(&none, &ty).unwrap();
        assert_eq!(encoded, vec![Felt::ONE]);
        assert_eq!(decode_exact(&encoded, &ty).unwrap(), none);
    }

    #[test]
    fn decode_returns_remainder() {
        let buffer = vec![Felt::ONE, Felt::TWO, Felt::THREE];
        let (value, rest) = decode(&buffer, &AbiType::Felt).unwrap();
        assert_eq!(value, AbiValue::Felt(Felt::ONE));
        assert_eq!(rest, &[Felt::TWO, Felt::THREE]);

        // Continuation: decode the rest of the buffer as a second value.
        let (value, rest) = decode(rest, &uint256()).unwrap();
        assert_eq!(value, AbiValue::U256 { low: 2, high: 3 });
        assert!(rest.is_empty());
    }

    #[test]
    fn short_input_is_malformed() {
        let ty = user_struct();
        // Ends after the u256 low limb; the high limb is missing.
        let short = vec![Felt::from(7u8), Felt::from(1000u64)];
        assert_eq!(decode(&short, &ty), Err(AbiError::MalformedAbiData("u256 high limb")));

        // Empty input fails on the very first field.
        assert_eq!(decode(&[], &ty), Err(AbiError::MalformedAbiData("felt")));
    }

    #[test]
    fn array_length_beyond_data_is_malformed() {
        let ty = AbiType::Array(Box::new(AbiType::Felt));
        let data = vec![Felt::from(4u8), Felt::ONE];
        assert_eq!(
            decode(&data, &ty),
            Err(AbiError::MalformedAbiData("array length exceeds available data"))
        );
    }

    #[test]
    fn bad_option_discriminant_is_malformed() {
        let ty = AbiType::Option(Box::new(AbiType::Felt));
        let data = vec![Felt::TWO, Felt::ONE];
        assert_eq!(decode(&data, &ty), Err(AbiError::MalformedAbiData("invalid option discriminant")));
    }

    #[test]
    fn oversized_u256_limb_is_malformed() {
        let data = vec![Felt::MAX, Felt::ZERO];
        assert_eq!(
            decode(&data, &uint256()),
            Err(AbiError::MalformedAbiData("u256 low limb out of range"))
        );
    }

    #[test]
    fn value_type_mismatch_is_rejected() {
        let err = encode(&AbiValue::Felt(Felt::ONE), &user_struct()).unwrap_err();
        assert_eq!(err, AbiError::TypeMismatch { expected: "User".to_string() });
    }

    #[test]
    fn trailing_data_rejected_by_decode_exact() {
        let data = vec![Felt::ONE, Felt::TWO];
        assert_eq!(
            decode_exact(&data, &AbiType::Felt),
            Err(AbiError::MalformedAbiData("trailing data after value"))
        );
    }
}
