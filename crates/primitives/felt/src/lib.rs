//! # Felt - Starknet field element.
//!
//! Starknet's native value type is an integer modulo the Stark prime
//! `2^251 + 17 * 2^192 + 1`, provided by the [`FieldElement`] type from
//! starknet-ff. The [`Felt`] wrapper owns the codec surface the rest of the
//! workspace relies on: canonical fixed-width big-endian bytes, canonical
//! lowercase hex, decimal strings, short-string (ASCII) encoding, and serde
//! as hex strings matching the JSON-RPC wire format.
//!
//! Every stored value is a reduced residue. Arithmetic is modular and
//! delegated to starknet-ff; only inversion is fallible (the zero element has
//! no inverse).

use core::ops::{Add, Mul, Sub};
use core::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starknet_ff::{FieldElement, FromByteSliceError, FromStrError};
use thiserror::Error;

/// A field element of the Stark prime field, always reduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Felt(pub FieldElement);

impl Felt {
    /// The additive identity.
    pub const ZERO: Self = Self(FieldElement::ZERO);
    /// The multiplicative identity.
    pub const ONE: Self = Self(FieldElement::ONE);
    pub const TWO: Self = Self(FieldElement::TWO);
    pub const THREE: Self = Self(FieldElement::THREE);
    /// Largest representable value, `2^251 + 17 * 2^192`.
    pub const MAX: Self = Self(FieldElement::MAX);

    /// Parses a hex string, with or without the `0x` prefix and padding
    /// zeros.
    ///
    /// # Errors
    ///
    /// Returns [`FeltError::OutOfRange`] if the value does not fit the field
    /// and [`FeltError::InvalidCharacter`] on non-hex input.
    pub fn from_hex_be(value: &str) -> Result<Self, FeltError> {
        let fe = FieldElement::from_hex_be(value)?;
        Ok(Self(fe))
    }

    /// Parses a decimal string.
    pub fn from_dec_str(value: &str) -> Result<Self, FeltError> {
        let fe = FieldElement::from_dec_str(value)?;
        Ok(Self(fe))
    }

    /// Decodes a fixed-width big-endian byte array.
    ///
    /// # Errors
    ///
    /// Returns [`FeltError::OutOfRange`] if the decoded integer is not below
    /// the field modulus.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Result<Self, FeltError> {
        FieldElement::from_bytes_be(bytes).map(Self).map_err(|_| FeltError::OutOfRange)
    }

    /// Decodes a big-endian byte slice of at most 32 bytes.
    pub fn from_byte_slice_be(bytes: &[u8]) -> Result<Self, FeltError> {
        match FieldElement::from_byte_slice_be(bytes) {
            Ok(fe) => Ok(Self(fe)),
            Err(FromByteSliceError::InvalidLength) => Err(FeltError::InvalidLength),
            Err(FromByteSliceError::OutOfRange) => Err(FeltError::OutOfRange),
        }
    }

    /// Fixed-width big-endian byte encoding; always exactly 32 bytes.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        self.0.to_bytes_be()
    }

    /// Canonical hex form: lowercase, zero-stripped, `0x`-prefixed.
    /// Round-trips exactly through [`Felt::from_hex_be`].
    pub fn to_hex(&self) -> String {
        let encoded = hex::encode(self.0.to_bytes_be());
        let digits = encoded.trim_start_matches('0');
        if digits.is_empty() { String::from("0x0") } else { format!("0x{digits}") }
    }

    /// Decimal string form.
    pub fn to_dec_string(&self) -> String {
        format!("{}", self.0)
    }

    /// Encodes an ASCII string of at most 31 bytes as its big-endian felt
    /// value. This is the encoding used for chain identifiers and other
    /// protocol-level short strings.
    pub fn from_short_string(value: &str) -> Result<Self, FeltError> {
        if !value.is_ascii() {
            return Err(FeltError::InvalidCharacter);
        }
        if value.len() > 31 {
            return Err(FeltError::ValueTooLarge);
        }
        Self::from_byte_slice_be(value.as_bytes())
    }

    /// Decodes the byte representation as an ASCII short string, stripping
    /// leading NUL padding.
    pub fn to_short_string(&self) -> Result<String, FeltError> {
        let bytes = self.0.to_bytes_be();
        let s = core::str::from_utf8(&bytes).map_err(|_| FeltError::InvalidCharacter)?;
        Ok(s.trim_start_matches('\0').to_string())
    }

    /// Multiplicative inverse.
    ///
    /// # Errors
    ///
    /// Returns [`FeltError::NotInvertible`] for the zero element, the only
    /// element without an inverse.
    pub fn invert(&self) -> Result<Self, FeltError> {
        self.0.invert().map(Self).ok_or(FeltError::NotInvertible)
    }
}

impl Default for Felt {
    fn default() -> Self {
        Self(FieldElement::ZERO)
    }
}

impl core::fmt::Display for Felt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Felt {
    type Err = FeltError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_be(s)
    }
}

impl Add for Felt {
    type Output = Felt;

    fn add(self, rhs: Felt) -> Felt {
        Felt(self.0 + rhs.0)
    }
}

impl Sub for Felt {
    type Output = Felt;

    fn sub(self, rhs: Felt) -> Felt {
        Felt(self.0 - rhs.0)
    }
}

impl Mul for Felt {
    type Output = Felt;

    fn mul(self, rhs: Felt) -> Felt {
        Felt(self.0 * rhs.0)
    }
}

/// Array of bytes from [`Felt`].
impl From<Felt> for [u8; 32] {
    fn from(felt: Felt) -> Self {
        felt.0.to_bytes_be()
    }
}

impl From<FieldElement> for Felt {
    fn from(fe: FieldElement) -> Self {
        Self(fe)
    }
}

impl From<Felt> for FieldElement {
    fn from(felt: Felt) -> Self {
        felt.0
    }
}

impl From<u8> for Felt {
    fn from(value: u8) -> Self {
        Self(FieldElement::from(value))
    }
}

impl From<u32> for Felt {
    fn from(value: u32) -> Self {
        Self(FieldElement::from(value))
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Self(FieldElement::from(value))
    }
}

/// `u128` does not fit starknet-ff's primitive conversions; route through the
/// byte codec. Any 128-bit value is below the modulus, so this cannot fail.
impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        let mut buf = [0u8; 32];
        buf[16..].copy_from_slice(&value.to_be_bytes());
        Self(FieldElement::from_bytes_be(&buf).unwrap())
    }
}

/// [`Felt`] to [`u64`]. Fails with [`FeltError::ValueTooLarge`] on overflow.
impl TryFrom<Felt> for u64 {
    type Error = FeltError;

    fn try_from(value: Felt) -> Result<Self, Self::Error> {
        u64::try_from(value.0).map_err(|_| FeltError::ValueTooLarge)
    }
}

/// [`Felt`] to [`u128`]. Fails with [`FeltError::ValueTooLarge`] on overflow.
impl TryFrom<Felt> for u128 {
    type Error = FeltError;

    fn try_from(value: Felt) -> Result<Self, Self::Error> {
        let bytes = value.0.to_bytes_be();
        if bytes[..16].iter().any(|b| *b != 0) {
            return Err(FeltError::ValueTooLarge);
        }
        let mut buf = [0u8; 16];
        buf.copy_from_slice(&bytes[16..]);
        Ok(u128::from_be_bytes(buf))
    }
}

/// Serialized as the canonical hex string, matching the JSON-RPC wire format.
impl Serialize for Felt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Felt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Felt::from_hex_be(&value)
            .map_err(|e| D::Error::custom(format!("invalid field element '{value}': {e}")))
    }
}

/// Error related to [`Felt`] construction and arithmetic.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum FeltError {
    /// Provided byte slice has an incorrect length.
    #[error("invalid length")]
    InvalidLength,
    /// Invalid character in a hex or short string.
    #[error("invalid character")]
    InvalidCharacter,
    /// Value is too large for the field.
    #[error("number out of range")]
    OutOfRange,
    /// Value is too large to fit into the target type.
    #[error("felt value too large for target type")]
    ValueTooLarge,
    /// The zero element has no multiplicative inverse.
    #[error("zero is not invertible")]
    NotInvertible,
}

impl From<FromStrError> for FeltError {
    fn from(err: FromStrError) -> Self {
        match err {
            FromStrError::InvalidCharacter => Self::InvalidCharacter,
            FromStrError::OutOfRange => Self::OutOfRange,
        }
    }
}

#[cfg(test)]
mod felt_tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        assert_eq!(Felt::default(), Felt::ZERO);
    }

    #[test]
    fn from_hex_be() {
        Felt::from_hex_be("0x0").unwrap();
        Felt::from_hex_be("0x123456").unwrap();
        Felt::from_hex_be("0x01dbc98a49405a81587a9608c9c0b9fd51d65b55b0bf428bad499ab76c7b46d1").unwrap();

        let overlong = Felt::from_hex_be(
            "0x01dbc98a49405a81587a9608c9c0b9fd51d65b55b0bf428bad499ab76c7b46d19722957295752795927529759275927572",
        );
        assert_eq!(overlong, Err(FeltError::OutOfRange));

        assert_eq!(Felt::from_hex_be("0xnothex"), Err(FeltError::InvalidCharacter));
    }

    #[test]
    fn hex_round_trip_is_canonical() {
        // Zero-stripped lowercase regardless of input padding.
        let felt = Felt::from_hex_be("0x0000ABC").unwrap();
        assert_eq!(felt.to_hex(), "0xabc");
        assert_eq!(Felt::from_hex_be(&felt.to_hex()).unwrap(), felt);
        assert_eq!(Felt::ZERO.to_hex(), "0x0");
    }

    #[test]
    fn byte_round_trip() {
        let felt = Felt::from_dec_str("123456789123456789").unwrap();
        let bytes = felt.to_bytes_be();
        assert_eq!(Felt::from_bytes_be(&bytes).unwrap(), felt);

        // Largest valid value survives, one above the modulus does not.
        let max = Felt::MAX.to_bytes_be();
        assert_eq!(Felt::from_bytes_be(&max).unwrap(), Felt::MAX);
        let mut above = [0xffu8; 32];
        above[0] = 0x08;
        assert_eq!(Felt::from_bytes_be(&above), Err(FeltError::OutOfRange));
    }

    #[test]
    fn addition_reduces() {
        // MAX + 1 wraps to zero: the stored value is always a reduced residue.
        assert_eq!(Felt::MAX + Felt::ONE, Felt::ZERO);
        assert_eq!(Felt::from(2u8) + Felt::from(3u8), Felt::from(5u8));
        assert_eq!(Felt::ZERO - Felt::ONE, Felt::MAX);
    }

    #[test]
    fn add_matches_integer_addition_below_modulus() {
        let a = 4_294_967_296u64;
        let b = 77_777u64;
        assert_eq!(Felt::from(a) + Felt::from(b), Felt::from(a + b));
    }

    #[test]
    fn invert_round_trips() {
        let felt = Felt::from_dec_str("19911991").unwrap();
        let inverse = felt.invert().unwrap();
        assert_eq!(felt * inverse, Felt::ONE);
    }

    #[test]
    fn invert_zero_fails() {
        assert_eq!(Felt::ZERO.invert(), Err(FeltError::NotInvertible));
    }

    #[test]
    fn from_primitives() {
        assert_eq!(Felt::from(4_294_967_296u64), Felt::from_dec_str("4294967296").unwrap());
        assert_eq!(
            Felt::from(18_446_744_073_709_551_616u128),
            Felt::from_dec_str("18446744073709551616").unwrap()
        );
        assert_eq!(u64::try_from(Felt::from(42u8)).unwrap(), 42);
        assert_eq!(u64::try_from(Felt::MAX), Err(FeltError::ValueTooLarge));
        assert_eq!(
            u128::try_from(Felt::from(u128::MAX)).unwrap(),
            u128::MAX
        );
        assert_eq!(u128::try_from(Felt::MAX), Err(FeltError::ValueTooLarge));
    }

    #[test]
    fn short_string_round_trip() {
        let chain = Felt::from_short_string("SN_GOERLI").unwrap();
        assert_eq!(chain, Felt::from_hex_be("0x534e5f474f45524c49").unwrap());
        assert_eq!(chain.to_short_string().unwrap(), "SN_GOERLI");

        assert_eq!(
            Felt::from_short_string("a string that is far too long to fit 31 bytes"),
            Err(FeltError::ValueTooLarge)
        );
    }

    #[test]
    fn serde_as_hex_string() {
        let felt = Felt::from_hex_be("0x1234").unwrap();
        let json = serde_json::to_string(&felt).unwrap();
        assert_eq!(json, "\"0x1234\"");
        let back: Felt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, felt);

        assert!(serde_json::from_str::<Felt>("\"0xzz\"").is_err());
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Felt::ONE < Felt::TWO);
        assert!(Felt::MAX > Felt::from(u64::MAX));
    }
}
