//! Decoded ABI values.

use std::fmt;
use std::str::FromStr;

use tiny_keccak::{Hasher, Keccak};

use super::error::{AbiError, Result};
use super::param_type::{ParamType, WORD_SIZE};

/// One 32-byte big-endian ABI word.
pub type Word = [u8; WORD_SIZE];

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> Word {
    let mut keccak = Keccak::v256();
    let mut out = [0u8; WORD_SIZE];
    keccak.update(data);
    keccak.finalize(&mut out);
    out
}

/// Decode a `0x`-prefixed hex string into bytes.
///
/// Accepts upper and lower case digits. The digit count must be even.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| AbiError::InvalidHex(text.to_string()))?;
    hex::decode(digits).map_err(|_| AbiError::InvalidHex(text.to_string()))
}

/// Encode bytes as a lowercase `0x`-prefixed hex string.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// A 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// EIP-55 mixed-case checksum rendering.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AbiError;

    /// Parse a `0x`-prefixed, 40-digit hex address.
    ///
    /// Mixed-case input must carry a valid EIP-55 checksum.
    fn from_str(text: &str) -> Result<Self> {
        let invalid = || AbiError::InvalidAddress(text.to_string());

        let digits = text.strip_prefix("0x").ok_or_else(invalid)?;
        if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        let address = Address(bytes);

        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum() != text {
            return Err(invalid());
        }

        Ok(address)
    }
}

/// A decoded ABI value.
///
/// Integers are kept as raw 32-byte words: unsigned values big-endian,
/// signed values in two's complement. Use the constructors and accessors
/// for native integer conversions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Address(Address),
    Bool(bool),
    Uint(Word),
    Int(Word),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Value>),
    FixedArray(Vec<Value>),
    Tuple(Vec<Value>),
}

impl Value {
    /// Unsigned integer value.
    pub fn uint(value: impl Into<u128>) -> Self {
        let mut word = [0u8; WORD_SIZE];
        word[16..].copy_from_slice(&value.into().to_be_bytes());
        Value::Uint(word)
    }

    /// Signed integer value, sign-extended to a full word.
    pub fn int(value: impl Into<i128>) -> Self {
        let value = value.into();
        let mut word = if value < 0 { [0xffu8; WORD_SIZE] } else { [0u8; WORD_SIZE] };
        word[16..].copy_from_slice(&value.to_be_bytes());
        Value::Int(word)
    }

    /// Unsigned integer as `u128`, if it is one and it fits.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Value::Uint(word) if word[..16].iter().all(|b| *b == 0) => {
                let mut low = [0u8; 16];
                low.copy_from_slice(&word[16..]);
                Some(u128::from_be_bytes(low))
            }
            _ => None,
        }
    }

    /// Unsigned integer as `u64`, if it is one and it fits.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_u128().and_then(|v| u64::try_from(v).ok())
    }

    /// Signed integer as `i128`, if it is one and it fits.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(word) => {
                let mut low = [0u8; 16];
                low.copy_from_slice(&word[16..]);
                let value = i128::from_be_bytes(low);
                let fill = if value < 0 { 0xff } else { 0x00 };
                word[..16].iter().all(|b| *b == fill).then_some(value)
            }
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Byte content of `bytes` and `bytesN` values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) | Value::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// Elements of arrays and tuples.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::FixedArray(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Short description of the value's shape, for error messages.
    pub(crate) fn kind(&self) -> String {
        match self {
            Value::Address(_) => "address".into(),
            Value::Bool(_) => "bool".into(),
            Value::Uint(_) => "uint".into(),
            Value::Int(_) => "int".into(),
            Value::FixedBytes(b) => format!("bytes{}", b.len()),
            Value::Bytes(_) => "bytes".into(),
            Value::String(_) => "string".into(),
            Value::Array(items) => format!("array of {}", items.len()),
            Value::FixedArray(items) => format!("fixed array of {}", items.len()),
            Value::Tuple(items) => format!("tuple of {}", items.len()),
        }
    }

    /// Whether this value can be encoded as `ty`, ignoring integer width.
    pub(crate) fn matches_shape(&self, ty: &ParamType) -> bool {
        matches!(
            (self, ty),
            (Value::Address(_), ParamType::Address)
                | (Value::Bool(_), ParamType::Bool)
                | (Value::Uint(_), ParamType::Uint(_))
                | (Value::Int(_), ParamType::Int(_))
                | (Value::FixedBytes(_), ParamType::FixedBytes(_))
                | (Value::Bytes(_), ParamType::Bytes)
                | (Value::String(_), ParamType::String)
                | (Value::Array(_), ParamType::Array(_))
                | (Value::FixedArray(_), ParamType::FixedArray(..))
                | (Value::Tuple(_), ParamType::Tuple(_))
        )
    }
}

impl From<Address> for Value {
    fn from(address: Address) -> Self {
        Value::Address(address)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::uint(v)
    }
}

impl From<u128> for Value {
    fn from(v: u128) -> Self {
        Value::uint(v)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint_conversions() {
        let v = Value::uint(42u64);
        assert_eq!(v.as_u64(), Some(42));
        assert_eq!(v.as_u128(), Some(42));

        let mut big = [0u8; 32];
        big[0] = 1;
        assert_eq!(Value::Uint(big).as_u128(), None);
    }

    #[test]
    fn test_int_sign_extension() {
        let Value::Int(word) = Value::int(-1i64) else {
            panic!("expected int");
        };
        assert_eq!(word, [0xff; 32]);
        assert_eq!(Value::int(-1i64).as_i128(), Some(-1));
        assert_eq!(Value::int(7i64).as_i128(), Some(7));
        assert_eq!(Value::uint(7u64).as_i128(), None);
    }

    #[test]
    fn test_address_parse_lowercase() {
        let addr: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        assert_eq!(addr, Address([0x11; 20]));
        assert_eq!(addr.to_string(), "0x1111111111111111111111111111111111111111");
    }

    #[test]
    fn test_address_checksum() {
        // EIP-55 reference vector.
        let text = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let addr: Address = text.parse().unwrap();
        assert_eq!(addr.to_checksum(), text);

        let lower = text.to_lowercase();
        assert!(lower.parse::<Address>().is_ok());

        let upper = format!("0x{}", text[2..].to_uppercase());
        assert!(upper.parse::<Address>().is_ok());

        let broken = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(broken.parse::<Address>().is_err());
    }

    #[test]
    fn test_address_rejects_malformed() {
        assert!("".parse::<Address>().is_err());
        assert!("0x".parse::<Address>().is_err());
        assert!("1111111111111111111111111111111111111111".parse::<Address>().is_err());
        assert!("0x11111111111111111111111111111111111111".parse::<Address>().is_err());
        assert!("0x111111111111111111111111111111111111111g".parse::<Address>().is_err());
    }

    #[test]
    fn test_hex_helpers() {
        assert_eq!(decode_hex("0x").unwrap(), Vec::<u8>::new());
        assert_eq!(decode_hex("0xABcd").unwrap(), vec![0xab, 0xcd]);
        assert!(decode_hex("abcd").is_err());
        assert!(decode_hex("0xabc").is_err());
        assert!(decode_hex("0xzz").is_err());
        assert_eq!(encode_hex(&[0xab, 0x01]), "0xab01");
    }

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            encode_hex(&keccak256(b"")),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
