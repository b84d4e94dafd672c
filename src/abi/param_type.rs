//! Solidity parameter types.
//!
//! [`ParamType`] is the schema side of the codec: it knows its canonical
//! spelling (used to build selectors), whether it is encoded in the head or
//! the tail of a tuple, and how many head bytes it occupies.

use std::fmt;
use std::str::FromStr;

use super::error::{AbiError, Result};

/// Size of one ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// A Solidity parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// 20-byte account address.
    Address,
    /// Boolean, encoded as a 0/1 word.
    Bool,
    /// Unsigned integer of the given bit width.
    Uint(usize),
    /// Two's-complement signed integer of the given bit width.
    Int(usize),
    /// `bytesN`, right-padded to one word.
    FixedBytes(usize),
    /// Dynamic `bytes`.
    Bytes,
    /// Dynamic UTF-8 `string`.
    String,
    /// Dynamic array `T[]`.
    Array(Box<ParamType>),
    /// Fixed-size array `T[N]`.
    FixedArray(Box<ParamType>, usize),
    /// Tuple `(T1,T2,...)`.
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Parse a Solidity type string such as `uint256`, `bytes32[]` or
    /// `(address,uint256)[2]`.
    pub fn parse(ty: &str) -> Result<Self> {
        let ty = ty.trim();
        if ty.is_empty() {
            return Err(AbiError::UnknownType(ty.to_string()));
        }

        if let Some(rest) = ty.strip_suffix(']') {
            let open = rest
                .rfind('[')
                .ok_or_else(|| AbiError::UnknownType(ty.to_string()))?;
            let inner = Self::parse(&rest[..open])?;
            let size = &rest[open + 1..];
            if size.is_empty() {
                return Ok(ParamType::Array(Box::new(inner)));
            }
            let len = size
                .parse::<usize>()
                .map_err(|_| AbiError::UnknownType(ty.to_string()))?;
            return Ok(ParamType::FixedArray(Box::new(inner), len));
        }

        let tuple_body = ty
            .strip_prefix("tuple")
            .unwrap_or(ty)
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'));
        if let Some(body) = tuple_body {
            let components = split_top_level(body)
                .map_err(|_| AbiError::UnknownType(ty.to_string()))?
                .into_iter()
                .map(Self::parse)
                .collect::<Result<Vec<_>>>()?;
            return Ok(ParamType::Tuple(components));
        }

        Self::parse_elementary(ty)
    }

    fn parse_elementary(ty: &str) -> Result<Self> {
        let unknown = || AbiError::UnknownType(ty.to_string());

        match ty {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "string" => return Ok(ParamType::String),
            "bytes" => return Ok(ParamType::Bytes),
            "byte" => return Ok(ParamType::FixedBytes(1)),
            "uint" => return Ok(ParamType::Uint(256)),
            "int" => return Ok(ParamType::Int(256)),
            _ => {}
        }

        let parse_width = |digits: &str| -> Result<usize> {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(unknown());
            }
            digits.parse::<usize>().map_err(|_| unknown())
        };

        if let Some(digits) = ty.strip_prefix("uint") {
            let bits = parse_width(digits)?;
            return valid_int_width(bits).then_some(ParamType::Uint(bits)).ok_or_else(unknown);
        }
        if let Some(digits) = ty.strip_prefix("int") {
            let bits = parse_width(digits)?;
            return valid_int_width(bits).then_some(ParamType::Int(bits)).ok_or_else(unknown);
        }
        if let Some(digits) = ty.strip_prefix("bytes") {
            let len = parse_width(digits)?;
            return (1..=WORD_SIZE)
                .contains(&len)
                .then_some(ParamType::FixedBytes(len))
                .ok_or_else(unknown);
        }

        Err(unknown())
    }

    /// Whether values of this type live in the tail of the enclosing tuple.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(components) => components.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Number of bytes this type occupies in the head of a tuple.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD_SIZE;
        }
        match self {
            ParamType::FixedArray(inner, len) => inner.head_size() * len,
            ParamType::Tuple(components) => components.iter().map(ParamType::head_size).sum(),
            _ => WORD_SIZE,
        }
    }

    /// Check the width rules of [`parse`](Self::parse) on a type built by
    /// hand.
    pub fn validate(&self) -> Result<()> {
        let valid = match self {
            ParamType::Uint(bits) | ParamType::Int(bits) => valid_int_width(*bits),
            ParamType::FixedBytes(len) => (1..=WORD_SIZE).contains(len),
            ParamType::Array(inner) => return inner.validate(),
            ParamType::FixedArray(inner, _) => {
                inner.validate()?;
                self.checked_head_size().is_some()
            }
            ParamType::Tuple(components) => {
                components.iter().try_for_each(ParamType::validate)?;
                self.checked_head_size().is_some()
            }
            ParamType::Address | ParamType::Bool | ParamType::Bytes | ParamType::String => true,
        };

        if valid {
            Ok(())
        } else {
            Err(AbiError::UnknownType(self.to_string()))
        }
    }

    fn checked_head_size(&self) -> Option<usize> {
        if self.is_dynamic() {
            return Some(WORD_SIZE);
        }
        match self {
            ParamType::FixedArray(inner, len) => inner.checked_head_size()?.checked_mul(*len),
            ParamType::Tuple(components) => components
                .iter()
                .try_fold(0usize, |acc, c| acc.checked_add(c.checked_head_size()?)),
            _ => Some(WORD_SIZE),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::String => f.write_str("string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
            ParamType::Tuple(components) => {
                f.write_str("(")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn valid_int_width(bits: usize) -> bool {
    bits > 0 && bits <= 256 && bits % 8 == 0
}

/// Split a comma-separated list at parenthesis depth zero.
///
/// Returns an empty list for blank input. Fails on unbalanced parentheses
/// or empty items.
pub(crate) fn split_top_level(list: &str) -> std::result::Result<Vec<&str>, ()> {
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or(())?,
            ',' if depth == 0 => {
                items.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(());
    }
    items.push(list[start..].trim());

    if items.iter().any(|item| item.is_empty()) {
        return Err(());
    }
    Ok(items)
}
