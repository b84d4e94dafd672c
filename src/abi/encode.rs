//! Schema-directed ABI encoder.
//!
//! Values are laid out as a tuple: static members inline in the head,
//! dynamic members as an offset word in the head pointing into the tail.

use super::error::{AbiError, Result};
use super::param_type::{ParamType, WORD_SIZE};
use super::value::{Value, Word};

/// Encode `values` against `types` as one ABI tuple.
pub fn encode(types: &[ParamType], values: &[Value]) -> Result<Vec<u8>> {
    if types.len() != values.len() {
        return Err(AbiError::LengthMismatch {
            expected: types.len(),
            found: values.len(),
        });
    }

    let head_size: usize = types.iter().map(ParamType::head_size).sum();
    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (ty, value) in types.iter().zip(values) {
        let encoded = encode_value(ty, value)?;
        if ty.is_dynamic() {
            head.extend_from_slice(&pad_usize(head_size + tail.len()));
            tail.extend(encoded);
        } else {
            head.extend(encoded);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn encode_value(ty: &ParamType, value: &Value) -> Result<Vec<u8>> {
    if !value.matches_shape(ty) {
        return Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
            found: value.kind(),
        });
    }

    match (ty, value) {
        (ParamType::Address, Value::Address(address)) => {
            let mut word = [0u8; WORD_SIZE];
            word[12..].copy_from_slice(address.as_bytes());
            Ok(word.to_vec())
        }
        (ParamType::Bool, Value::Bool(b)) => Ok(pad_usize(*b as usize).to_vec()),
        (ParamType::Uint(bits), Value::Uint(word)) => {
            if !uint_fits(word, *bits) {
                return Err(AbiError::ValueOutOfRange(ty.to_string()));
            }
            Ok(word.to_vec())
        }
        (ParamType::Int(bits), Value::Int(word)) => {
            if !int_fits(word, *bits) {
                return Err(AbiError::ValueOutOfRange(ty.to_string()));
            }
            Ok(word.to_vec())
        }
        (ParamType::FixedBytes(len), Value::FixedBytes(bytes)) => {
            if bytes.len() != *len {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    found: value.kind(),
                });
            }
            Ok(pad_right(bytes))
        }
        (ParamType::Bytes, Value::Bytes(bytes)) => Ok(encode_dynamic_bytes(bytes)),
        (ParamType::String, Value::String(s)) => Ok(encode_dynamic_bytes(s.as_bytes())),
        (ParamType::Array(inner), Value::Array(items)) => {
            let types = vec![(**inner).clone(); items.len()];
            let mut out = pad_usize(items.len()).to_vec();
            out.extend(encode(&types, items)?);
            Ok(out)
        }
        (ParamType::FixedArray(inner, len), Value::FixedArray(items)) => {
            if items.len() != *len {
                return Err(AbiError::LengthMismatch {
                    expected: *len,
                    found: items.len(),
                });
            }
            let types = vec![(**inner).clone(); *len];
            encode(&types, items)
        }
        (ParamType::Tuple(components), Value::Tuple(items)) => encode(components, items),
        _ => Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
            found: value.kind(),
        }),
    }
}

fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = pad_usize(bytes.len()).to_vec();
    out.extend(pad_right(bytes));
    out
}

/// Right-pad `bytes` with zeros to a multiple of the word size.
fn pad_right(bytes: &[u8]) -> Vec<u8> {
    let padded_len = bytes.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut out = bytes.to_vec();
    out.resize(padded_len, 0);
    out
}

/// Converts usize to a right aligned word.
pub(crate) fn pad_usize(value: usize) -> Word {
    let mut word = [0u8; WORD_SIZE];
    word[WORD_SIZE - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Whether all bits above `bits` are zero.
///
/// Never true for a width that is not a whole number of bytes in `8..=256`.
pub(crate) fn uint_fits(word: &Word, bits: usize) -> bool {
    let Some(unused) = unused_bytes(bits) else {
        return false;
    };
    word[..unused].iter().all(|b| *b == 0)
}

/// Whether the word is a correct sign extension of a `bits`-wide integer.
pub(crate) fn int_fits(word: &Word, bits: usize) -> bool {
    let Some(unused) = unused_bytes(bits) else {
        return false;
    };
    if unused == 0 {
        return true;
    }
    let negative = word[unused] & 0x80 != 0;
    let fill = if negative { 0xff } else { 0x00 };
    word[..unused].iter().all(|b| *b == fill)
}

/// Leading bytes of a word left unused by a `bits`-wide integer.
fn unused_bytes(bits: usize) -> Option<usize> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return None;
    }
    Some((256 - bits) / 8)
}
