//! Schema-directed ABI decoder.

use super::encode::{int_fits, uint_fits};
use super::error::{AbiError, Result};
use super::param_type::{ParamType, WORD_SIZE};
use super::value::{Address, Value, Word};

/// Decode an ABI tuple of `types` from `data`.
///
/// Trailing bytes after the last value are ignored.
///
/// Offsets may point anywhere in `data`, so several values can share one
/// tail. Each decoded word and each byte of dynamic content is charged
/// against a budget of `data.len()`; a well-formed encoding never exceeds
/// it, while aliased offsets that would multiply the input do.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Value>> {
    Decoder {
        data,
        budget: data.len(),
    }
    .decode_tuple(types, 0)
}

struct Decoder<'a> {
    data: &'a [u8],
    /// Bytes of decoded content still allowed.
    budget: usize,
}

impl Decoder<'_> {
    /// Decode a tuple whose head starts at `base`.
    ///
    /// Offsets of dynamic members are relative to `base`.
    fn decode_tuple(&mut self, types: &[ParamType], base: usize) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(types.len());
        let mut cursor = base;

        for ty in types {
            if ty.is_dynamic() {
                let offset = self.read_usize(cursor)?;
                let at = base
                    .checked_add(offset)
                    .ok_or(AbiError::OffsetOutOfRange { offset: cursor })?;
                values.push(self.decode_value(ty, at)?);
                cursor += WORD_SIZE;
            } else {
                values.push(self.decode_value(ty, cursor)?);
                cursor += ty.head_size();
            }
        }

        Ok(values)
    }

    fn decode_value(&mut self, ty: &ParamType, at: usize) -> Result<Value> {
        match ty {
            ParamType::Address => {
                let word = self.take_word(at)?;
                if word[..12].iter().any(|b| *b != 0) {
                    return Err(AbiError::InvalidPadding {
                        kind: ty.to_string(),
                        offset: at,
                    });
                }
                let mut address = [0u8; 20];
                address.copy_from_slice(&word[12..]);
                Ok(Value::Address(Address(address)))
            }
            ParamType::Bool => {
                let word = self.take_word(at)?;
                if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                    return Err(AbiError::InvalidPadding {
                        kind: ty.to_string(),
                        offset: at,
                    });
                }
                Ok(Value::Bool(word[31] == 1))
            }
            ParamType::Uint(bits) => {
                let word = self.take_word(at)?;
                if !uint_fits(&word, *bits) {
                    return Err(AbiError::InvalidPadding {
                        kind: ty.to_string(),
                        offset: at,
                    });
                }
                Ok(Value::Uint(word))
            }
            ParamType::Int(bits) => {
                let word = self.take_word(at)?;
                if !int_fits(&word, *bits) {
                    return Err(AbiError::InvalidPadding {
                        kind: ty.to_string(),
                        offset: at,
                    });
                }
                Ok(Value::Int(word))
            }
            ParamType::FixedBytes(len) => {
                let word = self.take_word(at)?;
                let bytes = word
                    .get(..*len)
                    .ok_or_else(|| AbiError::UnknownType(ty.to_string()))?;
                Ok(Value::FixedBytes(bytes.to_vec()))
            }
            ParamType::Bytes => Ok(Value::Bytes(self.take_dynamic_bytes(at)?)),
            ParamType::String => {
                let bytes = self.take_dynamic_bytes(at)?;
                String::from_utf8(bytes)
                    .map(Value::String)
                    .map_err(|_| AbiError::InvalidUtf8)
            }
            ParamType::Array(inner) => {
                let len = self.read_usize(at)?;
                self.charge(WORD_SIZE, at)?;
                let types = self.element_types(inner, len, at)?;
                self.decode_tuple(&types, at + WORD_SIZE).map(Value::Array)
            }
            ParamType::FixedArray(inner, len) => {
                let types = self.element_types(inner, *len, at)?;
                self.decode_tuple(&types, at).map(Value::FixedArray)
            }
            ParamType::Tuple(components) => self.decode_tuple(components, at).map(Value::Tuple),
        }
    }

    /// Schema of an array body of `len` elements.
    ///
    /// Every element takes at least one word of input, which bounds `len`
    /// before anything is allocated.
    fn element_types(&self, inner: &ParamType, len: usize, at: usize) -> Result<Vec<ParamType>> {
        if len > self.data.len() / WORD_SIZE {
            return Err(AbiError::OffsetOutOfRange { offset: at });
        }
        Ok(vec![inner.clone(); len])
    }

    fn charge(&mut self, bytes: usize, at: usize) -> Result<()> {
        self.budget = self
            .budget
            .checked_sub(bytes)
            .ok_or(AbiError::OffsetOutOfRange { offset: at })?;
        Ok(())
    }

    /// Read a value word, charging it to the budget.
    fn take_word(&mut self, at: usize) -> Result<Word> {
        let word = self.peek(at)?;
        self.charge(WORD_SIZE, at)?;
        Ok(word)
    }

    fn peek(&self, at: usize) -> Result<Word> {
        let end = at
            .checked_add(WORD_SIZE)
            .ok_or(AbiError::OffsetOutOfRange { offset: at })?;
        let slice = self
            .data
            .get(at..end)
            .ok_or(AbiError::UnexpectedEnd { offset: at })?;
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(slice);
        Ok(word)
    }

    /// Read a word that must hold a length or offset.
    fn read_usize(&self, at: usize) -> Result<usize> {
        let word = self.peek(at)?;
        if word[..WORD_SIZE - 8].iter().any(|b| *b != 0) {
            return Err(AbiError::OffsetOutOfRange { offset: at });
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&word[WORD_SIZE - 8..]);
        usize::try_from(u64::from_be_bytes(raw)).map_err(|_| AbiError::OffsetOutOfRange { offset: at })
    }

    fn take_dynamic_bytes(&mut self, at: usize) -> Result<Vec<u8>> {
        let len = self.read_usize(at)?;
        let start = at
            .checked_add(WORD_SIZE)
            .ok_or(AbiError::OffsetOutOfRange { offset: at })?;
        let end = start
            .checked_add(len)
            .ok_or(AbiError::OffsetOutOfRange { offset: at })?;
        let bytes = self
            .data
            .get(start..end)
            .ok_or(AbiError::UnexpectedEnd { offset: start })?;
        self.charge(WORD_SIZE + len, at)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encode::encode;
    use crate::abi::value::decode_hex;

    fn words(parts: &[&str]) -> Vec<u8> {
        decode_hex(&format!("0x{}", parts.concat())).unwrap()
    }

    #[test]
    fn test_decode_address() {
        let encoded = words(&["0000000000000000000000001111111111111111111111111111111111111111"]);
        let decoded = decode(&[ParamType::Address], &encoded).unwrap();
        assert_eq!(decoded, vec![Value::Address(Address([0x11; 20]))]);
    }

    #[test]
    fn test_decode_two_bytes() {
        let encoded = words(&[
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000080",
            "000000000000000000000000000000000000000000000000000000000000001f",
            "1000000000000000000000000000000000000000000000000000000000000200",
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0010000000000000000000000000000000000000000000000000000000000002",
        ]);
        let decoded = decode(&[ParamType::Bytes, ParamType::Bytes], &encoded).unwrap();
        assert_eq!(
            decoded,
            vec![
                Value::Bytes(
                    decode_hex("0x10000000000000000000000000000000000000000000000000000000000002")
                        .unwrap()
                ),
                Value::Bytes(
                    decode_hex("0x0010000000000000000000000000000000000000000000000000000000000002")
                        .unwrap()
                ),
            ]
        );
    }

    #[test]
    fn test_decode_string() {
        let encoded = words(&[
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000009",
            "6761766f66796f726b0000000000000000000000000000000000000000000000",
        ]);
        let decoded = decode(&[ParamType::String], &encoded).unwrap();
        assert_eq!(decoded, vec![Value::from("gavofyork")]);
    }

    #[test]
    fn test_round_trip_nested() {
        let types = vec![
            ParamType::parse("(uint64,string[],bytes8)").unwrap(),
            ParamType::parse("int32[2]").unwrap(),
            ParamType::Bool,
        ];
        let values = vec![
            Value::Tuple(vec![
                Value::uint(7u64),
                Value::Array(vec![Value::from("a"), Value::from("bc")]),
                Value::FixedBytes(vec![1, 2, 3, 4, 5, 6, 7, 8]),
            ]),
            Value::FixedArray(vec![Value::int(-5i64), Value::int(5i64)]),
            Value::Bool(true),
        ];

        let encoded = encode(&types, &values).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn test_decode_truncated() {
        let encoded = words(&["00000000000000000000000000000000000000000000000000000000000000"]);
        assert!(matches!(
            decode(&[ParamType::Uint(256)], &encoded),
            Err(AbiError::UnexpectedEnd { offset: 0 })
        ));
    }

    #[test]
    fn test_decode_rejects_dirty_padding() {
        let dirty_address =
            words(&["0100000000000000000000001111111111111111111111111111111111111111"]);
        assert!(matches!(
            decode(&[ParamType::Address], &dirty_address),
            Err(AbiError::InvalidPadding { .. })
        ));

        let dirty_bool = words(&["0000000000000000000000000000000000000000000000000000000000000002"]);
        assert!(decode(&[ParamType::Bool], &dirty_bool).is_err());

        let wide = words(&["0000000000000000000000000000000000000000000000000000000000000100"]);
        assert!(decode(&[ParamType::Uint(8)], &wide).is_err());
    }

    #[test]
    fn test_decode_rejects_huge_array_length() {
        let encoded = words(&[
            "0000000000000000000000000000000000000000000000000000000000000020",
            "00000000000000000000000000000000000000000000000000000000ffffffff",
        ]);
        assert!(matches!(
            decode(&[ParamType::parse("uint256[]").unwrap()], &encoded),
            Err(AbiError::OffsetOutOfRange { .. })
        ));
    }

    fn word(n: usize) -> [u8; WORD_SIZE] {
        let mut w = [0u8; WORD_SIZE];
        w[WORD_SIZE - 8..].copy_from_slice(&(n as u64).to_be_bytes());
        w
    }

    #[test]
    fn test_decode_rejects_aliased_tails() {
        // bytes[] whose elements all point at one shared blob.
        let count = 100;
        let blob_len = 3200;

        let mut encoded = Vec::new();
        encoded.extend(word(0x20));
        encoded.extend(word(count));
        for _ in 0..count {
            encoded.extend(word(count * WORD_SIZE));
        }
        encoded.extend(word(blob_len));
        encoded.extend(vec![0xab; blob_len]);

        let ty = ParamType::parse("bytes[]").unwrap();
        assert!(matches!(
            decode(&[ty], &encoded),
            Err(AbiError::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_aliased_nested_arrays() {
        // uint256[][] with every inner array pointing at the same body.
        let count = 50;
        let inner_len = 50;

        let mut encoded = Vec::new();
        encoded.extend(word(0x20));
        encoded.extend(word(count));
        for _ in 0..count {
            encoded.extend(word(count * WORD_SIZE));
        }
        encoded.extend(word(inner_len));
        for i in 0..inner_len {
            encoded.extend(word(i));
        }

        let ty = ParamType::parse("uint256[][]").unwrap();
        assert!(decode(&[ty], &encoded).is_err());
    }

    #[test]
    fn test_decode_distinct_tails_within_budget() {
        let types = vec![ParamType::parse("bytes[]").unwrap(), ParamType::parse("string[][]").unwrap()];
        let values = vec![
            Value::Array(vec![
                Value::Bytes(vec![1; 40]),
                Value::Bytes(Vec::new()),
                Value::Bytes(vec![2; 64]),
            ]),
            Value::Array(vec![
                Value::Array(vec![Value::from(""), Value::from("x")]),
                Value::Array(Vec::new()),
            ]),
        ];

        let encoded = encode(&types, &values).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), values);
    }

    #[test]
    fn test_decode_hand_built_fixed_bytes_does_not_panic() {
        assert!(decode(&[ParamType::FixedBytes(40)], &[0u8; WORD_SIZE]).is_err());
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let encoded = words(&[
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "ff00000000000000000000000000000000000000000000000000000000000000",
        ]);
        assert!(matches!(
            decode(&[ParamType::String], &encoded),
            Err(AbiError::InvalidUtf8)
        ));
    }
}
