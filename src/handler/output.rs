//! Handler return values.
//!
//! A handler either returns decoded values, which the router encodes
//! against the function's output schema, or bytes it already encoded
//! itself, which are passed through untouched.

use bytes::Bytes;

use crate::abi::{decode_hex, AbiError, Function, Value};

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutput {
    /// Values to encode against the declared outputs.
    Decoded(Vec<Value>),
    /// Pre-encoded result, returned verbatim.
    Encoded(Bytes),
}

impl HandlerOutput {
    /// Pre-encoded result from `0x`-prefixed hex text.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::InvalidHex`] if `text` is not valid hex.
    pub fn encoded_hex(text: &str) -> Result<Self, AbiError> {
        decode_hex(text).map(|bytes| HandlerOutput::Encoded(Bytes::from(bytes)))
    }

    /// A handler with nothing to return.
    pub fn empty() -> Self {
        HandlerOutput::Decoded(Vec::new())
    }

    /// Encode into the bytes returned to the caller.
    ///
    /// Pre-encoded output is passed through. Decoded values are encoded
    /// against `function`'s outputs; a function without outputs always
    /// yields empty bytes.
    pub fn encode(self, function: &Function) -> Result<Bytes, AbiError> {
        match self {
            HandlerOutput::Encoded(bytes) => Ok(bytes),
            HandlerOutput::Decoded(_) if function.outputs.is_empty() => Ok(Bytes::new()),
            HandlerOutput::Decoded(values) => function.encode_output(&values).map(Bytes::from),
        }
    }
}

impl From<Vec<Value>> for HandlerOutput {
    fn from(values: Vec<Value>) -> Self {
        HandlerOutput::Decoded(values)
    }
}

impl From<Value> for HandlerOutput {
    fn from(value: Value) -> Self {
        HandlerOutput::Decoded(vec![value])
    }
}

impl From<Bytes> for HandlerOutput {
    fn from(bytes: Bytes) -> Self {
        HandlerOutput::Encoded(bytes)
    }
}
