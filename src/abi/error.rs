//! Errors raised by the ABI codec.

use thiserror::Error;

/// Failure while parsing a schema, encoding values or decoding bytes.
#[derive(Debug, Error)]
pub enum AbiError {
    /// A function signature could not be parsed.
    #[error("invalid function signature `{signature}`: {reason}")]
    InvalidSignature { signature: String, reason: String },

    /// A parameter type string is not a known Solidity type.
    #[error("unknown ABI type `{0}`")]
    UnknownType(String),

    /// A JSON ABI document could not be read.
    #[error("invalid JSON ABI: {0}")]
    Json(#[from] serde_json::Error),

    /// No function with this name exists in the ABI.
    #[error("ABI function not found: {0}")]
    FunctionNotFound(String),

    /// More than one function shares this name in the ABI.
    #[error("ABI function `{0}` is overloaded, register it by signature instead")]
    AmbiguousFunction(String),

    /// Input ended before a full value could be read.
    #[error("unexpected end of ABI data at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// A word carried non-zero bytes where padding was expected.
    #[error("invalid padding for {kind} at offset {offset}")]
    InvalidPadding { kind: String, offset: usize },

    /// A length or offset does not fit in memory.
    #[error("ABI offset or length out of range at offset {offset}")]
    OffsetOutOfRange { offset: usize },

    /// A `string` value was not valid UTF-8.
    #[error("invalid UTF-8 in string value")]
    InvalidUtf8,

    /// A value does not match the schema type it is encoded against.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// The number of values does not match the number of schema entries.
    #[error("expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// An integer does not fit the declared width.
    #[error("value out of range for {0}")]
    ValueOutOfRange(String),

    /// Text was not a valid `0x`-prefixed hex string.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Text was not a valid account address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, AbiError>;
