//! Error types for ccip-read-router.

use thiserror::Error;

use crate::abi::{AbiError, Selector};

/// Boxed error returned by application handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for registration and dispatch.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Schema parsing, argument decoding or result encoding failed.
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// A handler is already registered under this selector.
    #[error("Handler already exists for selector {selector} ({signature})")]
    DuplicateSelector { selector: Selector, signature: String },

    /// The application handler failed. Displays the handler's own message.
    #[error("{0}")]
    Handler(BoxError),
}

/// Result type alias using RouterError.
pub type Result<T> = std::result::Result<T, RouterError>;
