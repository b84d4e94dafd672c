//! Call context passed to handlers.
//!
//! # Example
//!
//! ```
//! use ccip_read_router::abi::Address;
//! use ccip_read_router::handler::CallContext;
//!
//! let ctx = CallContext::new(Address::ZERO, vec![0xc2, 0x98, 0x55, 0x78]);
//! assert_eq!(ctx.selector_hex(), "0xc2985578");
//! ```

use bytes::Bytes;

use crate::abi::{encode_hex, Address, Selector};

/// The `(target address, call data)` pair of one request.
///
/// Handed verbatim to every handler invocation. The router reads nothing
/// from it beyond the selector.
///
/// `CallContext` is cheap to clone; the call data is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Contract the caller claims to be calling.
    pub to: Address,
    /// Raw call data, selector included.
    pub data: Bytes,
}

impl CallContext {
    /// Create a new call context.
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
        }
    }

    /// The 4-byte selector, if the call data is long enough to hold one.
    #[inline]
    pub fn selector(&self) -> Option<Selector> {
        Selector::from_call_data(&self.data)
    }

    /// Lowercase hex of the first (up to) four bytes of call data.
    ///
    /// Used in error messages, so it reflects the input even when it is
    /// too short to be a real selector.
    pub fn selector_hex(&self) -> String {
        let end = self.data.len().min(4);
        encode_hex(&self.data[..end])
    }
}
