//! Handler module - selector table and handler contract.
//!
//! Provides:
//! - [`SelectorTable`] - maps function selectors to handlers
//! - [`CallContext`] - the target address and raw call data of a request
//! - [`HandlerOutput`] - decoded values or pre-encoded bytes
//!
//! # Example
//!
//! ```
//! use ccip_read_router::abi::Value;
//! use ccip_read_router::handler::{HandlerOutput, SelectorTable};
//!
//! let mut table = SelectorTable::new();
//!
//! // Return values, encoded by the router against the declared outputs
//! table
//!     .register("function bar(uint256) pure returns (uint256)", |args, _ctx| async move {
//!         let x = args[0].as_u128().ok_or("expected uint256")?;
//!         let doubled = x.checked_mul(2).ok_or("overflow")?;
//!         Ok(Value::uint(doubled).into())
//!     })
//!     .unwrap();
//!
//! // Return bytes that are already ABI-encoded
//! table
//!     .register("function raw() view returns (bytes)", |_args, _ctx| async {
//!         Ok(HandlerOutput::encoded_hex("0x1234")?)
//!     })
//!     .unwrap();
//! ```

mod context;
mod output;
mod registry;

pub use context::CallContext;
pub use output::HandlerOutput;
pub use registry::{
    BoxFuture, FnHandler, FunctionEntry, Handler, HandlerResult, IntoFunction, SelectorTable,
};
