//! # ccip-read-router
//!
//! Server side of a CCIP-Read (EIP-3668) gateway.
//!
//! A contract that reverts with `OffchainLookup` sends the client to a
//! gateway with the call data of a function. This crate routes that call
//! data to a registered handler by its 4-byte selector, decodes the
//! arguments, runs the handler and ABI-encodes the result.
//!
//! ## Architecture
//!
//! - **abi**: type grammar, selectors and the head/tail codec
//! - **handler**: selector table and handler trait
//! - **router**: dispatch from call data to response envelope
//! - **envelope**: the two error body profiles
//! - **gateway**: GET/POST framing hosted on axum
//!
//! ## Example
//!
//! ```no_run
//! use ccip_read_router::abi::Value;
//! use ccip_read_router::gateway::GatewayConfig;
//! use ccip_read_router::CcipRouter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router = CcipRouter::new();
//!     router
//!         .add("function foo() pure returns (uint256)", |_args, _ctx| async {
//!             Ok(Value::uint(42u64).into())
//!         })?
//!         .add("function bar(uint256) pure returns (uint256)", |args, _ctx| async move {
//!             let x = args[0].as_u128().ok_or("expected uint256")?;
//!             let doubled = x.checked_mul(2).ok_or("overflow")?;
//!             Ok(Value::uint(doubled).into())
//!         })?;
//!
//!     router.serve(GatewayConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod handler;

mod router;

pub use envelope::{ResponseProfile, RpcResponse};
pub use error::{BoxError, Result, RouterError};
pub use handler::{CallContext, HandlerOutput};
pub use router::CcipRouter;
