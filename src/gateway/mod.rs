//! HTTP gateway.
//!
//! Hosts a [`CcipRouter`](crate::CcipRouter) behind the two CCIP-Read
//! request framings:
//!
//! - `GET {base}/{sender}/{callData}[.json]`
//! - `POST {base}` with `{"sender": "0x...", "data": "0x..."}`
//!
//! Malformed requests never reach the router and are answered with the
//! router's 400 envelope.
//!
//! # Example
//!
//! ```no_run
//! use ccip_read_router::abi::Value;
//! use ccip_read_router::gateway::GatewayConfig;
//! use ccip_read_router::CcipRouter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router = CcipRouter::new();
//!     router.add("function foo() pure returns (uint256)", |_args, _ctx| async {
//!         Ok(Value::uint(42u64).into())
//!     })?;
//!
//!     router.serve(GatewayConfig::from_env()?).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod request;
mod server;

pub use config::{
    ConfigError, GatewayConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_PATH_SUFFIX, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use request::{parse_get, parse_post, RequestError};
pub use server::ServeError;
