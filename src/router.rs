//! Router and dispatch loop.
//!
//! The [`CcipRouter`] owns the selector table and turns one
//! [`CallContext`] into one [`RpcResponse`]:
//! 1. Read the selector from the call data
//! 2. Look up the registered function (miss → 404)
//! 3. Decode the arguments against its input schema
//! 4. Await the handler
//! 5. Encode the result and wrap it in a 200 envelope
//!
//! # Example
//!
//! ```
//! use ccip_read_router::abi::{Address, Function, Value};
//! use ccip_read_router::{CallContext, CcipRouter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = CcipRouter::new();
//! router.add("function bar(uint256) pure returns (uint256)", |args, _ctx| async move {
//!     let x = args[0].as_u128().ok_or("expected uint256")?;
//!     let doubled = x.checked_mul(2).ok_or("overflow")?;
//!     Ok(Value::uint(doubled).into())
//! })?;
//!
//! let bar = Function::parse("bar(uint256)")?;
//! let data = bar.encode_input(&[Value::uint(40u64)])?;
//! let response = router.handle(CallContext::new(Address::ZERO, data)).await;
//!
//! assert_eq!(response.status, 200);
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::abi::{encode_hex, Selector, Value};
use crate::envelope::{ResponseProfile, RpcResponse};
use crate::error::{Result, RouterError};
use crate::handler::{CallContext, HandlerResult, IntoFunction, SelectorTable};

/// CCIP-Read router.
///
/// Register handlers with [`add`](Self::add), then either dispatch
/// directly with [`call`](Self::call) / [`handle`](Self::handle) or host it
/// over HTTP with [`into_axum_router`](Self::into_axum_router).
///
/// Registration takes `&mut self` while serving shares the router behind
/// an `Arc`, so the table cannot change once requests are being served.
#[derive(Default)]
pub struct CcipRouter {
    table: SelectorTable,
    profile: ResponseProfile,
}

impl CcipRouter {
    /// Create a router with the default ([`ResponseProfile::Structured`])
    /// envelope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router with the given error envelope.
    pub fn with_profile(profile: ResponseProfile) -> Self {
        Self {
            table: SelectorTable::new(),
            profile,
        }
    }

    /// Register a handler for a function.
    ///
    /// The descriptor is a human-readable signature, a parsed
    /// [`Function`](crate::abi::Function), or the result of an
    /// [`Abi::function`](crate::abi::Abi::function) lookup.
    ///
    /// # Errors
    ///
    /// Fails immediately if the descriptor does not resolve to a function
    /// or its selector is already taken. Nothing is registered on failure.
    pub fn add<D, F, Fut>(&mut self, descriptor: D, handler: F) -> Result<&mut Self>
    where
        D: IntoFunction,
        F: Fn(Vec<Value>, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let selector = self.table.register(descriptor, handler)?;
        tracing::info!("Added handler for selector {}", selector);
        Ok(self)
    }

    /// The active error envelope.
    pub fn profile(&self) -> ResponseProfile {
        self.profile
    }

    /// The registered selector table.
    pub fn table(&self) -> &SelectorTable {
        &self.table
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check whether a handler is registered for `selector`.
    pub fn contains(&self, selector: &Selector) -> bool {
        self.table.contains(selector)
    }

    /// Dispatch one call.
    ///
    /// An unknown selector is an ordinary 404 response. Argument decoding,
    /// handler and result encoding failures are returned as errors; use
    /// [`handle`](Self::handle) to have them rendered as 500 responses.
    pub async fn call(&self, ctx: CallContext) -> Result<RpcResponse> {
        let entry = match ctx.selector().and_then(|s| self.table.get(&s)) {
            Some(entry) => entry,
            None => {
                let selector = ctx.selector_hex();
                tracing::warn!("No handler for selector {} (to {})", selector, ctx.to);
                return Ok(self.profile.not_found(&selector));
            }
        };

        let function = entry.function();
        let args = function.decode_input(&ctx.data)?;
        tracing::debug!("Dispatching {} for {}", function.signature(), ctx.to);

        let output = entry
            .handler()
            .call(args, ctx)
            .await
            .map_err(RouterError::Handler)?;

        let encoded = output.encode(function)?;
        Ok(self.profile.success(encode_hex(&encoded)))
    }

    /// Dispatch one call, converting every failure into a 500 response.
    pub async fn handle(&self, ctx: CallContext) -> RpcResponse {
        match self.call(ctx).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Dispatch failed: {}", e);
                self.profile.internal_error(&e)
            }
        }
    }
}
