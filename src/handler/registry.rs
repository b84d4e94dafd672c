//! Selector table for dispatching calls by function selector.
//!
//! The table maps 4-byte selectors to a function descriptor plus its
//! handler. It is append-only: entries are never replaced or removed.
//!
//! # Example
//!
//! ```
//! use ccip_read_router::abi::Value;
//! use ccip_read_router::handler::SelectorTable;
//!
//! let mut table = SelectorTable::new();
//!
//! table
//!     .register("function foo() pure returns (uint256)", |_args, _ctx| async {
//!         Ok(Value::uint(42u64).into())
//!     })
//!     .unwrap();
//!
//! assert_eq!(table.len(), 1);
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use super::{CallContext, HandlerOutput};
use crate::abi::{Function, Selector, Value};
use crate::error::{BoxError, Result, RouterError};

/// Result type for handler functions.
pub type HandlerResult = std::result::Result<HandlerOutput, BoxError>;

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for handler functions.
pub trait Handler: Send + Sync + 'static {
    /// Handle a call with its decoded arguments.
    fn call(&self, args: Vec<Value>, ctx: CallContext) -> BoxFuture<'static, HandlerResult>;
}

/// Adapter turning an async closure into a [`Handler`].
pub struct FnHandler<F, Fut>
where
    F: Fn(Vec<Value>, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    handler: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnHandler<F, Fut>
where
    F: Fn(Vec<Value>, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    /// Wrap a closure.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut> Handler for FnHandler<F, Fut>
where
    F: Fn(Vec<Value>, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, args: Vec<Value>, ctx: CallContext) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.handler)(args, ctx))
    }
}

/// Anything that resolves to a [`Function`] at registration time.
pub trait IntoFunction {
    fn into_function(self) -> Result<Function>;
}

impl IntoFunction for Function {
    fn into_function(self) -> Result<Function> {
        Ok(self)
    }
}

impl IntoFunction for &Function {
    fn into_function(self) -> Result<Function> {
        Ok(self.clone())
    }
}

impl IntoFunction for &str {
    fn into_function(self) -> Result<Function> {
        Ok(Function::parse(self)?)
    }
}

impl IntoFunction for String {
    fn into_function(self) -> Result<Function> {
        self.as_str().into_function()
    }
}

impl<'a> IntoFunction for crate::abi::Result<&'a Function> {
    fn into_function(self) -> Result<Function> {
        Ok(self?.clone())
    }
}

/// A registered function and its handler.
pub struct FunctionEntry {
    function: Function,
    handler: Box<dyn Handler>,
}

impl FunctionEntry {
    /// The registered function descriptor.
    pub fn function(&self) -> &Function {
        &self.function
    }

    /// The handler invoked for this function.
    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

/// Append-only map from selector to registered function.
#[derive(Default)]
pub struct SelectorTable {
    entries: HashMap<Selector, FunctionEntry>,
}

impl SelectorTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure handler for a function.
    ///
    /// # Errors
    ///
    /// Fails if the descriptor does not parse, or if its selector is
    /// already registered.
    pub fn register<D, F, Fut>(&mut self, descriptor: D, handler: F) -> Result<Selector>
    where
        D: IntoFunction,
        F: Fn(Vec<Value>, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.insert(descriptor.into_function()?, Box::new(FnHandler::new(handler)))
    }

    /// Register a boxed handler for an already parsed function.
    ///
    /// # Errors
    ///
    /// Fails if the function does not validate, or if its selector is
    /// already registered.
    pub fn insert(&mut self, function: Function, handler: Box<dyn Handler>) -> Result<Selector> {
        function.validate()?;
        let selector = function.selector();
        if self.entries.contains_key(&selector) {
            return Err(RouterError::DuplicateSelector {
                selector,
                signature: function.signature(),
            });
        }

        tracing::debug!("Registered {} as {}", function.signature(), selector);
        self.entries.insert(selector, FunctionEntry { function, handler });
        Ok(selector)
    }

    /// Get the entry for a selector.
    pub fn get(&self, selector: &Selector) -> Option<&FunctionEntry> {
        self.entries.get(selector)
    }

    /// Check whether a selector is registered.
    pub fn contains(&self, selector: &Selector) -> bool {
        self.entries.contains_key(selector)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered functions, in no particular order.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.entries.values().map(FunctionEntry::function)
    }
}
