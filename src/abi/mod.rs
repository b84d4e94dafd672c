//! ABI module - Solidity ABI types, function descriptors and codec.
//!
//! Provides:
//! - [`ParamType`] / [`Value`] - schema and decoded values
//! - [`Function`] / [`Selector`] - parsed function descriptors
//! - [`Abi`] - JSON ABI documents
//! - [`encode`] / [`decode`] - head/tail ABI encoding
//!
//! # Example
//!
//! ```
//! use ccip_read_router::abi::{Function, Value};
//!
//! let bar = Function::parse("function bar(uint256) pure returns (uint256)").unwrap();
//! assert_eq!(bar.selector().to_string(), "0x0423a132");
//!
//! let call = bar.encode_input(&[Value::uint(40u64)]).unwrap();
//! assert_eq!(bar.decode_input(&call).unwrap(), vec![Value::uint(40u64)]);
//! ```

mod decode;
mod encode;
mod error;
mod function;
mod json;
mod param_type;
mod value;

pub use decode::decode;
pub use encode::encode;
pub use error::{AbiError, Result};
pub use function::{Function, Param, Selector, StateMutability};
pub use json::Abi;
pub use param_type::{ParamType, WORD_SIZE};
pub use value::{decode_hex, encode_hex, keccak256, Address, Value, Word};
