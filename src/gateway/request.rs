//! Request framing.
//!
//! Normalises the two supported framings into a [`CallContext`]:
//! - `GET /{sender}/{callData}[suffix]`
//! - `POST /` with body `{"sender": "0x...", "data": "0x..."}`
//!
//! Both require `sender` to be a valid account address and the call data
//! to be `0x`-prefixed hex with an even number of digits.

use serde::Deserialize;
use thiserror::Error;

use crate::abi::{decode_hex, Address};
use crate::handler::CallContext;

/// Why a request was rejected before dispatch.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid sender address `{0}`")]
    InvalidSender(String),

    #[error("invalid call data `{0}`")]
    InvalidCallData(String),

    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct PostBody {
    sender: Option<String>,
    data: Option<String>,
}

/// Build a call context from GET path segments.
///
/// `suffix` is removed from the end of `call_data` when present.
pub fn parse_get(sender: &str, call_data: &str, suffix: &str) -> Result<CallContext, RequestError> {
    let call_data = match suffix {
        "" => call_data,
        suffix => call_data.strip_suffix(suffix).unwrap_or(call_data),
    };
    build(sender, call_data)
}

/// Build a call context from a POST body.
pub fn parse_post(body: &[u8]) -> Result<CallContext, RequestError> {
    let body: PostBody = serde_json::from_slice(body)?;
    let sender = body.sender.ok_or(RequestError::MissingField("sender"))?;
    let data = body.data.ok_or(RequestError::MissingField("data"))?;
    build(&sender, &data)
}

fn build(sender: &str, call_data: &str) -> Result<CallContext, RequestError> {
    if sender.is_empty() {
        return Err(RequestError::MissingField("sender"));
    }
    if call_data.is_empty() {
        return Err(RequestError::MissingField("data"));
    }

    let to: Address = sender
        .parse()
        .map_err(|_| RequestError::InvalidSender(sender.to_string()))?;
    let data = decode_hex(call_data).map_err(|_| RequestError::InvalidCallData(call_data.to_string()))?;

    Ok(CallContext::new(to, data))
}
