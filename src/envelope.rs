//! Response envelopes.
//!
//! Two body shapes are found in deployed gateways. Both agree on success
//! (`{"data": "0x..."}`) and differ on errors:
//!
//! | case            | [`ResponseProfile::Structured`]                 | [`ResponseProfile::Flat`]       |
//! |-----------------|-------------------------------------------------|---------------------------------|
//! | unknown selector (404) | `{"data": {"error": msg}}`              | `{"message": msg}`              |
//! | bad request (400)      | `{"error": msg, "status": 400}`         | `{"message": msg}`              |
//! | internal fault (500)   | `{"data": {"error": msg}}`              | `{"message": msg}`              |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

/// Message returned for malformed requests.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request format";

/// Error body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseProfile {
    /// Errors nested under `data.error`.
    #[default]
    Structured,
    /// Errors in a top-level `message` field.
    Flat,
}

impl ResponseProfile {
    /// `200 {"data": "0x..."}`.
    pub fn success(self, data_hex: String) -> RpcResponse {
        RpcResponse::new(200, json!({ "data": data_hex }))
    }

    /// `404` for a selector with no registered handler.
    pub fn not_found(self, selector_hex: &str) -> RpcResponse {
        let message = format!("No implementation for function with selector {}", selector_hex);
        RpcResponse::new(404, self.error_body(message))
    }

    /// `400` for a request that failed transport validation.
    pub fn invalid_request(self) -> RpcResponse {
        let body = match self {
            ResponseProfile::Structured => json!({
                "error": INVALID_REQUEST_MESSAGE,
                "status": 400,
            }),
            ResponseProfile::Flat => json!({ "message": INVALID_REQUEST_MESSAGE }),
        };
        RpcResponse::new(400, body)
    }

    /// `500` for any fault after validation.
    pub fn internal_error(self, description: impl fmt::Display) -> RpcResponse {
        let message = format!("Internal server error: {}", description);
        RpcResponse::new(500, self.error_body(message))
    }

    fn error_body(self, message: String) -> Json {
        match self {
            ResponseProfile::Structured => json!({ "data": { "error": message } }),
            ResponseProfile::Flat => json!({ "message": message }),
        }
    }
}

impl FromStr for ResponseProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structured" | "a" => Ok(ResponseProfile::Structured),
            "flat" | "b" => Ok(ResponseProfile::Flat),
            other => Err(format!("unknown response profile `{}`", other)),
        }
    }
}

/// Status code and JSON body of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcResponse {
    pub status: u16,
    pub body: Json,
}

impl RpcResponse {
    /// Create a response from a status code and JSON body.
    pub fn new(status: u16, body: Json) -> Self {
        Self { status, body }
    }

    /// Check whether the status is 200.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_profile_independent() {
        let a = ResponseProfile::Structured.success("0x2a".into());
        let b = ResponseProfile::Flat.success("0x2a".into());
        assert_eq!(a, b);
        assert_eq!(a.status, 200);
        assert_eq!(a.body, json!({ "data": "0x2a" }));
        assert!(a.is_success());
    }

    #[test]
    fn test_structured_errors() {
        let profile = ResponseProfile::Structured;

        let miss = profile.not_found("0xc2985578");
        assert_eq!(miss.status, 404);
        assert_eq!(
            miss.body,
            json!({ "data": { "error": "No implementation for function with selector 0xc2985578" } })
        );

        let bad = profile.invalid_request();
        assert_eq!(bad.status, 400);
        assert_eq!(bad.body, json!({ "error": "Invalid request format", "status": 400 }));

        let fault = profile.internal_error("Test error");
        assert_eq!(fault.status, 500);
        assert_eq!(
            fault.body,
            json!({ "data": { "error": "Internal server error: Test error" } })
        );
    }

    #[test]
    fn test_flat_errors() {
        let profile = ResponseProfile::Flat;

        assert_eq!(
            profile.not_found("0xfa2cc503").body,
            json!({ "message": "No implementation for function with selector 0xfa2cc503" })
        );
        assert_eq!(
            profile.invalid_request().body,
            json!({ "message": "Invalid request format" })
        );
        assert_eq!(
            profile.internal_error("boom").body,
            json!({ "message": "Internal server error: boom" })
        );
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("structured".parse::<ResponseProfile>().unwrap(), ResponseProfile::Structured);
        assert_eq!("FLAT".parse::<ResponseProfile>().unwrap(), ResponseProfile::Flat);
        assert!("nested".parse::<ResponseProfile>().is_err());
        assert_eq!(ResponseProfile::default(), ResponseProfile::Structured);
    }
}
