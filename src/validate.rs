//! Classification of RESAS-API response bodies.
//!
//! RESAS-API returns its error status code in the body although the status
//! in the response header is often 200, so every decoded body goes through
//! [`validate`] before any field is read.

use serde_json::Value;

use crate::error::{Error, Result};

/// Map a RESAS status code to its error.
pub fn error_for_status_code(status_code: &str, message: Option<String>) -> Error {
    match status_code {
        "403" => Error::Auth,
        "404" => Error::NotFound,
        "429" => Error::RateLimit,
        other => Error::Unexpected {
            status_code: other.to_string(),
            message,
        },
    }
}

/// Fail if `payload` carries a `statusCode`, or lacks a `result`.
///
/// A `null` payload or a `null` result counts as a missing result.
pub fn validate(payload: &Value) -> Result<()> {
    if let Some(status_code) = payload.get("statusCode") {
        let status_code = match status_code {
            Value::String(code) => code.clone(),
            other => other.to_string(),
        };
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(String::from);
        return Err(error_for_status_code(&status_code, message));
    }
    match payload.get("result") {
        Some(result) if !result.is_null() => Ok(()),
        _ => Err(Error::EmptyResult),
    }
}
