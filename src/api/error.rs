//! Normalized API failures.
//!
//! Every HTTP call funnels its failure through [`ApiError`], so callers only
//! ever see a kind plus a human-readable message and never dig through
//! response bodies themselves.

use thiserror::Error;

/// Message shown when the server gave us nothing better.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response at all: DNS, refused connection, timeout.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success status but the body didn't have the expected shape.
    #[error("Unexpected response: {message}")]
    Decode { message: String },

    /// The request could not be built from the given input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Stable tag for logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "network",
            ApiError::Status { .. } => "status",
            ApiError::Decode { .. } => "decode",
            ApiError::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Text suitable for a notice or an error panel.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build a status error from a raw response body.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = message_from_body(body).unwrap_or_else(|| match status {
            401 => "Session expired. Please sign in again.".to_string(),
            403 => "You are not allowed to do that.".to_string(),
            404 => "Not found.".to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        });
        ApiError::Status { status, message }
    }

    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::Network {
                message: "request timed out".to_string(),
            };
        }
        if err.is_decode() {
            return ApiError::Decode {
                message: err.to_string(),
            };
        }
        ApiError::Network {
            message: err.to_string(),
        }
    }
}

/// Pull an error message out of a JSON body.
///
/// Accepts `{"message": ..}`, `{"error": {"message": ..}}` and
/// `{"error": ".."}`. Anything else yields `None`.
pub fn message_from_body(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let candidate = value
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        })
        .or_else(|| value.get("error").and_then(|e| e.as_str()))?;

    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
