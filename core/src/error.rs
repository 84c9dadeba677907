//! Error types for the UKG and entitlements clients.
//!
//! `NotFound` and `Unauthorized` get dedicated variants because callers
//! branch on them (missing record, expired token). Every other non-success
//! status lands in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by client parse methods and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 401: missing, unknown or expired token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host transport failed before a response was received.
    #[error("transport failed: {0}")]
    Transport(String),
}
