//! Error types for the Reader API client.
//!
//! # Design
//! All per-request failures surface through `Result`, never a panic. A non-2xx
//! response always lands in `Http` with the raw status code and body text; its
//! display is exactly `HTTP <status>: <body>`, which callers match on.
//! `Transport` covers network-level failures (DNS, refused connection, reset)
//! where no status line was ever received. `Configuration` is the one error
//! returned synchronously, by the constructor.

use std::fmt;

/// Errors returned by [`ReaderClient`](crate::ReaderClient).
#[derive(Debug)]
pub enum ReaderError {
    /// A required credential was missing or empty at construction.
    Configuration(String),

    /// The server answered with a non-2xx status.
    Http { status: u16, body: String },

    /// The request never produced an HTTP status (network-level failure).
    Transport(String),

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            ReaderError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            ReaderError::Transport(msg) => write!(f, "transport error: {msg}"),
            ReaderError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
            ReaderError::Deserialization(msg) => write!(f, "deserialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ReaderError {}
