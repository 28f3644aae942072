//! Async API client for a Reader-style bookmarking service.
//!
//! # Overview
//! [`ReaderClient`] authenticates every request with a pre-obtained access
//! token/secret pair and exposes one async method per service operation:
//! current user, bookmark listing/creation/actions, tag management, and
//! article fetching. Each call issues exactly one HTTP request and resolves
//! to exactly one `Result`; nothing is retried or cached, and no state is
//! shared between calls.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest` / `HttpResponse`);
//!   execution goes through an injected [`HttpTransport`], so tests swap in a
//!   fake transport or point the default reqwest transport at a mock server.
//! - Each operation is split into `build_*` / `parse_*` methods with the async
//!   wrapper composing the two, keeping the I/O boundary explicit.
//! - Non-2xx statuses surface as `ReaderError::Http` rendering
//!   `HTTP <status>: <body>`; network failures before a status line are
//!   `ReaderError::Transport`.
//! - DTOs are defined independently of the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::{Config, ReaderClient, DEFAULT_BASE_URL};
pub use error::ReaderError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{
    AddBookmark, AddTags, Article, Bookmark, BookmarkList, BookmarkMeta, BookmarkQuery, Tag,
    TagList, User,
};
