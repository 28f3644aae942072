//! Request builder, dispatcher, and response parser for the Reader API.
//!
//! # Design
//! `ReaderClient` holds the base URL, the credentials, and an injected
//! transport — no other state, and nothing shared between in-flight calls.
//! Each operation is split into a `build_*` method that produces a signed
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! async operation methods compose the two around a transport round-trip.
//! The split keeps request shapes and response handling testable without a
//! network.
//!
//! Failed calls are never retried and callers get no ordering guarantee
//! between concurrently issued operations.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::auth::{authorization_header, percent_encode, Credentials};
use crate::error::ReaderError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{
    AddBookmark, AddTags, Article, Bookmark, BookmarkList, BookmarkQuery, Tag, TagList, User,
};

/// Root of the hosted Reader API. Overridden in tests to point at a local
/// mock server.
pub const DEFAULT_BASE_URL: &str = "https://www.readability.com/api/rest/v1";

/// Constructor options. Both credentials are required; `base_url` defaults to
/// [`DEFAULT_BASE_URL`].
#[derive(Clone, Default)]
pub struct Config {
    pub access_token: String,
    pub access_token_secret: String,
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Authenticated client for the Reader bookmarking service.
#[derive(Clone)]
pub struct ReaderClient {
    base_url: String,
    credentials: Credentials,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for ReaderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl ReaderClient {
    /// Construct a client over the default reqwest transport.
    ///
    /// Fails with [`ReaderError::Configuration`] when either credential is
    /// missing or empty.
    pub fn new(config: Config) -> Result<Self, ReaderError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Construct a client over an injected transport. Tests use this to
    /// substitute a fake transport instance.
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ReaderError> {
        if config.access_token.is_empty() {
            return Err(ReaderError::Configuration(
                "access_token is required".to_string(),
            ));
        }
        if config.access_token_secret.is_empty() {
            return Err(ReaderError::Configuration(
                "access_token_secret is required".to_string(),
            ));
        }
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            base_url,
            credentials: Credentials::new(config.access_token, config.access_token_secret),
            transport,
        })
    }

    // --- operations -------------------------------------------------------

    /// Fetch the currently authenticated user.
    pub async fn user(&self) -> Result<User, ReaderError> {
        let response = self.transport.execute(self.build_user()).await?;
        self.parse_user(response)
    }

    /// List the user's bookmarks; `query` fields are forwarded as query
    /// parameters.
    pub async fn bookmarks(&self, query: &BookmarkQuery) -> Result<BookmarkList, ReaderError> {
        let response = self.transport.execute(self.build_bookmarks(query)).await?;
        self.parse_bookmarks(response)
    }

    /// Fetch a single bookmark by id.
    pub async fn bookmark(&self, id: &str) -> Result<Bookmark, ReaderError> {
        let response = self.transport.execute(self.build_bookmark(id)).await?;
        self.parse_bookmark(response)
    }

    /// Bookmark `url`; the created resource comes back with its
    /// server-assigned id.
    pub async fn add_bookmark(&self, url: &str) -> Result<Bookmark, ReaderError> {
        let request = self.build_add_bookmark(url)?;
        let response = self.transport.execute(request).await?;
        self.parse_bookmark(response)
    }

    /// Mark a bookmark archived.
    pub async fn archive_bookmark(&self, id: &str) -> Result<Bookmark, ReaderError> {
        let response = self
            .transport
            .execute(self.build_archive_bookmark(id))
            .await?;
        self.parse_bookmark(response)
    }

    /// Move a bookmark back out of the archive.
    pub async fn unarchive_bookmark(&self, id: &str) -> Result<Bookmark, ReaderError> {
        let response = self
            .transport
            .execute(self.build_unarchive_bookmark(id))
            .await?;
        self.parse_bookmark(response)
    }

    /// Mark a bookmark as a favourite.
    pub async fn favourite_bookmark(&self, id: &str) -> Result<Bookmark, ReaderError> {
        let response = self
            .transport
            .execute(self.build_favourite_bookmark(id))
            .await?;
        self.parse_bookmark(response)
    }

    /// Spelling alias for [`favourite_bookmark`](Self::favourite_bookmark);
    /// delegates to the single implementation.
    pub async fn favorite_bookmark(&self, id: &str) -> Result<Bookmark, ReaderError> {
        self.favourite_bookmark(id).await
    }

    /// Clear a bookmark's favourite flag.
    pub async fn unfavourite_bookmark(&self, id: &str) -> Result<Bookmark, ReaderError> {
        let response = self
            .transport
            .execute(self.build_unfavourite_bookmark(id))
            .await?;
        self.parse_bookmark(response)
    }

    /// All tags owned by the current user.
    pub async fn user_tags(&self) -> Result<Vec<Tag>, ReaderError> {
        let response = self.transport.execute(self.build_user_tags()).await?;
        self.parse_tags(response)
    }

    /// Tags attached to one bookmark.
    pub async fn tags(&self, bookmark_id: &str) -> Result<Vec<Tag>, ReaderError> {
        let response = self.transport.execute(self.build_tags(bookmark_id)).await?;
        self.parse_tags(response)
    }

    /// Attach `tags` to a bookmark. The result is the bookmark's full updated
    /// tag set, not just the newly added ones.
    pub async fn add_tags(&self, bookmark_id: &str, tags: &[&str]) -> Result<Vec<Tag>, ReaderError> {
        let request = self.build_add_tags(bookmark_id, tags)?;
        let response = self.transport.execute(request).await?;
        self.parse_tags(response)
    }

    /// Detach a tag from a bookmark; resolves to a success flag.
    pub async fn remove_tag(&self, bookmark_id: &str, tag_id: &str) -> Result<bool, ReaderError> {
        let response = self
            .transport
            .execute(self.build_remove_tag(bookmark_id, tag_id))
            .await?;
        self.parse_remove_tag(response)
    }

    /// Fetch the parsed article behind a bookmark.
    pub async fn article(&self, id: &str) -> Result<Article, ReaderError> {
        let response = self.transport.execute(self.build_article(id)).await?;
        self.parse_article(response)
    }

    // --- request builders -------------------------------------------------

    pub fn build_user(&self) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("{}/users/_current", self.base_url),
            None,
        )
    }

    pub fn build_bookmarks(&self, query: &BookmarkQuery) -> HttpRequest {
        let mut url = format!("{}/bookmarks", self.base_url);
        let pairs = query.to_pairs();
        if !pairs.is_empty() {
            let encoded = pairs
                .iter()
                .map(|(name, value)| format!("{name}={}", percent_encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&encoded);
        }
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_bookmark(&self, id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("{}/bookmarks/{}", self.base_url, percent_encode(id)),
            None,
        )
    }

    pub fn build_add_bookmark(&self, url: &str) -> Result<HttpRequest, ReaderError> {
        let payload = AddBookmark {
            url: url.to_string(),
        };
        let body =
            serde_json::to_string(&payload).map_err(|e| ReaderError::Serialization(e.to_string()))?;
        Ok(self.request(
            HttpMethod::Post,
            format!("{}/bookmarks", self.base_url),
            Some(body),
        ))
    }

    pub fn build_archive_bookmark(&self, id: &str) -> HttpRequest {
        self.bookmark_action(id, "archive")
    }

    pub fn build_unarchive_bookmark(&self, id: &str) -> HttpRequest {
        self.bookmark_action(id, "unarchive")
    }

    pub fn build_favourite_bookmark(&self, id: &str) -> HttpRequest {
        self.bookmark_action(id, "favourite")
    }

    pub fn build_unfavourite_bookmark(&self, id: &str) -> HttpRequest {
        self.bookmark_action(id, "unfavourite")
    }

    pub fn build_user_tags(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/tags", self.base_url), None)
    }

    pub fn build_tags(&self, bookmark_id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!(
                "{}/bookmarks/{}/tags",
                self.base_url,
                percent_encode(bookmark_id)
            ),
            None,
        )
    }

    pub fn build_add_tags(
        &self,
        bookmark_id: &str,
        tags: &[&str],
    ) -> Result<HttpRequest, ReaderError> {
        let payload = AddTags {
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        };
        let body =
            serde_json::to_string(&payload).map_err(|e| ReaderError::Serialization(e.to_string()))?;
        Ok(self.request(
            HttpMethod::Post,
            format!(
                "{}/bookmarks/{}/tags",
                self.base_url,
                percent_encode(bookmark_id)
            ),
            Some(body),
        ))
    }

    pub fn build_remove_tag(&self, bookmark_id: &str, tag_id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            format!(
                "{}/tags/{}/{}",
                self.base_url,
                percent_encode(bookmark_id),
                percent_encode(tag_id)
            ),
            None,
        )
    }

    pub fn build_article(&self, id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("{}/articles/{}", self.base_url, percent_encode(id)),
            None,
        )
    }

    fn bookmark_action(&self, id: &str, action: &str) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            format!(
                "{}/bookmarks/{}/{action}",
                self.base_url,
                percent_encode(id)
            ),
            None,
        )
    }

    /// Every request goes out signed; JSON bodies carry a content type.
    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![(
            "Authorization".to_string(),
            authorization_header(&self.credentials, method, &url),
        )];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    // --- response parsers -------------------------------------------------

    pub fn parse_user(&self, response: HttpResponse) -> Result<User, ReaderError> {
        parse_json(response)
    }

    pub fn parse_bookmarks(&self, response: HttpResponse) -> Result<BookmarkList, ReaderError> {
        parse_json(response)
    }

    /// Shared by single-bookmark reads, creates, and action endpoints — they
    /// all answer with the (updated) bookmark.
    pub fn parse_bookmark(&self, response: HttpResponse) -> Result<Bookmark, ReaderError> {
        parse_json(response)
    }

    /// Unwraps the service's `{"tags": […]}` envelope.
    pub fn parse_tags(&self, response: HttpResponse) -> Result<Vec<Tag>, ReaderError> {
        let list: TagList = parse_json(response)?;
        Ok(list.tags)
    }

    pub fn parse_remove_tag(&self, response: HttpResponse) -> Result<bool, ReaderError> {
        ensure_success(&response)?;
        Ok(true)
    }

    pub fn parse_article(&self, response: HttpResponse) -> Result<Article, ReaderError> {
        parse_json(response)
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(response: HttpResponse) -> Result<T, ReaderError> {
    ensure_success(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ReaderError::Deserialization(e.to_string()))
}

/// Any 2xx status is the success branch; everything else maps to `Http` with
/// the body kept as plain error text.
fn ensure_success(response: &HttpResponse) -> Result<(), ReaderError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    warn!(status = response.status, "request failed");
    Err(ReaderError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
