//! Domain DTOs for the Reader API.
//!
//! # Design
//! These types mirror the service's response shapes but are defined
//! independently of the mock-server crate; integration tests catch any schema
//! drift between the two. Entities are immutable snapshots of server state;
//! the client never caches or mutates them locally. Fields the service may
//! omit are `Option` or carry a serde default.

use serde::{Deserialize, Serialize};

/// The authenticated user, as returned by `/users/_current`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<String>,
}

/// A single bookmark. Ids are opaque server-assigned strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub archive: bool,
    #[serde(default)]
    pub favourite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
}

/// Pagination block accompanying a bookmark listing.
///
/// `item_count_total` counts the whole collection; `item_count` counts only
/// the items in this page. The two are independent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkMeta {
    pub item_count_total: u64,
    pub item_count: u64,
    pub page: u32,
    pub num_pages: u32,
}

/// One page of a user's bookmarks plus its pagination meta.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkList {
    pub meta: BookmarkMeta,
    pub bookmarks: Vec<Bookmark>,
}

/// A tag, either from the user's tag list or attached to a bookmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Wire envelope for tag sequences; the service wraps them in an object.
/// The client unwraps this so tag operations return a plain `Vec<Tag>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagList {
    pub tags: Vec<Tag>,
}

/// Parsed article content behind a bookmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
}

/// Request payload for creating a bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookmark {
    pub url: String,
}

/// Request payload for attaching tags to a bookmark. Order is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTags {
    pub tags: Vec<String>,
}

/// Filters forwarded as query parameters by
/// [`ReaderClient::bookmarks`](crate::ReaderClient::bookmarks).
///
/// All fields are optional; `BookmarkQuery::default()` lists the first page
/// with the service's defaults.
#[derive(Debug, Clone, Default)]
pub struct BookmarkQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub archive: Option<bool>,
    pub favourite: Option<bool>,
    pub domain: Option<String>,
    pub tags: Vec<String>,
    pub order: Option<String>,
}

impl BookmarkQuery {
    /// The query parameters to send, in a fixed order. Unset fields are
    /// skipped; booleans become `0`/`1`; tags are comma-joined.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(archive) = self.archive {
            pairs.push(("archive", flag(archive)));
        }
        if let Some(favourite) = self.favourite {
            pairs.push(("favourite", flag(favourite)));
        }
        if let Some(domain) = &self.domain {
            pairs.push(("domain", domain.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        if let Some(order) = &self.order {
            pairs.push(("order", order.clone()));
        }
        pairs
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
