//! Fixture implementation of the Reader API used by the client's tests.
//!
//! Seeded with a small, fixed dataset: user `jdoe`, a two-bookmark page of a
//! 76-item collection, four user tags, and one parsed article. Every route
//! rejects requests whose `Authorization` header does not carry the expected
//! `oauth_token` with a plain-text `401 Failed to authenticate.`, matching the
//! hosted service's error bodies.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Token the fixture server accepts; anything else is a 401.
pub const ACCESS_TOKEN: &str = "some_access_key";
/// Secret paired with [`ACCESS_TOKEN`]; the server never sees it, clients
/// sign with it.
pub const ACCESS_TOKEN_SECRET: &str = "some_access_token";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub archive: bool,
    pub favourite: bool,
    pub date_added: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookmarkMeta {
    pub item_count_total: u64,
    pub item_count: u64,
    pub page: u32,
    pub num_pages: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookmarkList {
    pub meta: BookmarkMeta,
    pub bookmarks: Vec<Bookmark>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TagList {
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub url: String,
    pub title: String,
    pub author: String,
    pub content: String,
    pub word_count: u64,
}

#[derive(Deserialize)]
pub struct AddBookmark {
    pub url: String,
}

#[derive(Deserialize)]
pub struct AddTags {
    pub tags: Vec<String>,
}

type Rejection = (StatusCode, String);

pub struct Store {
    user: User,
    /// Collection-wide bookmark count; independent of the stored page window.
    item_count_total: u64,
    bookmarks: Vec<Bookmark>,
    bookmark_tags: HashMap<String, Vec<Tag>>,
    user_tags: Vec<Tag>,
    articles: HashMap<String, Article>,
    next_bookmark_id: u64,
    next_tag_id: u64,
}

impl Store {
    /// The fixed dataset every fresh `app()` starts from.
    pub fn seed() -> Self {
        let tag = |id: &str, name: &str| Tag {
            id: id.to_string(),
            name: name.to_string(),
        };
        let user_tags = vec![
            tag("121", "longform"),
            tag("122", "politics"),
            tag("123", "reading"),
            tag("124", "tech"),
        ];
        let bookmarks = vec![
            Bookmark {
                id: "75".to_string(),
                url: "http://example.com/the-long-read.html".to_string(),
                title: Some("The Long Read".to_string()),
                archive: false,
                favourite: false,
                date_added: "2024-11-02 09:15:00".to_string(),
            },
            Bookmark {
                id: "76".to_string(),
                url: "http://example.com/weekend-essay.html".to_string(),
                title: Some("Weekend Essay".to_string()),
                archive: false,
                favourite: false,
                date_added: "2024-11-03 18:40:00".to_string(),
            },
        ];
        let mut bookmark_tags = HashMap::new();
        bookmark_tags.insert("75".to_string(), vec![tag("123", "reading")]);

        let mut articles = HashMap::new();
        articles.insert(
            "47g6s8e7".to_string(),
            Article {
                id: "47g6s8e7".to_string(),
                url: "http://example.com/the-long-read.html".to_string(),
                title: "The Long Read".to_string(),
                author: "J. Doe".to_string(),
                content: "<p>Lorem ipsum dolor sit amet.</p>".to_string(),
                word_count: 5,
            },
        );

        Self {
            user: User {
                username: "jdoe".to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                date_joined: "2011-03-30 04:21:01".to_string(),
            },
            item_count_total: 76,
            bookmarks,
            bookmark_tags,
            user_tags,
            articles,
            next_bookmark_id: 77,
            next_tag_id: 125,
        }
    }

    fn bookmark_mut(&mut self, id: &str) -> Result<&mut Bookmark, Rejection> {
        self.bookmarks
            .iter_mut()
            .find(|bookmark| bookmark.id == id)
            .ok_or((StatusCode::NOT_FOUND, "bookmark not found".to_string()))
    }

    fn has_bookmark(&self, id: &str) -> bool {
        self.bookmarks.iter().any(|bookmark| bookmark.id == id)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seed()));
    Router::new()
        .route("/users/_current", get(current_user))
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route("/bookmarks/{id}", get(get_bookmark))
        .route("/bookmarks/{id}/archive", post(archive_bookmark))
        .route("/bookmarks/{id}/unarchive", post(unarchive_bookmark))
        .route("/bookmarks/{id}/favourite", post(favourite_bookmark))
        .route("/bookmarks/{id}/unfavourite", post(unfavourite_bookmark))
        .route("/bookmarks/{id}/tags", get(bookmark_tags).post(add_tags))
        .route("/tags", get(user_tags))
        .route("/tags/{bookmark_id}/{tag_id}", delete(remove_tag))
        .route("/articles/{id}", get(get_article))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// The signature itself is not verified — the fixture only checks that the
/// request was signed with the expected token.
fn require_auth(headers: &HeaderMap) -> Result<(), Rejection> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value.starts_with("OAuth ")
                && value.contains(&format!("oauth_token=\"{ACCESS_TOKEN}\""))
        })
        .unwrap_or(false);
    if authorized {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            "Failed to authenticate.".to_string(),
        ))
    }
}

async fn current_user(State(db): State<Db>, headers: HeaderMap) -> Result<Json<User>, Rejection> {
    require_auth(&headers)?;
    Ok(Json(db.read().await.user.clone()))
}

async fn list_bookmarks(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<BookmarkList>, Rejection> {
    require_auth(&headers)?;
    let store = db.read().await;
    let wanted = |param: &str, flag: bool| match params.get(param).map(String::as_str) {
        Some("1") => flag,
        Some(_) => !flag,
        None => true,
    };
    let bookmarks: Vec<Bookmark> = store
        .bookmarks
        .iter()
        .filter(|bookmark| wanted("archive", bookmark.archive))
        .filter(|bookmark| wanted("favourite", bookmark.favourite))
        .cloned()
        .collect();
    let item_count = bookmarks.len() as u64;
    let num_pages = if item_count == 0 {
        0
    } else {
        store.item_count_total.div_ceil(item_count) as u32
    };
    Ok(Json(BookmarkList {
        meta: BookmarkMeta {
            item_count_total: store.item_count_total,
            item_count,
            page: 1,
            num_pages,
        },
        bookmarks,
    }))
}

async fn create_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AddBookmark>,
) -> Result<(StatusCode, Json<Bookmark>), Rejection> {
    require_auth(&headers)?;
    let mut store = db.write().await;
    if store.bookmarks.iter().any(|bookmark| bookmark.url == input.url) {
        return Err((StatusCode::CONFLICT, "bookmark already exists".to_string()));
    }
    let bookmark = Bookmark {
        id: store.next_bookmark_id.to_string(),
        url: input.url,
        title: None,
        archive: false,
        favourite: false,
        date_added: "2025-01-01 00:00:00".to_string(),
    };
    store.next_bookmark_id += 1;
    store.bookmarks.push(bookmark.clone());
    Ok((StatusCode::CREATED, Json(bookmark)))
}

async fn get_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>, Rejection> {
    require_auth(&headers)?;
    let store = db.read().await;
    store
        .bookmarks
        .iter()
        .find(|bookmark| bookmark.id == id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "bookmark not found".to_string()))
}

async fn archive_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>, Rejection> {
    set_flags(&db, &headers, &id, |bookmark| bookmark.archive = true).await
}

async fn unarchive_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>, Rejection> {
    set_flags(&db, &headers, &id, |bookmark| bookmark.archive = false).await
}

async fn favourite_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>, Rejection> {
    set_flags(&db, &headers, &id, |bookmark| bookmark.favourite = true).await
}

async fn unfavourite_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Bookmark>, Rejection> {
    set_flags(&db, &headers, &id, |bookmark| bookmark.favourite = false).await
}

async fn set_flags(
    db: &Db,
    headers: &HeaderMap,
    id: &str,
    apply: impl FnOnce(&mut Bookmark),
) -> Result<Json<Bookmark>, Rejection> {
    require_auth(headers)?;
    let mut store = db.write().await;
    let bookmark = store.bookmark_mut(id)?;
    apply(bookmark);
    Ok(Json(bookmark.clone()))
}

async fn bookmark_tags(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TagList>, Rejection> {
    require_auth(&headers)?;
    let store = db.read().await;
    if !store.has_bookmark(&id) {
        return Err((StatusCode::NOT_FOUND, "bookmark not found".to_string()));
    }
    Ok(Json(TagList {
        tags: store.bookmark_tags.get(&id).cloned().unwrap_or_default(),
    }))
}

async fn add_tags(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<AddTags>,
) -> Result<Json<TagList>, Rejection> {
    require_auth(&headers)?;
    let mut store = db.write().await;
    if !store.has_bookmark(&id) {
        return Err((StatusCode::NOT_FOUND, "bookmark not found".to_string()));
    }
    for name in input.tags {
        let attached = store.bookmark_tags.entry(id.clone()).or_default();
        if attached.iter().any(|tag| tag.name == name) {
            continue;
        }
        let tag = Tag {
            id: store.next_tag_id.to_string(),
            name,
        };
        store.next_tag_id += 1;
        store
            .bookmark_tags
            .entry(id.clone())
            .or_default()
            .push(tag.clone());
        if !store.user_tags.iter().any(|existing| existing.name == tag.name) {
            store.user_tags.push(tag);
        }
    }
    Ok(Json(TagList {
        tags: store.bookmark_tags.get(&id).cloned().unwrap_or_default(),
    }))
}

async fn user_tags(State(db): State<Db>, headers: HeaderMap) -> Result<Json<TagList>, Rejection> {
    require_auth(&headers)?;
    Ok(Json(TagList {
        tags: db.read().await.user_tags.clone(),
    }))
}

async fn remove_tag(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((bookmark_id, tag_id)): Path<(String, String)>,
) -> Result<StatusCode, Rejection> {
    require_auth(&headers)?;
    let mut store = db.write().await;
    let tags = store
        .bookmark_tags
        .get_mut(&bookmark_id)
        .ok_or((StatusCode::NOT_FOUND, "tag not found".to_string()))?;
    let before = tags.len();
    tags.retain(|tag| tag.id != tag_id);
    if tags.len() == before {
        return Err((StatusCode::NOT_FOUND, "tag not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_article(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Article>, Rejection> {
    require_auth(&headers)?;
    db.read()
        .await
        .articles
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "article not found".to_string()))
}
