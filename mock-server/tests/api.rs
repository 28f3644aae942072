use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Bookmark, BookmarkList, TagList, User, ACCESS_TOKEN};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn auth_header() -> String {
    format!("OAuth oauth_token=\"{ACCESS_TOKEN}\", oauth_signature=\"sig\"")
}

fn signed(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, auth_header())
        .body(String::new())
        .unwrap()
}

fn signed_json(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, auth_header())
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn unsigned_request_is_rejected_with_plain_text_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/users/_current")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(resp).await, "Failed to authenticate.");
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/bookmarks")
                .header(
                    http::header::AUTHORIZATION,
                    "OAuth oauth_token=\"not_the_token\"",
                )
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- user ---

#[tokio::test]
async fn current_user_returns_the_fixture_user() {
    let resp = app()
        .oneshot(signed("GET", "/users/_current"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.username, "jdoe");
}

// --- bookmarks ---

#[tokio::test]
async fn list_bookmarks_keeps_collection_total_apart_from_page_size() {
    let resp = app().oneshot(signed("GET", "/bookmarks")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: BookmarkList = body_json(resp).await;
    assert_eq!(list.meta.item_count_total, 76);
    assert_eq!(list.meta.item_count, 2);
    assert_eq!(list.bookmarks.len(), 2);
}

#[tokio::test]
async fn get_bookmark_returns_the_requested_id() {
    let resp = app().oneshot(signed("GET", "/bookmarks/75")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bookmark: Bookmark = body_json(resp).await;
    assert_eq!(bookmark.id, "75");
}

#[tokio::test]
async fn get_bookmark_unknown_id_is_404() {
    let resp = app().oneshot(signed("GET", "/bookmarks/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "bookmark not found");
}

#[tokio::test]
async fn create_bookmark_assigns_the_next_id() {
    let resp = app()
        .oneshot(signed_json(
            "POST",
            "/bookmarks",
            r#"{"url":"http://some.url.com/article.html"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let bookmark: Bookmark = body_json(resp).await;
    assert_eq!(bookmark.id, "77");
    assert_eq!(bookmark.url, "http://some.url.com/article.html");
}

#[tokio::test]
async fn create_bookmark_with_seeded_url_conflicts() {
    let resp = app()
        .oneshot(signed_json(
            "POST",
            "/bookmarks",
            r#"{"url":"http://example.com/the-long-read.html"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_text(resp).await, "bookmark already exists");
}

#[tokio::test]
async fn archive_action_sets_the_flag() {
    let resp = app()
        .oneshot(signed("POST", "/bookmarks/75/archive"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bookmark: Bookmark = body_json(resp).await;
    assert_eq!(bookmark.id, "75");
    assert!(bookmark.archive);
}

#[tokio::test]
async fn favourite_action_on_unknown_bookmark_is_404() {
    let resp = app()
        .oneshot(signed("POST", "/bookmarks/999/favourite"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- tags ---

#[tokio::test]
async fn user_tags_returns_the_four_seeded_tags() {
    let resp = app().oneshot(signed("GET", "/tags")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: TagList = body_json(resp).await;
    assert_eq!(list.tags.len(), 4);
}

#[tokio::test]
async fn bookmark_tags_returns_the_seeded_association() {
    let resp = app()
        .oneshot(signed("GET", "/bookmarks/75/tags"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: TagList = body_json(resp).await;
    assert_eq!(list.tags.len(), 1);
    assert_eq!(list.tags[0].id, "123");
}

#[tokio::test]
async fn add_tags_returns_the_full_updated_set() {
    let resp = app()
        .oneshot(signed_json(
            "POST",
            "/bookmarks/75/tags",
            r#"{"tags":["tag1","tag2","tag3"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list: TagList = body_json(resp).await;
    assert_eq!(list.tags.len(), 4);
}

#[tokio::test]
async fn remove_unknown_tag_is_404() {
    let resp = app()
        .oneshot(signed("DELETE", "/tags/75/999"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "tag not found");
}

// --- articles ---

#[tokio::test]
async fn get_article_returns_the_fixture() {
    let resp = app()
        .oneshot(signed("GET", "/articles/47g6s8e7"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let article: mock_server::Article = body_json(resp).await;
    assert_eq!(article.id, "47g6s8e7");
}

#[tokio::test]
async fn get_article_unknown_id_is_404() {
    let resp = app()
        .oneshot(signed("GET", "/articles/nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "article not found");
}

// --- multi-step lifecycle over one app ---

#[tokio::test]
async fn tag_lifecycle_and_favourite_filter() {
    use tower::Service;

    let mut app = app().into_service();

    // favourite bookmark 76
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(signed("POST", "/bookmarks/76/favourite"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bookmark: Bookmark = body_json(resp).await;
    assert!(bookmark.favourite);

    // the favourite filter narrows the listing to it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(signed("GET", "/bookmarks?favourite=1"))
        .await
        .unwrap();
    let list: BookmarkList = body_json(resp).await;
    assert_eq!(list.bookmarks.len(), 1);
    assert_eq!(list.bookmarks[0].id, "76");
    assert_eq!(list.meta.item_count_total, 76); // collection total unchanged

    // add three tags to 75, then remove the seeded one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(signed_json(
            "POST",
            "/bookmarks/75/tags",
            r#"{"tags":["tag1","tag2","tag3"]}"#,
        ))
        .await
        .unwrap();
    let list: TagList = body_json(resp).await;
    assert_eq!(list.tags.len(), 4);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(signed("DELETE", "/tags/75/123"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(signed("GET", "/bookmarks/75/tags"))
        .await
        .unwrap();
    let list: TagList = body_json(resp).await;
    assert_eq!(list.tags.len(), 3);
    assert!(list.tags.iter().all(|tag| tag.id != "123"));

    // duplicate tag names are not re-added
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(signed_json(
            "POST",
            "/bookmarks/75/tags",
            r#"{"tags":["tag1"]}"#,
        ))
        .await
        .unwrap();
    let list: TagList = body_json(resp).await;
    assert_eq!(list.tags.len(), 3);
}
