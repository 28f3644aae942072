//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes operation inputs, expected requests, simulated
//! responses, and expected parse results. JSON bodies are compared as parsed
//! values (not raw strings) to avoid false negatives from field-ordering
//! differences, and the nonce-bearing `Authorization` header is only checked
//! for presence and scheme.

use reader_core::{Config, HttpRequest, HttpResponse, ReaderClient};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ReaderClient {
    ReaderClient::new(Config {
        access_token: "some_access_key".to_string(),
        access_token_secret: "some_access_token".to_string(),
        base_url: Some(BASE_URL.to_string()),
    })
    .unwrap()
}

/// Dispatch a vector's `op` to the matching `build_*` method.
fn build(c: &ReaderClient, op: &str, args: &serde_json::Value) -> HttpRequest {
    let id = || args["id"].as_str().unwrap();
    match op {
        "user" => c.build_user(),
        "bookmark" => c.build_bookmark(id()),
        "add_bookmark" => c.build_add_bookmark(args["url"].as_str().unwrap()).unwrap(),
        "archive" => c.build_archive_bookmark(id()),
        "unarchive" => c.build_unarchive_bookmark(id()),
        "favourite" => c.build_favourite_bookmark(id()),
        "unfavourite" => c.build_unfavourite_bookmark(id()),
        "user_tags" => c.build_user_tags(),
        "tags" => c.build_tags(id()),
        "add_tags" => {
            let tags: Vec<&str> = args["tags"]
                .as_array()
                .unwrap()
                .iter()
                .map(|tag| tag.as_str().unwrap())
                .collect();
            c.build_add_tags(id(), &tags).unwrap()
        }
        "remove_tag" => c.build_remove_tag(id(), args["tag_id"].as_str().unwrap()),
        "article" => c.build_article(id()),
        other => panic!("unknown op: {other}"),
    }
}

fn response_from(case: &serde_json::Value) -> HttpResponse {
    let body = &case["response"]["body"];
    HttpResponse {
        status: case["response"]["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        // Error bodies are plain text; everything else is re-serialized JSON.
        body: match body.as_str() {
            Some(text) => text.to_string(),
            None => body.to_string(),
        },
    }
}

fn check_requests(raw: &str) {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let c = client();
    for case in vectors["requests"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let req = build(&c, case["op"].as_str().unwrap(), &case["args"]);
        let expected = &case["expected"];

        assert_eq!(
            req.method.as_str(),
            expected["method"].as_str().unwrap(),
            "{name}: method"
        );
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        if expected["body"].is_null() {
            assert!(req.body.is_none(), "{name}: expected no body");
        } else {
            let body: serde_json::Value =
                serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&body, &expected["body"], "{name}: body");
        }
        assert!(
            req.headers
                .iter()
                .any(|(header, value)| header == "Authorization" && value.starts_with("OAuth ")),
            "{name}: missing signed Authorization header"
        );
    }
}

fn check_responses(raw: &str) {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    let c = client();
    for case in vectors["responses"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let op = case["op"].as_str().unwrap();
        let response = response_from(case);
        let expected = &case["expected"];

        if let Some(message) = expected["error"].as_str() {
            let err = match op {
                "user" => c.parse_user(response).unwrap_err(),
                "bookmarks" => c.parse_bookmarks(response).unwrap_err(),
                "tags" | "user_tags" => c.parse_tags(response).unwrap_err(),
                "remove_tag" => c.parse_remove_tag(response).unwrap_err(),
                _ => c.parse_bookmark(response).unwrap_err(),
            };
            assert_eq!(err.to_string(), message, "{name}: error");
            continue;
        }

        match op {
            "user" => assert_eq!(
                c.parse_user(response).unwrap().username,
                expected["username"].as_str().unwrap(),
                "{name}: username"
            ),
            "bookmarks" => {
                let list = c.parse_bookmarks(response).unwrap();
                assert_eq!(
                    list.meta.item_count_total,
                    expected["total"].as_u64().unwrap(),
                    "{name}: total"
                );
                assert_eq!(
                    list.bookmarks.len() as u64,
                    expected["count"].as_u64().unwrap(),
                    "{name}: count"
                );
            }
            "tags" | "user_tags" => assert_eq!(
                c.parse_tags(response).unwrap().len() as u64,
                expected["count"].as_u64().unwrap(),
                "{name}: count"
            ),
            "remove_tag" => assert_eq!(
                c.parse_remove_tag(response).unwrap(),
                expected["ok"].as_bool().unwrap(),
                "{name}: flag"
            ),
            "bookmark" => assert_eq!(
                c.parse_bookmark(response).unwrap().id,
                expected["id"].as_str().unwrap(),
                "{name}: id"
            ),
            "article" => assert_eq!(
                c.parse_article(response).unwrap().id,
                expected["id"].as_str().unwrap(),
                "{name}: id"
            ),
            other => panic!("unknown op: {other}"),
        }
    }
}

#[test]
fn bookmark_vectors() {
    let raw = include_str!("../../test-vectors/bookmarks.json");
    check_requests(raw);
    check_responses(raw);
}

#[test]
fn tag_vectors() {
    let raw = include_str!("../../test-vectors/tags.json");
    check_requests(raw);
    check_responses(raw);
}
