use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tutorial_api::{ApiConfig, Tutorial, build_router};
use tutorial_store::TutorialStore;

/// Spin up the HTTP server on an OS-assigned port, returning the base URL
/// and the store behind it.
async fn spawn_test_server() -> (String, Arc<TutorialStore>) {
    let store = Arc::new(TutorialStore::new());
    let config = ApiConfig::default().with_prod_url("https://tutorials.example");
    let app = build_router(Arc::clone(&store), &config).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{}", port), store)
}

async fn create(client: &Client, base: &str, title: &str, description: &str) -> Tutorial {
    client
        .post(format!("{}/api/tutorials", base))
        .json(&json!({ "title": title, "description": description }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

// ── Listing ──────────────────────────────────────────────────────

#[tokio::test]
async fn list_empty_returns_204() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/tutorials", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn list_returns_all_in_order() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));
    store.save(Tutorial::new("Rust", "ownership", true));

    let resp = reqwest::get(format!("{}/api/tutorials", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Tutorial> = resp.json().await.unwrap();
    assert_eq!(
        body,
        vec![
            Tutorial::new("Go", "intro", false).with_id(1),
            Tutorial::new("Rust", "ownership", true).with_id(2),
        ]
    );
}

#[tokio::test]
async fn list_filters_by_title2() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));
    store.save(Tutorial::new("Rust", "intro", false));

    let resp = reqwest::get(format!("{}/api/tutorials?title2=o", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Tutorial> = resp.json().await.unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].title, "Go");
}

#[tokio::test]
async fn list_with_empty_title2_returns_all() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));
    store.save(Tutorial::new("Rust", "intro", true));

    let resp = reqwest::get(format!("{}/api/tutorials?title2=", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Tutorial> = resp.json().await.unwrap();
    assert_eq!(body, store.find_all());
    assert_eq!(body.len(), 2);
}

#[tokio::test]
async fn list_filter_without_matches_returns_204() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));

    let resp = reqwest::get(format!("{}/api/tutorials?title2=Haskell", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn published_lists_only_published() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Draft", "", false));
    store.save(Tutorial::new("Live", "", true));

    let resp = reqwest::get(format!("{}/api/tutorials/published", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Vec<Tutorial> = resp.json().await.unwrap();
    assert_eq!(body, vec![Tutorial::new("Live", "", true).with_id(2)]);
}

#[tokio::test]
async fn published_empty_returns_204() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Draft", "", false));

    let resp = reqwest::get(format!("{}/api/tutorials/published", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// ── Single tutorial ──────────────────────────────────────────────

#[tokio::test]
async fn get_by_id_returns_record() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));

    let resp = reqwest::get(format!("{}/api/tutorials/1", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": 1, "title": "Go", "description": "intro", "published": false })
    );
}

#[tokio::test]
async fn get_unknown_id_returns_404() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/tutorials/99", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_non_numeric_id_returns_400() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/tutorials/abc", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Create ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_id_and_forces_unpublished() {
    let (base, store) = spawn_test_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/tutorials", base))
        .json(&json!({ "id": 77, "title": "Go", "description": "intro", "published": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let created: Tutorial = resp.json().await.unwrap();
    assert_eq!(created, Tutorial::new("Go", "intro", false).with_id(1));
    assert_eq!(store.find_by_id(1), Some(created));
    assert_eq!(store.find_by_id(77), None);
}

#[tokio::test]
async fn create_sequential_ids() {
    let (base, _) = spawn_test_server().await;
    let client = Client::new();
    let go = create(&client, &base, "Go", "intro").await;
    let rust = create(&client, &base, "Rust", "intro").await;
    assert_eq!(go.id, 1);
    assert_eq!(rust.id, 2);
}

#[tokio::test]
async fn create_without_body_returns_500() {
    let (base, store) = spawn_test_server().await;
    let resp = Client::new()
        .post(format!("{}/api/tutorials", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(store.is_empty());
}

#[tokio::test]
async fn create_with_malformed_body_returns_400() {
    let (base, store) = spawn_test_server().await;
    let resp = Client::new()
        .post(format!("{}/api/tutorials", base))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn create_with_null_fields_uses_defaults() {
    let (base, store) = spawn_test_server().await;
    let resp = Client::new()
        .post(format!("{}/api/tutorials", base))
        .json(&json!({ "title": "Go", "description": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": 1, "title": "Go", "description": "", "published": false })
    );
    assert_eq!(store.find_by_id(1), Some(Tutorial::new("Go", "", false).with_id(1)));
}

#[tokio::test]
async fn create_with_non_json_content_type_returns_415() {
    let (base, store) = spawn_test_server().await;
    let resp = Client::new()
        .post(format!("{}/api/tutorials", base))
        .header("content-type", "text/plain")
        .body(r#"{"title":"Go","description":"intro"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(store.is_empty());
}

#[tokio::test]
async fn create_without_content_type_returns_415() {
    let (base, store) = spawn_test_server().await;
    let resp = Client::new()
        .post(format!("{}/api/tutorials", base))
        .body(r#"{"title":"Go"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(store.is_empty());
}

// ── Update ───────────────────────────────────────────────────────

#[tokio::test]
async fn update_merges_fields() {
    let (base, store) = spawn_test_server().await;
    let client = Client::new();
    create(&client, &base, "Go", "intro").await;
    create(&client, &base, "Rust", "intro").await;

    let resp = client
        .put(format!("{}/api/tutorials/1", base))
        .json(&json!({ "id": 2, "title": "Go 1.22", "description": "generics", "published": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Tutorial = resp.json().await.unwrap();
    let expected = Tutorial::new("Go 1.22", "generics", true).with_id(1);
    assert_eq!(updated, expected);
    assert_eq!(store.find_all()[0], expected);
    assert_eq!(store.find_by_id(2).unwrap().title, "Rust");
}

#[tokio::test]
async fn update_unknown_id_returns_404() {
    let (base, store) = spawn_test_server().await;
    let resp = Client::new()
        .put(format!("{}/api/tutorials/5", base))
        .json(&json!({ "title": "X" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(store.is_empty());
}

#[tokio::test]
async fn update_without_body_returns_500() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));
    let resp = Client::new()
        .put(format!("{}/api/tutorials/1", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.find_by_id(1).unwrap().title, "Go");
}

#[tokio::test]
async fn update_with_null_fields_clears_them() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", true));

    let resp = Client::new()
        .put(format!("{}/api/tutorials/1", base))
        .json(&json!({ "title": "Go", "description": null, "published": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.find_by_id(1), Some(Tutorial::new("Go", "", false).with_id(1)));
}

#[tokio::test]
async fn update_with_non_json_content_type_returns_415() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));

    let resp = Client::new()
        .put(format!("{}/api/tutorials/1", base))
        .header("content-type", "application/xml")
        .body("<tutorial/>")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(store.find_by_id(1).unwrap().title, "Go");
}

// ── Delete ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_by_id_returns_204() {
    let (base, store) = spawn_test_server().await;
    store.save(Tutorial::new("Go", "intro", false));
    let client = Client::new();

    let resp = client
        .delete(format!("{}/api/tutorials/1", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(store.find_by_id(1).is_none());

    let resp = reqwest::get(format!("{}/api/tutorials/1", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_id_returns_204() {
    let (base, _) = spawn_test_server().await;
    let resp = Client::new()
        .delete(format!("{}/api/tutorials/42", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_all_keeps_id_counter() {
    let (base, store) = spawn_test_server().await;
    let client = Client::new();
    create(&client, &base, "Go", "").await;
    create(&client, &base, "Rust", "").await;

    let resp = client
        .delete(format!("{}/api/tutorials", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(store.is_empty());

    let next = create(&client, &base, "Zig", "").await;
    assert_eq!(next.id, 3);
}

// ── Documentation & middleware ───────────────────────────────────

#[tokio::test]
async fn api_docs_served() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/v3/api-docs", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let doc: Value = resp.json().await.unwrap();
    assert_eq!(doc["info"]["title"], "Tutorial Management API");
    assert_eq!(doc["servers"][1]["url"], "https://tutorials.example");
    assert!(doc["paths"]["/api/tutorials/{id}"]["put"].is_object());
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let (base, _) = spawn_test_server().await;
    let resp = Client::new()
        .get(format!("{}/api/tutorials", base))
        .header("origin", "http://localhost:8080")
        .send()
        .await
        .unwrap();
    let allowed = resp
        .headers()
        .get("access-control-allow-origin")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(allowed, "http://localhost:8080");
}

#[tokio::test]
async fn cors_ignores_other_origins() {
    let (base, _) = spawn_test_server().await;
    let resp = Client::new()
        .get(format!("{}/api/tutorials", base))
        .header("origin", "http://evil.example")
        .send()
        .await
        .unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/v1/nonexistent", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[test]
fn invalid_cors_origin_fails_router_build() {
    let config = ApiConfig::default().with_cors_origins(["bad\norigin"]);
    let Err(err) = build_router(Arc::new(TutorialStore::new()), &config) else {
        panic!("router built with an invalid origin");
    };
    assert!(err.to_string().contains("invalid CORS origin"));
}
