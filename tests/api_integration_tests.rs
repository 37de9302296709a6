//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use linkkeeper::{api::create_router, links::Link, AppState, Config, LinkStore};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_app_with_store(Arc::new(LinkStore::in_memory()))
}

fn create_app_with_store(store: Arc<LinkStore>) -> Router {
    create_router(AppState::from_config(store, &Config::default()))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_request(owner: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/links")
        .header("content-type", "application/json");
    if let Some(owner) = owner {
        builder = builder.header("x-owner-id", owner);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_link(app: &Router, owner: &str, body: &str) -> Value {
    let response = app
        .clone()
        .oneshot(create_request(Some(owner), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_to_json(response.into_body()).await
}

// == Create Endpoint Tests ==

#[tokio::test]
async fn test_create_endpoint_success() {
    let app = create_test_app();

    let json = create_link(&app, "alice", r#"{"url":"https://example.com","maxClicks":3}"#).await;

    assert_eq!(json["code"].as_str().unwrap().len(), 6);
    assert_eq!(json["originalUrl"], "https://example.com");
    assert_eq!(json["ownerId"], "alice");
    assert_eq!(json["maxClicks"], 3);
    assert_eq!(json["clicksRemaining"], 3);
    assert_eq!(json["clickCount"], 0);
}

#[tokio::test]
async fn test_create_endpoint_invalid_url() {
    let app = create_test_app();

    let response = app
        .oneshot(create_request(Some("alice"), r#"{"url":"ftp://example.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_create_endpoint_negative_limit() {
    let app = create_test_app();

    let response = app
        .oneshot(create_request(
            Some("alice"),
            r#"{"url":"https://example.com","maxClicks":-1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_endpoint_missing_owner() {
    let app = create_test_app();

    let response = app
        .oneshot(create_request(None, r#"{"url":"https://example.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_endpoint_invalid_json() {
    let app = create_test_app();

    let response = app
        .oneshot(create_request(Some("alice"), r#"{"url": invalid}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == Info Endpoint Tests ==

#[tokio::test]
async fn test_info_does_not_count_clicks() {
    let app = create_test_app();
    let created = create_link(&app, "alice", r#"{"url":"https://example.com"}"#).await;
    let uri = format!("/links/{}", created["code"].as_str().unwrap());

    for _ in 0..2 {
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["clickCount"], 0);
    }
}

#[tokio::test]
async fn test_info_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/links/nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Open Endpoint Tests ==

#[tokio::test]
async fn test_open_redirects_until_budget_spent() {
    let app = create_test_app();
    let created = create_link(&app, "alice", r#"{"url":"https://example.com/a","maxClicks":2}"#).await;
    let uri = format!("/r/{}", created["code"].as_str().unwrap());

    for _ in 0..2 {
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION].to_str().unwrap(),
            "https://example.com/a"
        );
    }

    // The last click removed the link
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_expired_link_is_gone() {
    let store = Arc::new(LinkStore::in_memory());
    let mut link = Link::new("old", "https://example.com", "alice", 1, 0);
    link.created_at -= 5_000;
    store.put(link).await;
    let app = create_app_with_store(store.clone());

    let response = app.clone().oneshot(get("/r/old")).await.unwrap();
    assert_eq!(response.status(), StatusCode::GONE);

    assert!(store.get("old").await.is_none());
    let response = app.oneshot(get("/r/old")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_open_depleted_link_is_gone() {
    let store = Arc::new(LinkStore::in_memory());
    let mut link = Link::new("spent", "https://example.com", "alice", 0, 1);
    link.click_count = 1;
    store.put(link).await;
    let app = create_app_with_store(store.clone());

    let response = app.oneshot(get("/r/spent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::GONE);
    assert_eq!(store.stats().await.depleted_evictions, 1);
}

// == Delete Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_owner_only() {
    let app = create_test_app();
    let created = create_link(&app, "alice", r#"{"url":"https://example.com"}"#).await;
    let uri = format!("/links/{}", created["code"].as_str().unwrap());

    let delete_as = |owner: &str| {
        Request::builder()
            .method("DELETE")
            .uri(&uri)
            .header("x-owner-id", owner)
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete_as("mallory")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.clone().oneshot(delete_as("alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("deleted"));

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(delete_as("alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Edit Endpoint Tests ==

fn patch(uri: &str, owner: &str, value: i64) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-owner-id", owner)
        .body(Body::from(format!(r#"{{"value":{}}}"#, value)))
        .unwrap()
}

#[tokio::test]
async fn test_edit_limit_endpoint() {
    let app = create_test_app();
    let created = create_link(&app, "alice", r#"{"url":"https://example.com","maxClicks":1}"#).await;
    let code = created["code"].as_str().unwrap();
    let uri = format!("/links/{}/limit", code);

    let response = app.clone().oneshot(patch(&uri, "alice", 10)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["maxClicks"], 10);

    let response = app.clone().oneshot(patch(&uri, "alice", -5)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(patch(&uri, "bob", 20)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_edit_ttl_endpoint() {
    let app = create_test_app();
    let created = create_link(&app, "alice", r#"{"url":"https://example.com"}"#).await;
    let uri = format!("/links/{}/ttl", created["code"].as_str().unwrap());

    let response = app.clone().oneshot(patch(&uri, "alice", 120)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ttlSeconds"], 120);
    assert!(json["ttlRemainingSeconds"].as_u64().unwrap() <= 120);

    let response = app.oneshot(patch("/links/missing/ttl", "alice", 120)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Owner Endpoint Tests ==

#[tokio::test]
async fn test_register_owner_generates_id() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/owners")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_owner_links_by_prefix() {
    let app = create_test_app();
    create_link(&app, "alice-1234", r#"{"url":"https://example.com/1"}"#).await;
    create_link(&app, "alice-1234", r#"{"url":"https://example.com/2"}"#).await;
    create_link(&app, "bob", r#"{"url":"https://example.com/3"}"#).await;

    let response = app.clone().oneshot(get("/owners/alice/links")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["owner"], "alice-1234");
    assert_eq!(json["links"].as_array().unwrap().len(), 2);

    let response = app.oneshot(get("/owners/nobody/links")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Stats / Health Endpoint Tests ==

#[tokio::test]
async fn test_stats_reflect_activity() {
    let app = create_test_app();
    let created = create_link(&app, "alice", r#"{"url":"https://example.com","maxClicks":1}"#).await;
    let uri = format!("/r/{}", created["code"].as_str().unwrap());
    app.clone().oneshot(get(&uri)).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["links_created"], 1);
    assert_eq!(json["clicks"], 1);
    assert_eq!(json["depleted_evictions"], 1);
    assert_eq!(json["total_links"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Persistence Tests ==

#[tokio::test]
async fn test_links_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");

    let app = create_app_with_store(Arc::new(LinkStore::open(&path).await));
    let created = create_link(&app, "alice", r#"{"url":"https://example.com","maxClicks":5}"#).await;
    let code = created["code"].as_str().unwrap().to_string();
    app.oneshot(get(&format!("/r/{}", code))).await.unwrap();

    let reopened = LinkStore::open(&path).await;
    let link = reopened.get(&code).await.unwrap();
    assert_eq!(link.click_count, 1);
    assert_eq!(reopened.get_user("alice").await.unwrap().codes, vec![code]);
}
