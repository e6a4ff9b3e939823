//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint, including the
//! snapshot round trip through a real file-backed store.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use snapcache::api::create_router;
use snapcache::storage::FileSnapshotStore;
use snapcache::{AppState, TtlCache};

// == Helper Functions ==

fn create_test_app() -> Router {
    let state = AppState::new(TtlCache::new(100, 300_000));
    create_router(state)
}

fn create_snapshot_app(dir: &std::path::Path) -> Router {
    let storage = Arc::new(FileSnapshotStore::new(dir));
    let state = AppState::new(TtlCache::new(100, 300_000).with_storage(storage));
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_set(key: &str, value: Value, ttl_ms: Option<u64>) -> Request<Body> {
    let mut body = json!({"key": key, "value": value});
    if let Some(ttl_ms) = ttl_ms {
        body["ttl_ms"] = json!(ttl_ms);
    }
    Request::builder()
        .method("PUT")
        .uri("/set")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get_round_trip() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(put_set("order_42", json!({"total": 19.9, "items": 3}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/get/order_42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["key"], "order_42");
    assert_eq!(body["value"], json!({"total": 19.9, "items": 3}));
}

#[tokio::test]
async fn test_set_rejects_empty_key() {
    let app = create_test_app();

    let response = app.oneshot(put_set("", json!(1), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_to_json(response.into_body()).await;
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_get_missing_key_is_404() {
    let app = create_test_app();

    let response = app.oneshot(get("/get/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_to_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_get_expired_key_is_404() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("blink", json!("v"), Some(50)))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(90)).await;

    let response = app.oneshot(get("/get/blink")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == HAS / DEL ==

#[tokio::test]
async fn test_has_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("present", json!(1), None))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/has/present")).await.unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["present"], json!(true));

    let response = app.oneshot(get("/has/absent")).await.unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["present"], json!(false));
}

#[tokio::test]
async fn test_delete_endpoint_reports_outcome() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("doomed", json!(1), None))
        .await
        .unwrap();

    let del = |app: Router| async move {
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/del/doomed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        body_to_json(response.into_body()).await
    };

    let body = del(app.clone()).await;
    assert_eq!(body["deleted"], json!(true));

    let body = del(app).await;
    assert_eq!(body["deleted"], json!(false));
}

// == INVALIDATE ==

#[tokio::test]
async fn test_invalidate_by_pattern() {
    let app = create_test_app();

    for key in ["user_1", "user_2", "order_1"] {
        app.clone()
            .oneshot(put_set(key, json!(1), None))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(post_json("/invalidate", json!({"pattern": "^user_"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["removed"], json!(2));

    let response = app.clone().oneshot(get("/get/order_1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.oneshot(get("/get/user_1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalidate_all() {
    let app = create_test_app();

    for key in ["a", "b"] {
        app.clone()
            .oneshot(put_set(key, json!(1), None))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(post_json("/invalidate", json!({})))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["removed"], json!(2));

    let response = app.oneshot(get("/stats")).await.unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["size"], json!(0));
}

#[tokio::test]
async fn test_invalidate_bad_pattern_is_400() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/invalidate", json!({"pattern": "(unclosed"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_to_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("pattern"));
}

// == STATS ==

#[tokio::test]
async fn test_stats_reports_hits_and_order() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_set("hot", json!(1), None))
        .await
        .unwrap();
    app.clone()
        .oneshot(put_set("cold", json!(2), None))
        .await
        .unwrap();
    for _ in 0..2 {
        app.clone().oneshot(get("/get/hot")).await.unwrap();
    }

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["size"], json!(2));
    assert_eq!(body["max_size"], json!(100));
    // 2 hits over 2 entries: 2 / (2 + 2)
    assert!((body["hit_rate"].as_f64().unwrap() - 0.5).abs() < 1e-9);
    assert_eq!(body["items"][0]["key"], "hot");
    assert_eq!(body["items"][0]["hit_count"], json!(2));
}

// == SNAPSHOT ==

#[tokio::test]
async fn test_snapshot_round_trip_across_instances() {
    let dir = tempfile::tempdir().unwrap();

    let app = create_snapshot_app(dir.path());
    app.clone()
        .oneshot(put_set("persisted", json!({"qty": 7}), Some(60_000)))
        .await
        .unwrap();
    let response = app
        .oneshot(post_json("/snapshot/persist", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A fresh instance over the same directory starts cold, then loads
    let app = create_snapshot_app(dir.path());
    let response = app.clone().oneshot(get("/get/persisted")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.clone()
        .oneshot(post_json("/snapshot/load", json!(null)))
        .await
        .unwrap();

    let response = app.oneshot(get("/get/persisted")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["value"], json!({"qty": 7}));
}

#[tokio::test]
async fn test_snapshot_persist_selected_keys() {
    let dir = tempfile::tempdir().unwrap();

    let app = create_snapshot_app(dir.path());
    for key in ["keep", "skip"] {
        app.clone()
            .oneshot(put_set(key, json!(1), None))
            .await
            .unwrap();
    }
    app.clone()
        .oneshot(post_json("/snapshot/persist", json!({"keys": ["keep"]})))
        .await
        .unwrap();

    let app = create_snapshot_app(dir.path());
    app.clone()
        .oneshot(post_json("/snapshot/load", json!(null)))
        .await
        .unwrap();

    assert_eq!(
        app.clone().oneshot(get("/get/keep")).await.unwrap().status(),
        StatusCode::OK
    );
    assert_eq!(
        app.oneshot(get("/get/skip")).await.unwrap().status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_snapshot_clear() {
    let dir = tempfile::tempdir().unwrap();

    let app = create_snapshot_app(dir.path());
    app.clone()
        .oneshot(put_set("a", json!(1), None))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/snapshot/persist", json!({})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/snapshot")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // In-memory entry survives the snapshot clear
    assert_eq!(
        app.oneshot(get("/get/a")).await.unwrap().status(),
        StatusCode::OK
    );

    let app = create_snapshot_app(dir.path());
    app.clone()
        .oneshot(post_json("/snapshot/load", json!(null)))
        .await
        .unwrap();
    assert_eq!(
        app.oneshot(get("/get/a")).await.unwrap().status(),
        StatusCode::NOT_FOUND
    );
}

// == HEALTH ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
}
