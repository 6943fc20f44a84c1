//! Delivery tests: full and ranged reads of stored videos.

#![cfg(unix)]

mod common;

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_bytes, patterned_bytes, TestHarness};
use tower::ServiceExt;

fn get(path: String, range: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(range) = range {
        builder = builder.header(header::RANGE, range);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_full_file() {
    let h = TestHarness::new();
    let id = h.put_video(4096);

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(headers[header::CONTENT_LENGTH], "4096");
    assert_eq!(headers[header::ACCEPT_RANGES], "bytes");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "no-cache, no-store, must-revalidate"
    );
    assert!(headers.get(header::CONTENT_RANGE).is_none());

    assert_eq!(body_bytes(response.into_body()).await, patterned_bytes(4096));
}

#[tokio::test]
async fn test_range_request() {
    let h = TestHarness::new();
    let id = h.put_video(4096);

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}"), Some("bytes=1000-1999")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers()[header::CONTENT_RANGE],
        "bytes 1000-1999/4096"
    );
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "1000");

    let body = body_bytes(response.into_body()).await;
    assert_eq!(body, patterned_bytes(4096)[1000..2000].to_vec());
}

#[tokio::test]
async fn test_open_ended_range() {
    let h = TestHarness::new();
    let id = h.put_video(1000);

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}"), Some("bytes=900-")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 900-999/1000");
    assert_eq!(body_bytes(response.into_body()).await.len(), 100);
}

#[tokio::test]
async fn test_unsatisfiable_range_serves_full_file() {
    let h = TestHarness::new();
    let id = h.put_video(1000);

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}"), Some("bytes=5000-6000")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await.len(), 1000);
}

#[tokio::test]
async fn test_empty_file_never_ranges() {
    let h = TestHarness::new();
    let id = h.put_video(0);

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}"), Some("bytes=0-")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "0");
}

#[tokio::test]
async fn test_missing_video_is_not_found() {
    let h = TestHarness::new();

    let response = h
        .router()
        .oneshot(get("/videos/video_missing".to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(h.ctx.store.is_empty());
}

#[tokio::test]
async fn test_extension_form_is_accepted() {
    let h = TestHarness::new();
    let id = h.put_video(10);

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}.mp4"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_serve_extends_deadline() {
    let h = TestHarness::new();
    let id = h.put_video(10);
    let short = h.ctx.store.schedule(&id, Duration::from_secs(5));

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}"), Some("bytes=0-1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);

    let extended = h.ctx.store.deadline(&id).unwrap();
    assert!(extended > short + Duration::from_secs(200));
}

#[tokio::test]
async fn test_serving_untracked_video_does_not_register_it() {
    let h = TestHarness::new();
    let id = h.put_video(10);

    let response = h
        .router()
        .oneshot(get(format!("/videos/{id}"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!h.ctx.store.contains(&id));
}

#[tokio::test]
async fn test_missing_video_has_json_error() {
    let h = TestHarness::new();

    let response = h
        .router()
        .oneshot(get("/videos/video_missing".to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(json["code"], "not_found");
}

#[tokio::test]
async fn test_repeated_serves_keep_single_timer() {
    let h = TestHarness::new();
    let id = h.put_video(10);
    h.ctx.store.schedule(&id, h.ctx.store.default_ttl());
    let app = h.router();

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(get(format!("/videos/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(h.ctx.store.len(), 1);
}
