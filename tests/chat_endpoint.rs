mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::FakeGenerator;
use gemini_chat::web::create_app;
use gemini_chat::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn post_chat(generator: Arc<FakeGenerator>, body: impl Into<Body>) -> (StatusCode, Value) {
    let app = create_app(AppState::new(generator));
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_hello_returns_reply() {
    let generator = Arc::new(FakeGenerator::replying("Hi there!"));
    let (status, body) = post_chat(generator.clone(), json!({ "message": "hello" }).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "Hi there!" }));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_prompt_is_trimmed_before_generation() {
    let generator = Arc::new(FakeGenerator::replying("ok"));
    post_chat(generator.clone(), json!({ "message": "  what is rust?\n" }).to_string()).await;

    assert_eq!(generator.prompts(), vec!["what is rust?".to_string()]);
}

#[tokio::test]
async fn test_blank_messages_never_reach_the_generator() {
    for message in ["", "   ", "\n\t  \r\n"] {
        let generator = Arc::new(FakeGenerator::replying("unused"));
        let (status, body) =
            post_chat(generator.clone(), json!({ "message": message }).to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "message {message:?}");
        assert_eq!(body, json!({ "error": "Please enter a valid query" }));
        assert_eq!(generator.calls(), 0);
    }
}

#[tokio::test]
async fn test_malformed_bodies_are_invalid_input() {
    let bodies = [
        "{}".to_string(),
        json!({ "message": 42 }).to_string(),
        json!({ "message": null }).to_string(),
        "not json".to_string(),
    ];

    for raw in bodies {
        let generator = Arc::new(FakeGenerator::replying("unused"));
        let (status, body) = post_chat(generator.clone(), raw.clone()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw}");
        assert_eq!(body, json!({ "error": "Please enter a valid query" }));
        assert_eq!(generator.calls(), 0);
    }
}

#[tokio::test]
async fn test_generation_failure_is_generic_500() {
    let generator = Arc::new(FakeGenerator::failing("upstream exploded: secret-key-123"));
    let (status, body) = post_chat(generator.clone(), json!({ "message": "hello" }).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Something went wrong. Please try again." }));
    assert!(!body.to_string().contains("secret-key-123"));
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_responses_carry_exactly_one_field() {
    let cases = [
        (Arc::new(FakeGenerator::replying("")), "response"),
        (Arc::new(FakeGenerator::replying("text")), "response"),
        (Arc::new(FakeGenerator::failing("boom")), "error"),
    ];

    for (generator, field) in cases {
        let (_, body) = post_chat(generator, json!({ "message": "hi" }).to_string()).await;
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key(field));
    }
}

#[tokio::test]
async fn test_health_reports_model() {
    let app = create_app(AppState::new(Arc::new(FakeGenerator::replying("unused"))));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "fake-model");
}

#[tokio::test]
async fn test_get_on_chat_is_not_allowed() {
    let app = create_app(AppState::new(Arc::new(FakeGenerator::replying("unused"))));
    let request = Request::builder().uri("/api/chat").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
