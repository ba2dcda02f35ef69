//! Integration tests for request construction, options, and transport
//! failure mapping.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqkit::{HttpError, RedirectDecision, RedirectPolicy, RequestOptions};
use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize)]
struct NewPost {
    #[serde(rename = "userId")]
    user_id: u32,
    title: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: u32,
}

#[tokio::test]
async fn test_malformed_url_fails_before_io() {
    let result = reqkit::get::<Created>("://not-a-url", RequestOptions::new()).await;

    assert!(matches!(result.error(), Some(HttpError::InvalidUrl(_))));
    assert_eq!(result.status(), 0);
    assert!(result.headers().is_none());
    assert!(result.raw_body().is_empty());
    assert!(result.value().is_none());
}

#[tokio::test]
async fn test_post_json_sets_content_type_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "userId": 1,
            "title": "y",
            "body": "x"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 101})))
        .mount(&server)
        .await;

    let result = reqkit::post_json::<Created, _>(
        &format!("{}/posts", server.uri()),
        &NewPost {
            user_id: 1,
            title: "y".into(),
            body: "x".into(),
        },
        RequestOptions::new(),
    )
    .await;

    assert!(result.error().is_none());
    assert_eq!(result.status(), 201);
    assert_eq!(result.value().unwrap().id, 101);
}

#[tokio::test]
async fn test_post_json_content_type_wins_over_header_override() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
        .mount(&server)
        .await;

    // The header override runs before the interceptor chain; the POST
    // variant's Content-Type interceptor runs last and wins.
    let result = reqkit::post_json::<Created, _>(
        &format!("{}/posts", server.uri()),
        &serde_json::json!({"title": "t"}),
        RequestOptions::new().header("content-type", "text/plain"),
    )
    .await;

    assert!(result.error().is_none());
}

#[tokio::test]
async fn test_post_form_encodes_pairs_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=john&scope=read+write"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 7})))
        .mount(&server)
        .await;

    let result = reqkit::post_form::<Created>(
        &format!("{}/login", server.uri()),
        &[("user", "john"), ("scope", "read write")],
        RequestOptions::new(),
    )
    .await;

    assert!(result.error().is_none());
    assert_eq!(result.value().unwrap().id, 7);
}

#[tokio::test]
async fn test_post_with_explicit_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(header("content-type", "text/plain"))
        .and(body_string("remember the milk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 3})))
        .mount(&server)
        .await;

    let result = reqkit::post::<Created, _>(
        &format!("{}/notes", server.uri()),
        "text/plain",
        "remember the milk",
        RequestOptions::new(),
    )
    .await;

    assert!(result.error().is_none());
    assert_eq!(result.value().unwrap().id, 3);
}

#[tokio::test]
async fn test_delete_uses_delete_method() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
        .mount(&server)
        .await;

    let result =
        reqkit::delete::<Created>(&format!("{}/posts/1", server.uri()), RequestOptions::new())
            .await;

    assert!(result.error().is_none());
    assert_eq!(result.value().unwrap().id, 1);
}

#[tokio::test]
async fn test_header_override_reaches_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 9})))
        .mount(&server)
        .await;

    let result = reqkit::get::<Created>(
        &format!("{}/secure", server.uri()),
        RequestOptions::new().header("x-api-key", "secret"),
    )
    .await;

    assert!(result.error().is_none());
    assert_eq!(result.value().unwrap().id, 9);
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let result = reqkit::get::<serde_json::Value>(
        &format!("{}/slow", server.uri()),
        RequestOptions::new().timeout(Duration::from_millis(50)),
    )
    .await;

    assert!(matches!(result.error(), Some(HttpError::Timeout)));
    assert_eq!(result.status(), 0);
}

#[tokio::test]
async fn test_connection_refused_maps_to_connection_error() {
    let result =
        reqkit::get::<serde_json::Value>("http://127.0.0.1:9/nothing", RequestOptions::new())
            .await;

    assert!(matches!(result.error(), Some(HttpError::Connection(_))));
    assert_eq!(result.status(), 0);
}

async fn serve_redirect(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 5})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_default_policy_follows_redirects() {
    let server = MockServer::start().await;
    serve_redirect(&server).await;

    let result =
        reqkit::get::<Created>(&format!("{}/old", server.uri()), RequestOptions::new()).await;

    assert!(result.error().is_none());
    assert_eq!(result.status(), 200);
    assert_eq!(result.value().unwrap().id, 5);
}

#[tokio::test]
async fn test_no_redirects_surfaces_the_redirect_status() {
    let server = MockServer::start().await;
    serve_redirect(&server).await;

    let result = reqkit::get::<Created>(
        &format!("{}/old", server.uri()),
        RequestOptions::new().no_redirects(),
    )
    .await;

    // The 302 itself becomes the response and fails classification.
    assert_eq!(result.status(), 302);
    assert!(matches!(
        result.error(),
        Some(HttpError::Status { status: 302, .. })
    ));
}

#[tokio::test]
async fn test_custom_policy_sees_proposed_url_and_history() {
    let server = MockServer::start().await;
    serve_redirect(&server).await;

    let seen: Arc<Mutex<Vec<(String, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let record = seen.clone();
    let policy = RedirectPolicy::custom(move |url, via| {
        record.lock().unwrap().push((url.path().to_string(), via.len()));
        RedirectDecision::Follow
    });

    let result = reqkit::get::<Created>(
        &format!("{}/old", server.uri()),
        RequestOptions::new().redirect_policy(policy),
    )
    .await;

    assert!(result.error().is_none());
    assert_eq!(result.value().unwrap().id, 5);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), [("/new".to_string(), 1)]);
}

#[tokio::test]
async fn test_custom_policy_error_maps_to_redirect_error() {
    let server = MockServer::start().await;
    serve_redirect(&server).await;

    let result = reqkit::get::<Created>(
        &format!("{}/old", server.uri()),
        RequestOptions::new().redirect_policy(RedirectPolicy::custom(|_, _| {
            RedirectDecision::Error("redirects forbidden".into())
        })),
    )
    .await;

    assert!(matches!(result.error(), Some(HttpError::Redirect(_))));
    assert_eq!(result.status(), 0);
}

#[tokio::test]
async fn test_custom_policy_stop_keeps_redirect_response() {
    let server = MockServer::start().await;
    serve_redirect(&server).await;

    let result = reqkit::get::<Created>(
        &format!("{}/old", server.uri()),
        RequestOptions::new()
            .redirect_policy(RedirectPolicy::custom(|_, _| RedirectDecision::Stop)),
    )
    .await;

    assert_eq!(result.status(), 302);
    assert!(matches!(
        result.error(),
        Some(HttpError::Status { status: 302, .. })
    ));
}
