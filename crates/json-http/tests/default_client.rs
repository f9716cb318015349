//! Tests for the package-level functions backed by the default client

use json_http::{with_header, with_status, Context, HttpError, Payload};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
struct Echo {
    method: String,
    value: String,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// The default client lives for the whole test binary, so every request
// through it runs on one runtime to keep pooled connections usable.
#[tokio::test]
async fn test_package_functions() {
    init_tracing();

    package_get().await;
    package_post_put_patch().await;
    package_delete_error_status().await;
}

async fn package_get() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/get")
        .match_header("x-test", "package-function")
        .with_status(200)
        .with_body(r#"{"method": "GET", "value": "ok"}"#)
        .create_async()
        .await;

    let url = format!("{}/get", server.url());
    let mut echo = Echo::default();
    let mut status = 0;

    json_http::get(
        &Context::background(),
        &url,
        Some(&mut echo),
        [
            with_header("X-Test", "package-function"),
            with_status(&mut status),
        ],
    )
    .await
    .expect("package get should succeed");

    assert_eq!(status, 200);
    assert_eq!(echo.method, "GET");

    mock.assert_async().await;
}

async fn package_post_put_patch() {
    let mut server = mockito::Server::new_async().await;

    let mut mocks = Vec::new();
    for (method, content_type) in [
        ("POST", mockito::Matcher::Exact("application/json".to_string())),
        ("PUT", mockito::Matcher::Missing),
        ("PATCH", mockito::Matcher::Exact("application/json".to_string())),
    ] {
        mocks.push(
            server
                .mock(method, "/items")
                .match_header("content-type", content_type)
                .match_body(mockito::Matcher::Json(serde_json::json!({"update": "patch"})))
                .with_status(200)
                .with_body(format!(r#"{{"method": "{}", "value": "patch"}}"#, method))
                .create_async()
                .await,
        );
    }

    let ctx = Context::background();
    let url = format!("{}/items", server.url());
    let body = serde_json::json!({"update": "patch"});

    let mut echo = Echo::default();
    json_http::post(&ctx, &url, Payload::Json(&body), Some(&mut echo), [])
        .await
        .expect("package post should succeed");
    assert_eq!(echo.method, "POST");

    json_http::put(&ctx, &url, Payload::Json(&body), Some(&mut echo), [])
        .await
        .expect("package put should succeed");
    assert_eq!(echo.method, "PUT");

    json_http::patch(&ctx, &url, Payload::Json(&body), Some(&mut echo), [])
        .await
        .expect("package patch should succeed");
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.value, "patch");

    for mock in mocks {
        mock.assert_async().await;
    }
}

async fn package_delete_error_status() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("DELETE", "/items/1")
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let url = format!("{}/items/1", server.url());
    let mut echo = Echo::default();

    let result = json_http::delete(&Context::background(), &url, Some(&mut echo), []).await;

    match result {
        Err(HttpError::Status { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "403 Forbidden");
        }
        other => panic!("Expected HttpError::Status, got {:?}", other),
    }
    assert_eq!(echo, Echo::default());

    mock.assert_async().await;
}
