mod common;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use bytes::Bytes;
use common::{handler, options, TestResponse};
use http::{
    header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_TYPE},
    HeaderValue, Method, StatusCode,
};

#[tokio::test]
async fn preflight() {
    let polled = Arc::new(AtomicBool::new(false));
    let handler = handler(options().with_allow_origins(HeaderValue::from_static("https://example.com")));

    let body = {
        let polled = polled.clone();
        async move {
            polled.store(true, Ordering::SeqCst);
            Ok::<_, (StatusCode, String)>(Bytes::new())
        }
    };
    let request = http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/graphql")
        .body(body)
        .unwrap();

    let response = TestResponse::from(handler.inner.handle(request).await);

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.headers[ALLOW], "OPTIONS, GET, POST");
    assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_METHODS], "OPTIONS, GET, POST");
    assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://example.com");
    assert!(response.text.is_empty());
    assert!(!polled.load(Ordering::SeqCst));
}

#[tokio::test]
async fn options_without_cors_is_not_allowed() {
    let response = handler(options()).send(Method::OPTIONS, "/graphql", None, "").await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers[ALLOW], "OPTIONS, GET, POST");
    assert_eq!(response.headers.get(ACCESS_CONTROL_ALLOW_ORIGIN), None);
}

#[tokio::test]
async fn allow_origin_on_every_response() {
    let handler = handler(options().with_allow_origins(HeaderValue::from_static("*")));

    let response = handler.get(&[("query", "{test}")]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers[CONTENT_TYPE], "application/json");

    let response = handler.get(&[("query", "mutation { writeTest { test } }")]).await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers[ALLOW], "POST");

    let response = handler.get(&[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn no_allow_origin_by_default() {
    let response = handler(options()).get(&[("query", "{test}")]).await;

    assert_eq!(response.headers.get(ACCESS_CONTROL_ALLOW_ORIGIN), None);
}
