#![allow(dead_code)]

use bytes::Bytes;
use graphql_mocks::{TestExecutor, TestSchema};
use graphql_over_http::{GraphqlHandler, HandlerOptions};
use http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode};
use serde_json::Value;

pub fn options() -> HandlerOptions<TestSchema> {
    HandlerOptions::new(TestExecutor)
}

pub fn handler(options: HandlerOptions<TestSchema>) -> TestHandler {
    TestHandler::new(options)
}

/// `/graphql` with the given URL-encoded parameters.
pub fn url(params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return String::from("/graphql");
    }
    format!("/graphql?{}", serde_urlencoded::to_string(params).unwrap())
}

pub struct TestHandler<C = ()> {
    pub inner: GraphqlHandler<TestSchema, C>,
}

impl<C> TestHandler<C>
where
    C: Send + Sync + 'static,
{
    pub fn new(options: HandlerOptions<TestSchema, C>) -> Self {
        TestHandler {
            inner: GraphqlHandler::new(TestSchema, options),
        }
    }

    pub async fn get(&self, params: &[(&str, &str)]) -> TestResponse {
        self.send(Method::GET, &url(params), None, "").await
    }

    pub async fn post(&self, body: Value) -> TestResponse {
        self.send(Method::POST, "/graphql", Some("application/json"), &body.to_string())
            .await
    }

    pub async fn post_raw(&self, content_type: &str, body: &str) -> TestResponse {
        self.send(Method::POST, "/graphql", Some(content_type), body).await
    }

    pub async fn send(&self, method: Method, uri: &str, content_type: Option<&str>, body: &str) -> TestResponse {
        let response = self.inner.handle_bytes(request(method, uri, content_type, body)).await;
        TestResponse::from(response)
    }
}

pub fn request(method: Method, uri: &str, content_type: Option<&str>, body: &str) -> http::Request<Bytes> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder.body(Bytes::from(body.to_owned())).unwrap()
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    pub body: Value,
}

impl From<http::Response<Bytes>> for TestResponse {
    fn from(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };

        TestResponse {
            status: parts.status,
            headers: parts.headers,
            text,
            body,
        }
    }
}
