//! Mounts a [`GraphqlHandler`] on an axum router.

use axum::{body::Body, extract::Request, routing::any, Router};
use graphql_over_http::GraphqlHandler;
use http::StatusCode;
use http_body_util::LengthLimitError;

/// Runs an axum request through the handler. The body is only read for POST requests, and
/// at most `body_limit_bytes` of it: a larger body is answered with a 413.
pub async fn execute<S, C>(
    handler: &GraphqlHandler<S, C>,
    request: Request,
    body_limit_bytes: usize,
) -> http::Response<Body>
where
    S: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    let (parts, body) = request.into_parts();

    let body = async move {
        axum::body::to_bytes(body, body_limit_bytes)
            .await
            .map_err(|error| body_error(error, body_limit_bytes))
    };

    handler
        .handle(http::Request::from_parts(parts, body))
        .await
        .map(Body::from)
}

/// A router serving the handler on `path` for every HTTP method. Methods other than GET,
/// POST and OPTIONS get their 405 from the handler itself.
pub fn graphql_router<S, C>(path: &str, handler: GraphqlHandler<S, C>, body_limit_bytes: usize) -> Router
where
    S: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    Router::new().route(
        path,
        any(move |request: Request| {
            let handler = handler.clone();
            async move { execute(&handler, request, body_limit_bytes).await }
        }),
    )
}

fn body_error(error: axum::Error, body_limit_bytes: usize) -> (StatusCode, String) {
    if is_length_limit_error(&error) {
        tracing::debug!(limit = body_limit_bytes, "request body exceeded the limit");
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Request body exceeded the limit of {body_limit_bytes} bytes."),
        );
    }

    tracing::debug!("failed to read request body: {error}");
    (StatusCode::BAD_REQUEST, format!("Failed to read request body: {error}"))
}

fn is_length_limit_error(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);

    while let Some(error) = source {
        if error.is::<LengthLimitError>() {
            return true;
        }
        source = error.source();
    }

    false
}
