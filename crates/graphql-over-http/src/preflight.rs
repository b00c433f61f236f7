use bytes::Bytes;
use headers::{AccessControlAllowMethods, Allow, HeaderMapExt};
use http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderMap, HeaderValue, Method, StatusCode};

use crate::http_response;

const ALLOWED_METHODS: [Method; 3] = [Method::OPTIONS, Method::GET, Method::POST];

/// Answers CORS preflight requests. `None` means the request is not one, either because
/// it isn't an `OPTIONS` request or because no origin is configured.
pub(crate) fn respond(method: &Method, allow_origins: Option<&HeaderValue>) -> Option<http::Response<Bytes>> {
    if method != Method::OPTIONS {
        return None;
    }

    let origin = allow_origins?;
    tracing::debug!("answering CORS preflight request");

    let mut headers = HeaderMap::new();
    headers.typed_insert(ALLOWED_METHODS.into_iter().collect::<Allow>());
    headers.typed_insert(ALLOWED_METHODS.into_iter().collect::<AccessControlAllowMethods>());
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());

    Some(http_response::build(StatusCode::NO_CONTENT, headers, Bytes::new()))
}
