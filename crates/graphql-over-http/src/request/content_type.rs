use http::header::CONTENT_TYPE;
use mediatype::MediaType;

/// The body encodings a POST request may use. Anything else contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyContentType {
    Json,
    FormUrlEncoded,
    Graphql,
}

impl BodyContentType {
    /// Only the essence of the media type matters, parameters such as `charset` are ignored.
    pub(crate) fn extract_from(headers: &http::HeaderMap) -> Option<Self> {
        let header = headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let media_type = MediaType::parse(header).ok()?;

        if !media_type.ty.as_str().eq_ignore_ascii_case("application") || media_type.suffix.is_some() {
            return None;
        }

        let subtype = media_type.subty.as_str();
        if subtype.eq_ignore_ascii_case("json") {
            Some(BodyContentType::Json)
        } else if subtype.eq_ignore_ascii_case("x-www-form-urlencoded") {
            Some(BodyContentType::FormUrlEncoded)
        } else if subtype.eq_ignore_ascii_case("graphql") {
            Some(BodyContentType::Graphql)
        } else {
            None
        }
    }
}
