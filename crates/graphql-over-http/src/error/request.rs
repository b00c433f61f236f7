use std::borrow::Cow;

use headers::{Allow, HeaderMapExt};
use http::{HeaderMap, Method, StatusCode};

use super::GraphqlError;

/// Every way a request can be refused before or during execution. Each variant carries
/// its own status code and, for 405s, the `Allow` header to send back.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The transport failed to deliver the body.
    #[error("{message}")]
    BodyRead { status: StatusCode, message: String },
    #[error("{0}")]
    InvalidBody(Cow<'static, str>),
    #[error("Query string is invalid.")]
    InvalidQueryString,
    #[error("Variables are invalid JSON.")]
    InvalidVariables,
    #[error("GraphQL only supports GET and POST requests.")]
    UnsupportedMethod,
    #[error("Must provide query string.")]
    MissingQuery,
    #[error("{0}")]
    Syntax(GraphqlError),
    #[error("Can only perform a mutation operation from a POST request.")]
    MutationOverGet,
    #[error("operation failed validation with {} error(s)", .0.len())]
    Validation(Vec<GraphqlError>),
    #[error("{0}")]
    Execution(GraphqlError),
    #[error("{0}")]
    Extensions(GraphqlError),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::BodyRead { status, .. } => *status,
            RequestError::InvalidBody(_)
            | RequestError::InvalidQueryString
            | RequestError::InvalidVariables
            | RequestError::MissingQuery
            | RequestError::Syntax(_)
            | RequestError::Validation(_) => StatusCode::BAD_REQUEST,
            RequestError::UnsupportedMethod | RequestError::MutationOverGet => StatusCode::METHOD_NOT_ALLOWED,
            RequestError::Execution(_) | RequestError::Extensions(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match self {
            RequestError::UnsupportedMethod => {
                headers.typed_insert([Method::OPTIONS, Method::GET, Method::POST].into_iter().collect::<Allow>());
            }
            RequestError::MutationOverGet => {
                headers.typed_insert(std::iter::once(Method::POST).collect::<Allow>());
            }
            _ => {}
        }
        headers
    }

    pub fn into_errors(self) -> Vec<GraphqlError> {
        match self {
            RequestError::Syntax(error) | RequestError::Execution(error) | RequestError::Extensions(error) => {
                vec![error]
            }
            RequestError::Validation(errors) => errors,
            other => vec![GraphqlError::new(other.to_string())],
        }
    }
}

/// A refused request, ready to be formatted.
#[derive(Clone, Debug)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub errors: Vec<GraphqlError>,
    pub headers: HeaderMap,
}

impl ErrorResponse {
    pub fn new(status: StatusCode) -> Self {
        ErrorResponse {
            status,
            errors: Vec::new(),
            headers: Default::default(),
        }
    }

    #[must_use]
    pub fn with_errors<I>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = GraphqlError>,
    {
        self.errors.extend(errors);
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl From<RequestError> for ErrorResponse {
    fn from(error: RequestError) -> Self {
        let status = error.status();
        let headers = error.headers();
        ErrorResponse::new(status)
            .with_errors(error.into_errors())
            .with_headers(headers)
    }
}
