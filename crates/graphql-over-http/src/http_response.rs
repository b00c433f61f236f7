use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};

use crate::{engine::ErrorFormatter, execution::ExecutedOperation, ErrorResponse};

/// The JSON envelope. Absent keys are omitted, never serialized as `null`.
#[derive(serde::Serialize)]
struct Envelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<&'a Map<String, Value>>,
}

pub(crate) struct ResponseFormatter<'a> {
    pub pretty: bool,
    pub base_headers: &'a HeaderMap,
    pub error_formatter: &'a dyn ErrorFormatter,
}

impl ResponseFormatter<'_> {
    /// 200 as soon as there is data, even alongside errors. No data at all, or `null`
    /// data, is a 500.
    pub fn executed(&self, operation: ExecutedOperation) -> http::Response<Bytes> {
        let ExecutedOperation { result, extensions } = operation;

        let status = if result.has_data() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let errors = (!result.errors.is_empty()).then(|| self.format_errors(&result.errors));
        let envelope = Envelope {
            errors,
            data: result.data.as_ref(),
            extensions: extensions.as_ref(),
        };

        self.json(status, self.base_headers.clone(), &envelope)
    }

    pub fn refused(&self, response: ErrorResponse) -> http::Response<Bytes> {
        let ErrorResponse {
            status,
            errors,
            headers: extra_headers,
        } = response;

        let mut headers = self.base_headers.clone();
        for (name, value) in &extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        let envelope = Envelope {
            errors: Some(self.format_errors(&errors)),
            data: None,
            extensions: None,
        };

        self.json(status, headers, &envelope)
    }

    fn format_errors(&self, errors: &[crate::GraphqlError]) -> Vec<Value> {
        errors
            .iter()
            .map(|error| self.error_formatter.format_error(error))
            .collect()
    }

    fn json(&self, status: StatusCode, headers: HeaderMap, envelope: &Envelope<'_>) -> http::Response<Bytes> {
        let serialized = if self.pretty {
            serde_json::to_vec_pretty(envelope)
        } else {
            serde_json::to_vec(envelope)
        };

        match serialized {
            Ok(body) => build(status, headers, body.into()),
            Err(err) => {
                tracing::error!("Failed to serialize response: {err}");
                build(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.base_headers.clone(),
                    Bytes::from_static(br#"{"errors":[{"message":"Internal server error"}]}"#),
                )
            }
        }
    }
}

pub(crate) fn build(status: StatusCode, headers: HeaderMap, body: Bytes) -> http::Response<Bytes> {
    let mut response = http::Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
