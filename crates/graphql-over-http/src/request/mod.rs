mod content_type;

use std::future::Future;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::RequestError;
use content_type::BodyContentType;

/// The GraphQL parameters of a single request, once URL and body have been merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedParams {
    pub query: Option<String>,
    pub variables: Option<Map<String, Value>>,
    pub operation_name: Option<String>,
}

#[derive(Default)]
struct QueryParams {
    query: Option<String>,
    variables: Option<String>,
    operation_name: Option<String>,
}

impl QueryParams {
    /// A repeated key keeps its first value. Unknown keys are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = QueryParams::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "query" => &mut params.query,
                "variables" => &mut params.variables,
                "operationName" => &mut params.operation_name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        params
    }
}

/// What the body contributed. `variables` is kept raw as it may still be JSON text.
#[derive(Default)]
struct BodyParams {
    query: Option<String>,
    variables: Option<Value>,
    operation_name: Option<String>,
}

impl From<QueryParams> for BodyParams {
    fn from(params: QueryParams) -> Self {
        BodyParams {
            query: params.query,
            variables: params.variables.map(Value::String),
            operation_name: params.operation_name,
        }
    }
}

/// Extracts the GraphQL parameters from the query string and, for POST requests only, from
/// the body. URL values win over body values, field by field.
///
/// Finding nothing at all is not an error: the absence of a query is reported later.
pub(crate) async fn resolve<F>(parts: &http::request::Parts, body: F) -> Result<ParsedParams, RequestError>
where
    F: Future<Output = Result<Bytes, (http::StatusCode, String)>> + Send,
{
    let url = serde_urlencoded::from_str::<Vec<(String, String)>>(parts.uri.query().unwrap_or_default())
        .map(QueryParams::from_pairs)
        .map_err(|err| {
            tracing::debug!("could not decode the query string: {err}");
            RequestError::InvalidQueryString
        })?;

    let body = if parts.method == http::Method::POST {
        let bytes = body
            .await
            .map_err(|(status, message)| RequestError::BodyRead { status, message })?;

        parse_body(BodyContentType::extract_from(&parts.headers), &bytes)?
    } else {
        BodyParams::default()
    };

    let variables = match url.variables {
        Some(text) => decode_variables(&text)?,
        None => match body.variables {
            Some(Value::String(text)) => decode_variables(&text)?,
            Some(Value::Object(variables)) => Some(variables),
            Some(_) | None => None,
        },
    };

    Ok(ParsedParams {
        query: url.query.or(body.query),
        variables,
        operation_name: url.operation_name.or(body.operation_name),
    })
}

fn parse_body(content_type: Option<BodyContentType>, bytes: &[u8]) -> Result<BodyParams, RequestError> {
    match content_type {
        Some(BodyContentType::Json) => {
            let value = serde_json::from_slice::<Value>(bytes)
                .map_err(|_| RequestError::InvalidBody("POST body sent invalid JSON.".into()))?;

            let Value::Object(mut object) = value else {
                return Ok(BodyParams::default());
            };

            Ok(BodyParams {
                query: take_string(&mut object, "query"),
                variables: object.remove("variables"),
                operation_name: take_string(&mut object, "operationName"),
            })
        }
        Some(BodyContentType::FormUrlEncoded) => serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes)
            .map(|pairs| BodyParams::from(QueryParams::from_pairs(pairs)))
            .map_err(|err| {
                tracing::debug!("could not decode the form body: {err}");
                RequestError::InvalidBody("POST body sent invalid form data.".into())
            }),
        Some(BodyContentType::Graphql) => {
            let query = std::str::from_utf8(bytes)
                .map_err(|_| RequestError::InvalidBody("POST body is not valid UTF-8.".into()))?;

            Ok(BodyParams {
                query: Some(query.to_owned()),
                ..Default::default()
            })
        }
        None => Ok(BodyParams::default()),
    }
}

/// Non-string values are ignored, as if the field was not sent.
fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key)? {
        Value::String(value) => Some(value),
        _ => None,
    }
}

/// Variables sent as JSON text must decode to an object or `null`.
fn decode_variables(text: &str) -> Result<Option<Map<String, Value>>, RequestError> {
    match serde_json::from_str::<Value>(text).map_err(|_| RequestError::InvalidVariables)? {
        Value::Null => Ok(None),
        Value::Object(variables) => Ok(Some(variables)),
        _ => Err(RequestError::InvalidVariables),
    }
}
