mod operation;

use async_graphql_parser::types::OperationType;
use serde_json::{Map, Value};

use crate::{
    config::HandlerConfig,
    engine::{ContextValue, ExecutionArgs, ExecutionResult, ExtensionsInfo},
    request::ParsedParams,
    RequestError,
};

/// A finished execution, with the `extensions` entry if one was computed.
#[derive(Debug)]
pub(crate) struct ExecutedOperation {
    pub result: ExecutionResult,
    pub extensions: Option<Map<String, Value>>,
}

/// Only GET and POST carry operations. Checked before anything of the request is read.
pub(crate) fn check_method(method: &http::Method) -> Result<(), RequestError> {
    if method == http::Method::GET || method == http::Method::POST {
        return Ok(());
    }

    tracing::debug!(%method, "rejecting unsupported HTTP method");
    Err(RequestError::UnsupportedMethod)
}

/// Query presence, parse, GET mutation guard, validation, execution and extensions,
/// strictly in that order. The first failure ends the pipeline.
pub(crate) async fn run<S, C>(
    schema: &S,
    params: ParsedParams,
    config: &HandlerConfig<S, C>,
    request: &http::request::Parts,
    local_context: Option<&C>,
) -> Result<ExecutedOperation, RequestError>
where
    S: Send + Sync,
    C: Send + Sync,
{
    let is_get = request.method == http::Method::GET;

    let ParsedParams {
        query,
        variables,
        operation_name,
    } = params;

    let Some(query) = query.filter(|query| !query.is_empty()) else {
        return Err(RequestError::MissingQuery);
    };

    let document = config.parser.parse(&query).map_err(RequestError::Syntax)?;

    if is_get {
        let operation_type = operation::selected_operation_type(&document, operation_name.as_deref());
        if matches!(operation_type, Some(kind) if kind != OperationType::Query) {
            tracing::debug!(?operation_name, "refusing to run a non-query operation over GET");
            return Err(RequestError::MutationOverGet);
        }
    }

    if let Some(validator) = &config.validator {
        let errors = validator.validate(schema, &document, &config.validation_rules);
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "operation failed validation");
            return Err(RequestError::Validation(errors));
        }
    }

    let result = config
        .executor
        .execute(ExecutionArgs {
            schema,
            document: &document,
            variable_values: variables.as_ref(),
            operation_name: operation_name.as_deref(),
            root_value: config.root_value.as_ref(),
            context_value: ContextValue::resolve(local_context, config.context.as_deref(), request),
            field_resolver: config.field_resolver.as_deref(),
            type_resolver: config.type_resolver.as_deref(),
        })
        .await
        .map_err(|error| {
            tracing::error!("GraphQL execution failed: {error}");
            RequestError::Execution(error)
        })?;

    let extensions = match &config.extensions {
        Some(provider) => {
            let value = provider
                .extensions(ExtensionsInfo {
                    document: &document,
                    variables: variables.as_ref(),
                    operation_name: operation_name.as_deref(),
                    result: &result,
                    context: config.context.as_deref(),
                })
                .await
                .map_err(|error| {
                    tracing::error!("GraphQL extensions failed: {error}");
                    RequestError::Extensions(error)
                })?;

            match value {
                Value::Object(extensions) => Some(extensions),
                _ => None,
            }
        }
        None => None,
    };

    Ok(ExecutedOperation { result, extensions })
}
