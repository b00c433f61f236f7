use serde_json::{Map, Value};

use super::ExecutableDocument;
use crate::{GraphqlError, GraphqlResult};

/// The outcome of a successful call to the executor.
///
/// `data` distinguishes absence (`None`, the key is omitted) from an explicit `null`
/// (`Some(Value::Null)`), which is what a failing non-null root field produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    pub data: Option<Value>,
    pub errors: Vec<GraphqlError>,
}

impl ExecutionResult {
    pub fn from_data(data: impl Into<Value>) -> Self {
        ExecutionResult {
            data: Some(data.into()),
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: impl IntoIterator<Item = GraphqlError>) -> Self {
        ExecutionResult {
            data: None,
            errors: errors.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: GraphqlError) -> Self {
        self.errors.push(error);
        self
    }

    /// Whether any data, even partial, was produced.
    pub fn has_data(&self) -> bool {
        matches!(&self.data, Some(data) if !data.is_null())
    }
}

/// The context value handed to the executor. Exactly one source is used, in order of
/// precedence: the context given to this particular call, the one configured on the
/// handler, or the incoming request itself.
#[derive(Debug)]
pub enum ContextValue<'a, C> {
    Call(&'a C),
    Handler(&'a C),
    Request(&'a http::request::Parts),
}

impl<'a, C> ContextValue<'a, C> {
    pub fn resolve(call: Option<&'a C>, handler: Option<&'a C>, request: &'a http::request::Parts) -> Self {
        match (call, handler) {
            (Some(context), _) => ContextValue::Call(context),
            (None, Some(context)) => ContextValue::Handler(context),
            (None, None) => ContextValue::Request(request),
        }
    }

    /// The user-provided context, if any.
    pub fn data(&self) -> Option<&'a C> {
        match *self {
            ContextValue::Call(context) | ContextValue::Handler(context) => Some(context),
            ContextValue::Request(_) => None,
        }
    }
}

impl<C> Clone for ContextValue<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ContextValue<'_, C> {}

pub struct ExecutionArgs<'a, S, C> {
    pub schema: &'a S,
    pub document: &'a ExecutableDocument,
    pub variable_values: Option<&'a Map<String, Value>>,
    pub operation_name: Option<&'a str>,
    pub root_value: Option<&'a Value>,
    pub context_value: ContextValue<'a, C>,
    pub field_resolver: Option<&'a dyn FieldResolver>,
    pub type_resolver: Option<&'a dyn TypeResolver>,
}

#[async_trait::async_trait]
pub trait Executor<S, C>: Send + Sync {
    /// Runs the document. Errors that happen while resolving fields belong in
    /// [`ExecutionResult::errors`]; returning `Err` means the execution itself could not
    /// happen and is answered with a 500.
    async fn execute(&self, args: ExecutionArgs<'_, S, C>) -> GraphqlResult<ExecutionResult>;
}

pub struct FieldResolveInfo<'a> {
    pub source: &'a Value,
    pub field_name: &'a str,
    pub arguments: &'a Map<String, Value>,
}

/// Fallback resolver for fields the schema does not resolve itself. Only forwarded to
/// the executor.
#[async_trait::async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve_field(&self, info: FieldResolveInfo<'_>) -> GraphqlResult<Value>;
}

/// Picks the concrete type name of a value of an abstract type. Only forwarded to the
/// executor.
pub trait TypeResolver: Send + Sync {
    fn resolve_type(&self, value: &Value, abstract_type: &str) -> Option<String>;
}

impl<F> TypeResolver for F
where
    F: Fn(&Value, &str) -> Option<String> + Send + Sync,
{
    fn resolve_type(&self, value: &Value, abstract_type: &str) -> Option<String> {
        self(value, abstract_type)
    }
}

pub struct ExtensionsInfo<'a, C> {
    pub document: &'a ExecutableDocument,
    pub variables: Option<&'a Map<String, Value>>,
    pub operation_name: Option<&'a str>,
    pub result: &'a ExecutionResult,
    /// The context configured on the handler, never the per-call one.
    pub context: Option<&'a C>,
}

/// Computes the `extensions` entry of the response after a successful execution. Only a
/// JSON object is kept, any other value is dropped.
#[async_trait::async_trait]
pub trait ExtensionsProvider<C>: Send + Sync {
    async fn extensions(&self, info: ExtensionsInfo<'_, C>) -> GraphqlResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_data_counts_as_data() {
        let result = ExecutionResult::from_data(serde_json::json!({"test": null}))
            .with_error(GraphqlError::new("Throws!"));
        assert!(result.has_data());
    }

    #[test]
    fn null_or_missing_data_does_not() {
        assert!(!ExecutionResult::from_data(Value::Null).has_data());
        assert!(!ExecutionResult::from_errors([GraphqlError::new("Boom")]).has_data());
    }

    #[test]
    fn context_precedence() {
        let (parts, _) = http::Request::new(()).into_parts();
        let call = "call".to_string();
        let handler = "handler".to_string();

        assert!(matches!(
            ContextValue::resolve(Some(&call), Some(&handler), &parts),
            ContextValue::Call(context) if context == "call"
        ));
        assert!(matches!(
            ContextValue::resolve(None, Some(&handler), &parts),
            ContextValue::Handler(context) if context == "handler"
        ));
        assert!(matches!(
            ContextValue::<'_, String>::resolve(None, None, &parts),
            ContextValue::Request(_)
        ));
    }
}
