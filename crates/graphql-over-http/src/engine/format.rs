use serde_json::Value;

use crate::GraphqlError;

/// Shapes every error, whatever its origin, right before it is serialized. Status codes are
/// decided earlier and cannot be changed here.
pub trait ErrorFormatter: Send + Sync {
    fn format_error(&self, error: &GraphqlError) -> Value;
}

impl<F> ErrorFormatter for F
where
    F: Fn(&GraphqlError) -> Value + Send + Sync,
{
    fn format_error(&self, error: &GraphqlError) -> Value {
        self(error)
    }
}

/// `{message, locations?, path?, extensions?}`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorFormatter;

impl ErrorFormatter for DefaultErrorFormatter {
    fn format_error(&self, error: &GraphqlError) -> Value {
        serde_json::to_value(error).unwrap_or_else(|err| {
            tracing::error!("Failed to serialize GraphQL error: {err}");
            serde_json::json!({ "message": error.message })
        })
    }
}
