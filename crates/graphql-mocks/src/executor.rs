use std::{collections::HashSet, fmt};

use async_graphql_parser::{
    types::{DocumentOperations, ExecutableDocument, Field, OperationDefinition, OperationType, Selection, SelectionSet},
    Positioned,
};
use futures::future::{BoxFuture, FutureExt};
use graphql_over_http::{
    engine::{ContextValue, ExecutionArgs, ExecutionResult, Executor, FieldResolveInfo, FieldResolver, TypeResolver},
    ErrorPath, GraphqlError, GraphqlResult,
};
use serde_json::{Map, Value};

use crate::TestSchema;

/// Executes documents against [`TestSchema`], one field at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestExecutor;

#[async_trait::async_trait]
impl<C> Executor<TestSchema, C> for TestExecutor
where
    C: fmt::Debug + Send + Sync + 'static,
{
    async fn execute(&self, args: ExecutionArgs<'_, TestSchema, C>) -> GraphqlResult<ExecutionResult> {
        let operation = match select_operation(args.document, args.operation_name) {
            Ok(operation) => operation,
            Err(error) => return Ok(ExecutionResult::from_errors([error])),
        };

        let root_type = match operation.node.ty {
            OperationType::Query => ObjectType::Query,
            OperationType::Mutation => ObjectType::Mutation,
            OperationType::Subscription => {
                let error = GraphqlError::new("Subscriptions are not supported.").with_location(operation.pos);
                return Ok(ExecutionResult::from_errors([error]));
            }
        };

        let variables = coerce_variables(&operation.node, args.variable_values);
        let execution = Execution {
            document: args.document,
            variables: &variables,
            root_value: args.root_value,
            context: args.context_value,
            field_resolver: args.field_resolver,
            type_resolver: args.type_resolver,
        };

        let mut errors = Vec::new();
        let data = match execution
            .execute_selection_set(
                root_type,
                &operation.node.selection_set.node,
                ErrorPath::default(),
                &mut errors,
            )
            .await
        {
            Ok(object) => Value::Object(object),
            Err(NonNullViolation) => Value::Null,
        };

        Ok(ExecutionResult {
            data: Some(data),
            errors,
        })
    }
}

fn select_operation<'a>(
    document: &'a ExecutableDocument,
    operation_name: Option<&str>,
) -> GraphqlResult<&'a Positioned<OperationDefinition>> {
    let unknown = |name: &str| GraphqlError::new(format!("Unknown operation named \"{name}\"."));

    match (&document.operations, operation_name) {
        (DocumentOperations::Single(operation), None) => Ok(operation),
        (DocumentOperations::Single(_), Some(name)) => Err(unknown(name)),
        (DocumentOperations::Multiple(operations), Some(name)) => operations
            .iter()
            .find(|(operation_name, _)| operation_name.as_str() == name)
            .map(|(_, operation)| operation)
            .ok_or_else(|| unknown(name)),
        (DocumentOperations::Multiple(operations), None) => {
            let mut operations = operations.values();
            match (operations.next(), operations.next()) {
                (Some(operation), None) => Ok(operation),
                (None, _) => Err(GraphqlError::new("Must provide an operation.")),
                (Some(_), Some(_)) => Err(GraphqlError::new(
                    "Must provide operation name if query contains multiple operations.",
                )),
            }
        }
    }
}

/// Provided variables, completed with the defaults declared by the operation.
fn coerce_variables(operation: &OperationDefinition, provided: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut variables = provided.cloned().unwrap_or_default();

    for definition in &operation.variable_definitions {
        let name = definition.node.name.node.as_str();
        if variables.contains_key(name) {
            continue;
        }

        let default = definition
            .node
            .default_value
            .as_ref()
            .and_then(|value| value.node.clone().into_json().ok());

        if let Some(default) = default {
            variables.insert(name.to_owned(), default);
        }
    }

    variables
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectType {
    Query,
    Mutation,
}

impl ObjectType {
    fn name(self) -> &'static str {
        match self {
            ObjectType::Query => "Query",
            ObjectType::Mutation => "Mutation",
        }
    }
}

/// A non-null field failed: the nearest nullable parent becomes `null`.
struct NonNullViolation;

struct Execution<'a, C> {
    document: &'a ExecutableDocument,
    variables: &'a Map<String, Value>,
    root_value: Option<&'a Value>,
    context: ContextValue<'a, C>,
    field_resolver: Option<&'a dyn FieldResolver>,
    type_resolver: Option<&'a dyn TypeResolver>,
}

impl<'a, C> Execution<'a, C>
where
    C: fmt::Debug + Send + Sync,
{
    fn execute_selection_set<'b>(
        &'b self,
        ty: ObjectType,
        selection_set: &'a SelectionSet,
        path: ErrorPath,
        errors: &'b mut Vec<GraphqlError>,
    ) -> BoxFuture<'b, Result<Map<String, Value>, NonNullViolation>> {
        async move {
            let mut fields = Vec::new();
            collect_fields(self.document, selection_set, &mut fields, &mut HashSet::new());

            let mut object = Map::new();
            for field in fields {
                let key = field.node.response_key().node.to_string();
                let value = self.execute_field(ty, field, path.child(key.as_str()), errors).await?;
                object.insert(key, value);
            }

            Ok(object)
        }
        .boxed()
    }

    async fn execute_field(
        &self,
        ty: ObjectType,
        field: &'a Positioned<Field>,
        path: ErrorPath,
        errors: &mut Vec<GraphqlError>,
    ) -> Result<Value, NonNullViolation> {
        let name = field.node.name.node.as_str();
        let arguments = self.arguments(&field.node);

        match (ty, name) {
            (_, "__typename") => Ok(Value::String(ty.name().to_owned())),
            (ObjectType::Query, "test") => {
                let who = arguments.get("who").and_then(Value::as_str).unwrap_or("World");
                Ok(Value::String(format!("Hello {who}")))
            }
            (ObjectType::Query, "thrower") => {
                errors.push(GraphqlError::new("Throws!").with_location(field.pos).with_path(path));
                Ok(Value::Null)
            }
            (ObjectType::Query, "nonNullThrower") => {
                errors.push(GraphqlError::new("Throws!").with_location(field.pos).with_path(path));
                Err(NonNullViolation)
            }
            (ObjectType::Query, "context") => Ok(Value::String(describe_context(self.context))),
            (ObjectType::Query, "root") => Ok(self.root_value.cloned().unwrap_or_default()),
            (ObjectType::Query, "resolved") => {
                let Some(resolver) = self.field_resolver else {
                    return Ok(Value::Null);
                };

                let null = Value::Null;
                let info = FieldResolveInfo {
                    source: self.root_value.unwrap_or(&null),
                    field_name: name,
                    arguments: &arguments,
                };

                match resolver.resolve_field(info).await {
                    Ok(value) => Ok(value),
                    Err(error) => {
                        errors.push(error.with_location(field.pos).with_path(path));
                        Ok(Value::Null)
                    }
                }
            }
            (ObjectType::Query, "typeOf") => {
                let value = arguments.get("value").cloned().unwrap_or_default();
                let type_name = self
                    .type_resolver
                    .and_then(|resolver| resolver.resolve_type(&value, "Node"));

                Ok(type_name.map(Value::String).unwrap_or_default())
            }
            (ObjectType::Query, "nested") | (ObjectType::Mutation, "writeTest") => {
                let selection_set = &field.node.selection_set.node;
                match self.execute_selection_set(ObjectType::Query, selection_set, path, errors).await {
                    Ok(object) => Ok(Value::Object(object)),
                    Err(NonNullViolation) => Ok(Value::Null),
                }
            }
            _ => {
                let message = format!("Cannot query field \"{name}\" on type \"{}\".", ty.name());
                errors.push(GraphqlError::new(message).with_location(field.pos).with_path(path));
                Ok(Value::Null)
            }
        }
    }

    fn arguments(&self, field: &Field) -> Map<String, Value> {
        field
            .arguments
            .iter()
            .map(|(name, value)| (name.node.to_string(), self.input_to_json(&value.node)))
            .collect()
    }

    fn input_to_json(&self, value: &async_graphql_value::Value) -> Value {
        use async_graphql_value::Value as Input;

        match value {
            Input::Variable(name) => self.variables.get(name.as_str()).cloned().unwrap_or_default(),
            Input::Null | Input::Binary(_) => Value::Null,
            Input::Number(number) => Value::Number(number.clone()),
            Input::String(string) => Value::String(string.clone()),
            Input::Boolean(boolean) => Value::Bool(*boolean),
            Input::Enum(name) => Value::String(name.to_string()),
            Input::List(items) => items.iter().map(|item| self.input_to_json(item)).collect(),
            Input::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.to_string(), self.input_to_json(value)))
                    .collect(),
            ),
        }
    }
}

/// Flattens fragments into the list of fields to execute. Type conditions are ignored as
/// every selection of the schema lands on `Query`.
fn collect_fields<'a>(
    document: &'a ExecutableDocument,
    selection_set: &'a SelectionSet,
    fields: &mut Vec<&'a Positioned<Field>>,
    visited_fragments: &mut HashSet<&'a str>,
) {
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => fields.push(field),
            Selection::InlineFragment(fragment) => {
                collect_fields(document, &fragment.node.selection_set.node, fields, visited_fragments);
            }
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if !visited_fragments.insert(name) {
                    continue;
                }
                if let Some(fragment) = document.fragments.get(&spread.node.fragment_name.node) {
                    collect_fields(document, &fragment.node.selection_set.node, fields, visited_fragments);
                }
            }
        }
    }
}

fn describe_context<C: fmt::Debug>(context: ContextValue<'_, C>) -> String {
    match context {
        ContextValue::Call(context) => format!("call:{context:?}"),
        ContextValue::Handler(context) => format!("handler:{context:?}"),
        ContextValue::Request(request) => format!("request:{} {}", request.method, request.uri),
    }
}
