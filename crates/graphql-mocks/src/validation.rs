use std::collections::HashSet;

use async_graphql_parser::types::{ExecutableDocument, OperationType, Selection, SelectionSet};
use graphql_over_http::{engine::ValidationRule, GraphqlError};

use crate::TestSchema;

const QUERY_FIELDS: &[&str] = &[
    "__typename",
    "test",
    "thrower",
    "nonNullThrower",
    "context",
    "root",
    "resolved",
    "typeOf",
    "nested",
];

const MUTATION_FIELDS: &[&str] = &["__typename", "writeTest"];

/// Reports every selected field that [`TestSchema`] doesn't define.
#[derive(Debug, Default, Clone, Copy)]
pub struct KnownFields;

impl ValidationRule<TestSchema> for KnownFields {
    fn check(&self, _schema: &TestSchema, document: &ExecutableDocument) -> Vec<GraphqlError> {
        let mut errors = Vec::new();

        for (_, operation) in document.operations.iter() {
            let (type_name, fields) = match operation.node.ty {
                OperationType::Mutation => ("Mutation", MUTATION_FIELDS),
                OperationType::Query | OperationType::Subscription => ("Query", QUERY_FIELDS),
            };

            check_selection_set(
                document,
                &operation.node.selection_set.node,
                type_name,
                fields,
                &mut HashSet::new(),
                &mut errors,
            );
        }

        errors
    }
}

fn check_selection_set<'a>(
    document: &'a ExecutableDocument,
    selection_set: &'a SelectionSet,
    type_name: &str,
    known_fields: &[&str],
    visited_fragments: &mut HashSet<&'a str>,
    errors: &mut Vec<GraphqlError>,
) {
    for selection in &selection_set.items {
        match &selection.node {
            Selection::Field(field) => {
                let name = field.node.name.node.as_str();
                if !known_fields.contains(&name) {
                    errors.push(
                        GraphqlError::new(format!("Cannot query field \"{name}\" on type \"{type_name}\"."))
                            .with_location(field.pos),
                    );
                    continue;
                }

                if matches!(name, "nested" | "writeTest") {
                    let children = &field.node.selection_set.node;
                    check_selection_set(document, children, "Query", QUERY_FIELDS, visited_fragments, errors);
                }
            }
            Selection::InlineFragment(fragment) => {
                let children = &fragment.node.selection_set.node;
                check_selection_set(document, children, type_name, known_fields, visited_fragments, errors);
            }
            Selection::FragmentSpread(spread) => {
                let name = &spread.node.fragment_name.node;
                if !visited_fragments.insert(name.as_str()) {
                    continue;
                }
                if let Some(fragment) = document.fragments.get(name) {
                    let children = &fragment.node.selection_set.node;
                    check_selection_set(document, children, type_name, known_fields, visited_fragments, errors);
                }
            }
        }
    }
}
