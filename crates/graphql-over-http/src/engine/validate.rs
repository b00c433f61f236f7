use std::{collections::HashSet, sync::Arc};

use async_graphql_parser::types::{Selection, SelectionSet};

use super::ExecutableDocument;
use crate::GraphqlError;

/// A single check run against a parsed document before execution.
pub trait ValidationRule<S>: Send + Sync {
    fn check(&self, schema: &S, document: &ExecutableDocument) -> Vec<GraphqlError>;
}

/// Runs the configured rules. Configuring no validator at all skips validation entirely.
pub trait Validator<S>: Send + Sync {
    fn validate(
        &self,
        schema: &S,
        document: &ExecutableDocument,
        rules: &[Arc<dyn ValidationRule<S>>],
    ) -> Vec<GraphqlError>;
}

/// Applies every rule in order and concatenates their errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleValidator;

impl<S> Validator<S> for RuleValidator {
    fn validate(
        &self,
        schema: &S,
        document: &ExecutableDocument,
        rules: &[Arc<dyn ValidationRule<S>>],
    ) -> Vec<GraphqlError> {
        rules.iter().flat_map(|rule| rule.check(schema, document)).collect()
    }
}

/// Rejects operations whose selections are nested deeper than the limit.
#[derive(Debug, Clone, Copy)]
pub struct DepthLimit {
    max_depth: usize,
}

impl DepthLimit {
    pub fn new(max_depth: usize) -> Self {
        DepthLimit { max_depth }
    }
}

impl<S> ValidationRule<S> for DepthLimit {
    fn check(&self, _schema: &S, document: &ExecutableDocument) -> Vec<GraphqlError> {
        document
            .operations
            .iter()
            .filter_map(|(_, operation)| {
                let depth = selection_set_depth(document, &operation.node.selection_set.node, &mut HashSet::new());
                (depth > self.max_depth)
                    .then(|| GraphqlError::new("Query is nested too deep.").with_location(operation.pos))
            })
            .collect()
    }
}

fn selection_set_depth<'a>(
    document: &'a ExecutableDocument,
    selection_set: &'a SelectionSet,
    visited_fragments: &mut HashSet<&'a str>,
) -> usize {
    selection_set
        .items
        .iter()
        .map(|selection| match &selection.node {
            Selection::Field(field) => {
                let children = &field.node.selection_set.node;
                1 + selection_set_depth(document, children, visited_fragments)
            }
            Selection::InlineFragment(fragment) => {
                selection_set_depth(document, &fragment.node.selection_set.node, visited_fragments)
            }
            Selection::FragmentSpread(spread) => {
                let name = &spread.node.fragment_name.node;
                // Cycles are reported by the engine's own validation, not here.
                if !visited_fragments.insert(name.as_str()) {
                    return 0;
                }
                let depth = document
                    .fragments
                    .get(name)
                    .map(|fragment| selection_set_depth(document, &fragment.node.selection_set.node, visited_fragments))
                    .unwrap_or_default();
                visited_fragments.remove(name.as_str());
                depth
            }
        })
        .max()
        .unwrap_or_default()
}
