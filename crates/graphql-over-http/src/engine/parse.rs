use super::ExecutableDocument;
use crate::{GraphqlError, GraphqlResult, Location};

pub trait Parser: Send + Sync {
    fn parse(&self, query: &str) -> GraphqlResult<ExecutableDocument>;
}

impl<F> Parser for F
where
    F: Fn(&str) -> GraphqlResult<ExecutableDocument> + Send + Sync,
{
    fn parse(&self, query: &str) -> GraphqlResult<ExecutableDocument> {
        self(query)
    }
}

/// Parses documents with `async-graphql-parser`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultParser;

impl Parser for DefaultParser {
    fn parse(&self, query: &str) -> GraphqlResult<ExecutableDocument> {
        async_graphql_parser::parse_query(query).map_err(|error| {
            let locations = error.positions().map(Location::from).collect::<Vec<_>>();
            GraphqlError::new(format!("Syntax Error: {error}")).with_locations(locations)
        })
    }
}
