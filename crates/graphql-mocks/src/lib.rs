//! An in-memory GraphQL engine with a small fixed schema, used by the test suites:
//!
//! ```graphql
//! type Query {
//!   test(who: String): String
//!   thrower: String
//!   nonNullThrower: String!
//!   context: String
//!   root: JSON
//!   resolved: JSON
//!   typeOf(value: String): String
//!   nested: Query
//! }
//!
//! type Mutation {
//!   writeTest: Query
//! }
//! ```
//!
//! `context` describes where the context value came from, `resolved` and `typeOf` go
//! through the configured field and type resolvers.

mod executor;
mod validation;

use graphql_over_http::{
    engine::{ExecutionArgs, ExecutionResult, Executor},
    GraphqlError, GraphqlResult,
};

pub use executor::TestExecutor;
pub use validation::KnownFields;

/// The schema [`TestExecutor`] executes against. It carries no data, the whole schema is
/// hardcoded in the executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestSchema;

/// An executor that cannot execute anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingExecutor;

#[async_trait::async_trait]
impl<S, C> Executor<S, C> for FailingExecutor
where
    S: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    async fn execute(&self, _args: ExecutionArgs<'_, S, C>) -> GraphqlResult<ExecutionResult> {
        Err(GraphqlError::new("Executor is unavailable"))
    }
}
