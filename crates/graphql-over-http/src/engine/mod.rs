//! The capabilities the HTTP pipeline needs from a GraphQL engine.
//!
//! Each one is a separate trait so that it can be swapped independently: a custom parser
//! with the default formatter, a validator without any rules, and so on. The pipeline
//! only ever talks to these traits.

mod execute;
mod format;
mod parse;
mod validate;

pub use async_graphql_parser::types::ExecutableDocument;
pub use execute::*;
pub use format::*;
pub use parse::*;
pub use validate::*;
