//! Serves an executable GraphQL schema over HTTP.
//!
//! [`GraphqlHandler`] turns an `http::Request` into an `http::Response<Bytes>`: it extracts
//! the GraphQL parameters from the URL and the body, runs them through the configured
//! [engine](engine) capabilities and shapes the outcome as a GraphQL JSON response.
//! Transport integrations only need to provide the body lazily, see
//! [`GraphqlHandler::handle`].

mod config;
pub mod engine;
mod error;
mod execution;
mod handler;
mod http_response;
mod preflight;
mod request;

pub use config::{ConfigError, HandlerOptions, HandlerSettings};
pub use error::*;
pub use handler::GraphqlHandler;
pub use request::ParsedParams;
