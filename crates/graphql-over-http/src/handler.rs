use std::{future::Future, sync::Arc};

use bytes::Bytes;
use futures::future;

use crate::{
    config::{HandlerConfig, HandlerOptions},
    execution,
    http_response::ResponseFormatter,
    preflight, request, ErrorResponse,
};

/// Serves one GraphQL schema over HTTP.
///
/// The configuration is frozen at construction. Cloning the handler is cheap and clones
/// share the same schema and configuration.
pub struct GraphqlHandler<S, C = ()> {
    schema: Arc<S>,
    config: Arc<HandlerConfig<S, C>>,
}

impl<S, C> Clone for GraphqlHandler<S, C> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, C> GraphqlHandler<S, C>
where
    S: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    pub fn new(schema: S, options: HandlerOptions<S, C>) -> Self {
        Self::from_arc(Arc::new(schema), options)
    }

    pub fn from_arc(schema: Arc<S>, options: HandlerOptions<S, C>) -> Self {
        Self {
            schema,
            config: Arc::new(options.into_config()),
        }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Handles a request whose body is read lazily: the body future is only awaited for
    /// POST requests. It resolves to the body bytes, or to the status and message to
    /// answer with if the body could not be read.
    ///
    /// Always produces a response, failures included.
    pub async fn handle<F>(&self, request: http::Request<F>) -> http::Response<Bytes>
    where
        F: Future<Output = Result<Bytes, (http::StatusCode, String)>> + Send,
    {
        self.respond(request, None).await
    }

    /// Same as [`Self::handle`], with a context that takes precedence over the one
    /// configured on the handler for this call only.
    pub async fn handle_with_context<F>(&self, request: http::Request<F>, context: C) -> http::Response<Bytes>
    where
        F: Future<Output = Result<Bytes, (http::StatusCode, String)>> + Send,
    {
        self.respond(request, Some(&context)).await
    }

    /// Convenience for requests whose body is already in memory.
    pub async fn handle_bytes(&self, request: http::Request<Bytes>) -> http::Response<Bytes> {
        let (parts, body) = request.into_parts();
        self.handle(http::Request::from_parts(parts, future::ready(Ok(body))))
            .await
    }

    async fn respond<F>(&self, request: http::Request<F>, local_context: Option<&C>) -> http::Response<Bytes>
    where
        F: Future<Output = Result<Bytes, (http::StatusCode, String)>> + Send,
    {
        let config = self.config.as_ref();
        let (parts, body) = request.into_parts();

        if let Some(response) = preflight::respond(&parts.method, config.allow_origins.as_ref()) {
            return response;
        }

        let formatter = ResponseFormatter {
            pretty: config.pretty,
            base_headers: &config.base_headers,
            error_formatter: config.error_formatter.as_ref(),
        };

        if let Err(err) = execution::check_method(&parts.method) {
            return formatter.refused(ErrorResponse::from(err));
        }

        let params = match request::resolve(&parts, body).await {
            Ok(params) => params,
            Err(err) => {
                tracing::debug!("could not extract GraphQL parameters: {err}");
                return formatter.refused(ErrorResponse::from(err));
            }
        };

        match execution::run(self.schema.as_ref(), params, config, &parts, local_context).await {
            Ok(operation) => formatter.executed(operation),
            Err(err) => formatter.refused(ErrorResponse::from(err)),
        }
    }
}
