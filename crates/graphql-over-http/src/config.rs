use std::sync::Arc;

use headers::HeaderMapExt;
use http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderMap, HeaderValue};
use serde_json::Value;
use serde_with::DisplayFromStr;
use size::Size;

use crate::engine::{
    DefaultErrorFormatter, DefaultParser, ErrorFormatter, Executor, ExtensionsProvider, FieldResolver, Parser,
    TypeResolver, ValidationRule, Validator,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid allow_origins value {0:?}: not a valid header value")]
    InvalidOrigin(String),
}

/// The data-only part of the handler configuration, as it appears in a configuration file.
///
/// ```toml
/// pretty = true
/// allow_origins = "https://example.com"
/// request_body_limit = "1MiB"
/// ```
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerSettings {
    /// Indent JSON responses with two spaces.
    pub pretty: bool,
    /// Value of the `Access-Control-Allow-Origin` header. Setting it also enables the
    /// answer to preflight requests.
    pub allow_origins: Option<String>,
    /// Maximum size of the request body, enforced by the transport integration.
    #[serde_as(as = "DisplayFromStr")]
    pub request_body_limit: Size,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            pretty: false,
            allow_origins: None,
            request_body_limit: Size::from_mebibytes(2),
        }
    }
}

impl HandlerSettings {
    pub fn request_body_limit_bytes(&self) -> usize {
        self.request_body_limit.bytes().max(0) as usize
    }
}

/// Everything needed to build a [`crate::GraphqlHandler`].
///
/// Options are plain values: cloning them and changing the clone never affects the
/// original, and a handler takes its own frozen copy at construction.
pub struct HandlerOptions<S, C = ()> {
    executor: Arc<dyn Executor<S, C>>,
    parser: Arc<dyn Parser>,
    validator: Option<Arc<dyn Validator<S>>>,
    validation_rules: Vec<Arc<dyn ValidationRule<S>>>,
    error_formatter: Arc<dyn ErrorFormatter>,
    extensions: Option<Arc<dyn ExtensionsProvider<C>>>,
    field_resolver: Option<Arc<dyn FieldResolver>>,
    type_resolver: Option<Arc<dyn TypeResolver>>,
    context: Option<Arc<C>>,
    root_value: Option<Value>,
    allow_origins: Option<HeaderValue>,
    pretty: bool,
}

impl<S, C> Clone for HandlerOptions<S, C> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            parser: self.parser.clone(),
            validator: self.validator.clone(),
            validation_rules: self.validation_rules.clone(),
            error_formatter: self.error_formatter.clone(),
            extensions: self.extensions.clone(),
            field_resolver: self.field_resolver.clone(),
            type_resolver: self.type_resolver.clone(),
            context: self.context.clone(),
            root_value: self.root_value.clone(),
            allow_origins: self.allow_origins.clone(),
            pretty: self.pretty,
        }
    }
}

impl<S, C> HandlerOptions<S, C> {
    /// Lean defaults: documents are parsed with [`DefaultParser`], errors formatted with
    /// [`DefaultErrorFormatter`], and no validation happens until a validator is set.
    pub fn new(executor: impl Executor<S, C> + 'static) -> Self {
        Self {
            executor: Arc::new(executor),
            parser: Arc::new(DefaultParser),
            validator: None,
            validation_rules: Vec::new(),
            error_formatter: Arc::new(DefaultErrorFormatter),
            extensions: None,
            field_resolver: None,
            type_resolver: None,
            context: None,
            root_value: None,
            allow_origins: None,
            pretty: false,
        }
    }

    #[must_use]
    pub fn with_executor(mut self, executor: impl Executor<S, C> + 'static) -> Self {
        self.executor = Arc::new(executor);
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl Validator<S> + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    #[must_use]
    pub fn with_validation_rule(mut self, rule: impl ValidationRule<S> + 'static) -> Self {
        self.validation_rules.push(Arc::new(rule));
        self
    }

    #[must_use]
    pub fn with_validation_rules(mut self, rules: impl IntoIterator<Item = Arc<dyn ValidationRule<S>>>) -> Self {
        self.validation_rules = rules.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_error_formatter(mut self, formatter: impl ErrorFormatter + 'static) -> Self {
        self.error_formatter = Arc::new(formatter);
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: impl ExtensionsProvider<C> + 'static) -> Self {
        self.extensions = Some(Arc::new(extensions));
        self
    }

    #[must_use]
    pub fn with_field_resolver(mut self, resolver: impl FieldResolver + 'static) -> Self {
        self.field_resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn with_type_resolver(mut self, resolver: impl TypeResolver + 'static) -> Self {
        self.type_resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    #[must_use]
    pub fn with_root_value(mut self, root_value: impl Into<Value>) -> Self {
        self.root_value = Some(root_value.into());
        self
    }

    #[must_use]
    pub fn with_allow_origins(mut self, origin: HeaderValue) -> Self {
        self.allow_origins = Some(origin);
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_settings(self, settings: &HandlerSettings) -> Result<Self, ConfigError> {
        let options = self.with_pretty(settings.pretty);

        match &settings.allow_origins {
            Some(origin) => {
                let value =
                    HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))?;
                Ok(options.with_allow_origins(value))
            }
            None => Ok(options),
        }
    }

    pub(crate) fn into_config(self) -> HandlerConfig<S, C> {
        let mut base_headers = HeaderMap::new();
        base_headers.typed_insert(headers::ContentType::json());
        if let Some(origin) = &self.allow_origins {
            base_headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        }

        HandlerConfig {
            executor: self.executor,
            parser: self.parser,
            validator: self.validator,
            validation_rules: self.validation_rules,
            error_formatter: self.error_formatter,
            extensions: self.extensions,
            field_resolver: self.field_resolver,
            type_resolver: self.type_resolver,
            context: self.context,
            root_value: self.root_value,
            allow_origins: self.allow_origins,
            pretty: self.pretty,
            base_headers,
        }
    }
}

/// The frozen configuration of a handler, shared by all the requests it serves.
pub(crate) struct HandlerConfig<S, C> {
    pub executor: Arc<dyn Executor<S, C>>,
    pub parser: Arc<dyn Parser>,
    pub validator: Option<Arc<dyn Validator<S>>>,
    pub validation_rules: Vec<Arc<dyn ValidationRule<S>>>,
    pub error_formatter: Arc<dyn ErrorFormatter>,
    pub extensions: Option<Arc<dyn ExtensionsProvider<C>>>,
    pub field_resolver: Option<Arc<dyn FieldResolver>>,
    pub type_resolver: Option<Arc<dyn TypeResolver>>,
    pub context: Option<Arc<C>>,
    pub root_value: Option<Value>,
    pub allow_origins: Option<HeaderValue>,
    pub pretty: bool,
    /// `Content-Type` and, with CORS enabled, `Access-Control-Allow-Origin`.
    pub base_headers: HeaderMap,
}
