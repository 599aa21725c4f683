//! The validation pipeline.
//!
//! Wraps a handler in the full chain: adapter extraction, pre-validators,
//! mode-driven schema validation, post-validators, then the handler itself.
//! Any failure short-circuits to the adapter's error converter and the
//! handler is never invoked: each call delivers either the validated object
//! or an error response, never both.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use sluice::adapters::GenericAdapter;
//! use sluice::{
//!     prevalidate, FieldKind, RequestContext, TypedSchema, ValidationMode, ValidationPipeline,
//! };
//! use validator::Validate;
//!
//! #[derive(Debug, Serialize, Deserialize, Validate)]
//! struct Contact {
//!     name: String,
//!     email: String,
//! }
//!
//! let pipeline = ValidationPipeline::new(
//!     TypedSchema::<Contact>::new()
//!         .field("name", FieldKind::String)
//!         .field("email", FieldKind::String),
//! )
//! .with_mode(ValidationMode::Lax)
//! .with_pre_validator(prevalidate::normalize_email);
//!
//! let mut request = serde_json::Map::new();
//! request.insert("name".into(), "Alice".into());
//! request.insert("email".into(), "  ALICE@Example.Com ".into());
//!
//! let result = pipeline.run(&GenericAdapter, &request, RequestContext::new(), |contact, _ctx| {
//!     Ok(serde_json::json!({"email": contact.email}))
//! });
//! assert_eq!(result.unwrap()["email"], "alice@example.com");
//! ```

use crate::adapters::{FrameworkAdapter, Prebound};
use crate::context::RequestContext;
use crate::error::{default_formatter, ErrorFormatter, ValidationError};
use crate::extract::RawData;
use crate::mode::ValidationMode;
use crate::schema::Schema;

/// Transform over the raw field mapping, run before schema validation.
pub type PreValidator = Box<dyn Fn(RawData) -> Result<RawData, ValidationError> + Send + Sync>;

/// Transform or rejection rule over the validated object, run after schema
/// validation. A rejection is a business-rule validation failure, not a
/// schema failure.
pub type PostValidator<T> = Box<dyn Fn(T) -> Result<T, ValidationError> + Send + Sync>;

/// A handler binding: schema, mode, ordered validator chains, and the error
/// formatter, all captured at registration time and immutable afterwards.
pub struct ValidationPipeline<S: Schema> {
    schema: S,
    mode: ValidationMode,
    pre_validators: Vec<PreValidator>,
    post_validators: Vec<PostValidator<S::Output>>,
    formatter: ErrorFormatter,
}

impl<S: Schema> ValidationPipeline<S> {
    /// Bind a schema with the defaults: [`ValidationMode::Strict`], empty
    /// validator chains, and the pass-through error formatter.
    pub fn new(schema: S) -> Self {
        Self {
            schema,
            mode: ValidationMode::default(),
            pre_validators: Vec::new(),
            post_validators: Vec::new(),
            formatter: Box::new(default_formatter),
        }
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Append a pre-validator. Pre-validators run in the order they were
    /// added, each receiving the previous one's output.
    pub fn with_pre_validator<F>(mut self, pre: F) -> Self
    where
        F: Fn(RawData) -> Result<RawData, ValidationError> + Send + Sync + 'static,
    {
        self.pre_validators.push(Box::new(pre));
        self
    }

    /// Append a post-validator. Post-validators run in the order they were
    /// added over the validated object.
    pub fn with_post_validator<F>(mut self, post: F) -> Self
    where
        F: Fn(S::Output) -> Result<S::Output, ValidationError> + Send + Sync + 'static,
    {
        self.post_validators.push(Box::new(post));
        self
    }

    /// Replace the default error formatter.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&[crate::FieldError]) -> Vec<serde_json::Value> + Send + Sync + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    /// Run the full chain and hand the validated object to `handler`, or
    /// convert the failure through the adapter.
    pub fn run<A, H>(
        &self,
        adapter: &A,
        request: &A::Request,
        ctx: RequestContext,
        handler: H,
    ) -> A::Response
    where
        A: FrameworkAdapter,
        H: FnOnce(S::Output, RequestContext) -> A::Response,
    {
        match self.process(adapter, request) {
            Ok(validated) => handler(validated, ctx),
            Err(error) => {
                tracing::debug!(message = %error.message, "request rejected by validation pipeline");
                adapter.validation_error_response(error)
            }
        }
    }

    /// Run only the post-validator stage over a value the framework already
    /// bound and validated (see [`Prebound`]).
    pub fn run_prebound<A, H>(
        &self,
        adapter: &A,
        request: &A::Request,
        ctx: RequestContext,
        handler: H,
    ) -> A::Response
    where
        A: Prebound<S::Output>,
        H: FnOnce(S::Output, RequestContext) -> A::Response,
    {
        match self.apply_post(adapter.validated(request)) {
            Ok(validated) => handler(validated, ctx),
            Err(error) => {
                tracing::debug!(message = %error.message, "prebound request rejected");
                adapter.validation_error_response(error)
            }
        }
    }

    fn process<A: FrameworkAdapter>(
        &self,
        adapter: &A,
        request: &A::Request,
    ) -> Result<S::Output, ValidationError> {
        let mut raw = adapter.extract(request)?;
        for pre in &self.pre_validators {
            raw = pre(raw)?;
        }
        let validated = self
            .schema
            .validate(&raw, self.mode.policy())
            .map_err(|fields| {
                ValidationError::from_field_errors("Validation failed", &fields, &self.formatter)
            })?;
        self.apply_post(validated)
    }

    fn apply_post(&self, mut validated: S::Output) -> Result<S::Output, ValidationError> {
        for post in &self.post_validators {
            validated = post(validated)?;
        }
        Ok(validated)
    }
}
