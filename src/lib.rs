//! Sluice - framework-agnostic request validation and auth for Rust web handlers
//!
//! Sluice sits between a web framework and your handler code. It normalizes
//! raw request data into a single mapping, validates and coerces it against a
//! declared schema under one of three validation modes, optionally runs pre-
//! and post-processing hooks, and delivers either a validated object to the
//! handler or a structured error to the framework's error path - whichever
//! framework produced the request.
//!
//! # Features
//!
//! - **Adapters**: one pipeline, several request models - Axum, Actix Web,
//!   pre-bound payloads, or a plain mapping
//! - **Modes**: strict, lax, and permissive unknown-field and coercion policy
//! - **Hooks**: ordered pre-validators over raw data, post-validators over
//!   the validated object
//! - **Auth**: HS256 bearer tokens with role-based access, threaded through
//!   an explicit request context
//!
//! # Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use sluice::adapters::GenericAdapter;
//! use sluice::{FieldKind, RequestContext, TypedSchema, ValidationPipeline};
//! use validator::Validate;
//!
//! #[derive(Debug, Serialize, Deserialize, Validate)]
//! struct Login {
//!     username: String,
//!     password: String,
//! }
//!
//! let pipeline = ValidationPipeline::new(
//!     TypedSchema::<Login>::new()
//!         .field("username", FieldKind::String)
//!         .field("password", FieldKind::String),
//! );
//!
//! let mut request = serde_json::Map::new();
//! request.insert("username".into(), "alice".into());
//! request.insert("password".into(), "password123".into());
//!
//! let result = pipeline.run(&GenericAdapter, &request, RequestContext::new(), |login, _ctx| {
//!     Ok(serde_json::json!({"hello": login.username}))
//! });
//! assert!(result.is_ok());
//! ```

pub mod adapters;
pub mod auth;
mod context;
mod error;
pub mod extract;
mod mode;
mod pipeline;
pub mod prevalidate;
mod schema;

pub use context::RequestContext;
pub use error::{
    default_formatter, AuthError, ErrorFormatter, FieldError, GatewayError, ValidationError,
};
pub use extract::RawData;
pub use mode::ValidationMode;
pub use pipeline::{PostValidator, PreValidator, ValidationPipeline};
pub use schema::{FieldKind, Schema, SchemaOptions, TypedSchema};

// Re-export so downstream schemas derive against the same version.
pub use validator;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults.
///
/// Call early in your application, before serving requests.
///
/// # Environment Variables
///
/// - `RUST_LOG`: set log level (e.g., "info", "debug", "sluice=debug")
/// - `SLUICE_LOG_JSON`: set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("SLUICE_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
