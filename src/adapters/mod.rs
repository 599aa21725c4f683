//! The framework seam.
//!
//! One validation/auth pipeline serves several structurally incompatible
//! request models through this trait. Each binding knows how to pull a
//! normalized field mapping out of its framework's request and how to render
//! pipeline errors as that framework's error response; the pipeline itself
//! never branches on framework identity.

use crate::error::{AuthError, ValidationError};
use crate::extract::RawData;

#[cfg(feature = "actix-adapter")]
mod actix;
#[cfg(feature = "axum-adapter")]
mod axum;
mod generic;
#[cfg(feature = "axum-adapter")]
mod prebound;

#[cfg(feature = "actix-adapter")]
pub use actix::ActixAdapter;
#[cfg(feature = "axum-adapter")]
pub use axum::{buffer_request, AxumAdapter};
pub use generic::GenericAdapter;
#[cfg(feature = "axum-adapter")]
pub use prebound::PreboundAdapter;

/// Framework-specific implementation of the shared extraction and
/// error-conversion contract.
pub trait FrameworkAdapter {
    /// The framework-native (or framework-shaped) request this adapter reads.
    type Request;
    /// What the wrapped handler chain ultimately returns.
    type Response;

    /// Pull JSON body, form fields, and query parameters from the request and
    /// merge them, lowest priority first: query, form, JSON body.
    ///
    /// A declared JSON body that cannot be parsed aborts extraction with a
    /// validation error; no partial data is used.
    fn extract(&self, request: &Self::Request) -> Result<RawData, ValidationError>;

    /// The raw `Authorization` header, if the request carries one.
    fn auth_header(&self, request: &Self::Request) -> Option<String>;

    /// Render a validation failure as this framework's error response.
    fn validation_error_response(&self, error: ValidationError) -> Self::Response;

    /// Render an auth failure as this framework's error response.
    fn auth_error_response(&self, error: AuthError) -> Self::Response;
}

/// Adapters whose framework performed schema binding before this layer runs.
///
/// Such a framework has already consumed and validated the body, so
/// re-validating would double-fail on legitimate payloads. The pipeline's
/// [`crate::ValidationPipeline::run_prebound`] entry point takes the typed
/// value from here and runs only the post-validator stage.
pub trait Prebound<T>: FrameworkAdapter {
    fn validated(&self, request: &Self::Request) -> T;
}
