use crate::adapters::{FrameworkAdapter, Prebound};
use crate::error::{AuthError, ValidationError};
use crate::extract::RawData;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::marker::PhantomData;

/// Binding for frameworks that perform schema binding before this layer runs.
///
/// The framework's own extractor has already consumed and validated the
/// body, so the request *is* the typed value. Re-validating would
/// double-fail on legitimate payloads; use
/// [`crate::ValidationPipeline::run_prebound`], which trusts the upstream
/// strictness settings and runs only the post-validator stage.
pub struct PreboundAdapter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> PreboundAdapter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for PreboundAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Serialize> FrameworkAdapter for PreboundAdapter<T> {
    type Request = T;
    type Response = Response;

    /// Reconstruct the field mapping from the already-validated value.
    fn extract(&self, request: &Self::Request) -> Result<RawData, ValidationError> {
        match serde_json::to_value(request) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(ValidationError::new("Unsupported request data type")),
        }
    }

    fn auth_header(&self, _request: &Self::Request) -> Option<String> {
        None
    }

    fn validation_error_response(&self, error: ValidationError) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": {"error": error.message, "details": error.details}
            })),
        )
            .into_response()
    }

    fn auth_error_response(&self, error: AuthError) -> Response {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
        (status, Json(json!({"detail": error.to_string()}))).into_response()
    }
}

impl<T: Clone + Serialize> Prebound<T> for PreboundAdapter<T> {
    fn validated(&self, request: &Self::Request) -> T {
        request.clone()
    }
}
