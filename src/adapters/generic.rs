use crate::adapters::FrameworkAdapter;
use crate::error::{AuthError, GatewayError, ValidationError};
use crate::extract::RawData;
use serde_json::Value;

/// Frameworkless binding: a plain field mapping in, a `Result` out.
///
/// Error conversion hands the failure back to the caller unchanged as `Err`,
/// for callers that want to handle errors themselves. Carries no headers, so
/// guarded routes always see missing credentials.
pub struct GenericAdapter;

impl FrameworkAdapter for GenericAdapter {
    type Request = RawData;
    type Response = Result<Value, GatewayError>;

    fn extract(&self, request: &Self::Request) -> Result<RawData, ValidationError> {
        Ok(request.clone())
    }

    fn auth_header(&self, _request: &Self::Request) -> Option<String> {
        None
    }

    fn validation_error_response(&self, error: ValidationError) -> Self::Response {
        Err(error.into())
    }

    fn auth_error_response(&self, error: AuthError) -> Self::Response {
        Err(error.into())
    }
}
