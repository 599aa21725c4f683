use serde::Serialize;
use serde_json::Value;

/// A single offending field, reported with its path and a human-readable message.
///
/// A validation failure carries one `FieldError` per offending field, in
/// detection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Formats raw field errors into the detail records attached to a
/// [`ValidationError`].
///
/// The default formatter ([`default_formatter`]) passes errors through as
/// `{"path", "message"}` objects.
pub type ErrorFormatter = Box<dyn Fn(&[FieldError]) -> Vec<Value> + Send + Sync>;

/// Identity formatter: one `{"path", "message"}` record per field error.
pub fn default_formatter(errors: &[FieldError]) -> Vec<Value> {
    errors
        .iter()
        .map(|e| serde_json::json!({"path": e.path, "message": e.message}))
        .collect()
}

/// A rejected request payload.
///
/// Carries a human-readable message and a `details` sequence produced by the
/// active error formatter. Always delivered to the adapter's converter or the
/// caller, never silently swallowed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub details: Vec<Value>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(message: impl Into<String>, details: Vec<Value>) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }

    /// Build a validation error from raw field errors via a formatter.
    pub fn from_field_errors(
        message: impl Into<String>,
        errors: &[FieldError],
        formatter: &ErrorFormatter,
    ) -> Self {
        Self {
            message: message.into(),
            details: formatter(errors),
        }
    }
}

/// An authentication or authorization failure.
///
/// Every variant maps to a fixed HTTP status: 401 for missing, malformed,
/// invalid, or expired credentials, 403 for a valid token whose role is not
/// permitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is missing or invalid")]
    MissingCredentials,

    #[error("Invalid token format")]
    MalformedToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    Expired,

    #[error("You do not have permission to access this resource")]
    Forbidden,

    #[error("Could not create token")]
    Issuance,
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials | Self::MalformedToken | Self::InvalidToken | Self::Expired => {
                401
            }
            Self::Forbidden => 403,
            Self::Issuance => 500,
        }
    }
}

/// Union of the two pipeline failure kinds, used by adapters that hand errors
/// back to the caller instead of rendering a response.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_status_codes() {
        assert_eq!(AuthError::MissingCredentials.status_code(), 401);
        assert_eq!(AuthError::MalformedToken.status_code(), 401);
        assert_eq!(AuthError::Expired.status_code(), 401);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
    }

    #[test]
    fn auth_error_messages_match_response_contract() {
        assert_eq!(
            AuthError::MissingCredentials.to_string(),
            "Authorization header is missing or invalid"
        );
        assert_eq!(
            AuthError::Forbidden.to_string(),
            "You do not have permission to access this resource"
        );
    }

    #[test]
    fn default_formatter_preserves_order() {
        let errors = vec![
            FieldError::new("age", "field required"),
            FieldError::new("email", "field required"),
        ];
        let details = default_formatter(&errors);
        assert_eq!(details[0]["path"], "age");
        assert_eq!(details[1]["path"], "email");
    }
}
