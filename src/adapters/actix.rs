use crate::adapters::FrameworkAdapter;
use crate::error::{AuthError, ValidationError};
use crate::extract::{self, RawData};
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{web::Bytes, HttpRequest, HttpResponse};
use serde_json::{json, Value};

/// Binding for Actix Web services.
///
/// Takes the request alongside its already-read body bytes, since Actix
/// hands handlers those separately. Validation failures render as 400 with
/// an `{"error", "details"}` body; auth failures as `{"detail"}` with the
/// error's status.
pub struct ActixAdapter;

impl FrameworkAdapter for ActixAdapter {
    type Request = (HttpRequest, Bytes);
    type Response = HttpResponse;

    fn extract(&self, (request, body): &Self::Request) -> Result<RawData, ValidationError> {
        let mut data = RawData::new();

        if !request.query_string().is_empty() {
            let pairs = extract::parse_pairs(request.query_string())
                .map_err(|_| ValidationError::new("Invalid query string"))?;
            extract::overlay(&mut data, extract::collapse(pairs));
        }

        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let form = std::str::from_utf8(body)
                .map_err(|_| ValidationError::new("Invalid form data in request body"))?;
            let pairs = extract::parse_pairs(form)
                .map_err(|_| ValidationError::new("Invalid form data in request body"))?;
            extract::overlay(&mut data, extract::collapse(pairs));
        }

        if content_type.starts_with("application/json") && !body.is_empty() {
            match serde_json::from_slice::<Value>(body) {
                Ok(Value::Object(json_body)) => extract::overlay(&mut data, json_body),
                _ => return Err(ValidationError::new("Invalid JSON in request body")),
            }
        }

        Ok(data)
    }

    fn auth_header(&self, (request, _): &Self::Request) -> Option<String> {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    fn validation_error_response(&self, error: ValidationError) -> HttpResponse {
        HttpResponse::BadRequest().json(json!({
            "error": error.message,
            "details": error.details
        }))
    }

    fn auth_error_response(&self, error: AuthError) -> HttpResponse {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
        HttpResponse::build(status).json(json!({"detail": error.to_string()}))
    }
}
