use crate::adapters::FrameworkAdapter;
use crate::error::{AuthError, ValidationError};
use crate::extract::{self, RawData};
use axum::body::Bytes;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

/// Binding for Axum services.
///
/// Works over a buffered request (see [`buffer_request`]) so extraction never
/// suspends. Validation failures render as 422 with a `{"message",
/// "details"}` body; auth failures as `{"detail"}` with the error's status.
pub struct AxumAdapter;

impl FrameworkAdapter for AxumAdapter {
    type Request = Request<Bytes>;
    type Response = Response;

    fn extract(&self, request: &Self::Request) -> Result<RawData, ValidationError> {
        let mut data = RawData::new();

        if let Some(query) = request.uri().query() {
            let pairs = extract::parse_pairs(query)
                .map_err(|_| ValidationError::new("Invalid query string"))?;
            extract::overlay(&mut data, extract::collapse(pairs));
        }

        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let body = std::str::from_utf8(request.body())
                .map_err(|_| ValidationError::new("Invalid form data in request body"))?;
            let pairs = extract::parse_pairs(body)
                .map_err(|_| ValidationError::new("Invalid form data in request body"))?;
            extract::overlay(&mut data, extract::collapse(pairs));
        }

        if content_type.starts_with("application/json") && !request.body().is_empty() {
            match serde_json::from_slice::<Value>(request.body()) {
                Ok(Value::Object(body)) => extract::overlay(&mut data, body),
                _ => return Err(ValidationError::new("Invalid JSON format in request body")),
            }
        }

        Ok(data)
    }

    fn auth_header(&self, request: &Self::Request) -> Option<String> {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    fn validation_error_response(&self, error: ValidationError) -> Response {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": error.message, "details": error.details})),
        )
            .into_response()
    }

    fn auth_error_response(&self, error: AuthError) -> Response {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
        (status, Json(json!({"detail": error.to_string()}))).into_response()
    }
}

/// Buffer an incoming Axum request body so [`AxumAdapter`] can read it
/// synchronously. On a body read failure the caller gets a ready-made 422
/// response to return as-is.
pub async fn buffer_request(
    request: axum::extract::Request,
    limit: usize,
) -> Result<Request<Bytes>, Response> {
    let (parts, body) = request.into_parts();
    match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => Ok(Request::from_parts(parts, bytes)),
        Err(_) => Err(AxumAdapter
            .validation_error_response(ValidationError::new("Unable to read request body"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(
        query: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> Request<Bytes> {
        let uri = match query {
            Some(q) => format!("/test?{}", q),
            None => "/test".to_string(),
        };
        let mut builder = Request::builder().uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Bytes::from(body.to_string())).unwrap()
    }

    #[test]
    fn json_body_overrides_query() {
        let req = request(
            Some("name=from-query&page=2"),
            Some("application/json"),
            r#"{"name": "from-json"}"#,
        );
        let data = AxumAdapter.extract(&req).unwrap();
        assert_eq!(data["name"], json!("from-json"));
        assert_eq!(data["page"], json!("2"));
    }

    #[test]
    fn form_body_overrides_query() {
        let req = request(
            Some("name=from-query"),
            Some("application/x-www-form-urlencoded"),
            "name=from-form&tag=a&tag=b",
        );
        let data = AxumAdapter.extract(&req).unwrap();
        assert_eq!(data["name"], json!("from-form"));
        assert_eq!(data["tag"], json!(["a", "b"]));
    }

    #[test]
    fn malformed_json_body_is_rejected() {
        let req = request(None, Some("application/json"), "{not json");
        let err = AxumAdapter.extract(&req).unwrap_err();
        assert_eq!(err.message, "Invalid JSON format in request body");
    }

    #[test]
    fn non_object_json_body_is_rejected() {
        let req = request(None, Some("application/json"), "[1, 2, 3]");
        assert!(AxumAdapter.extract(&req).is_err());
    }

    #[test]
    fn empty_request_extracts_empty_mapping() {
        let req = request(None, None, "");
        assert!(AxumAdapter.extract(&req).unwrap().is_empty());
    }

    #[test]
    fn auth_header_roundtrip() {
        let req = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer abc")
            .body(Bytes::new())
            .unwrap();
        assert_eq!(AxumAdapter.auth_header(&req).as_deref(), Some("Bearer abc"));
    }
}
