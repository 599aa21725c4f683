//! Stock pre-validators for common raw-data cleanup.
//!
//! Pre-validators run field-by-field over the raw mapping before schema
//! validation. All of these are idempotent: applying one twice yields the
//! same result as applying it once.

use crate::error::ValidationError;
use crate::extract::RawData;
use serde_json::Value;

/// Trim and lowercase the `email` field, if present and a string.
pub fn normalize_email(mut data: RawData) -> Result<RawData, ValidationError> {
    if let Some(Value::String(email)) = data.get_mut("email") {
        *email = email.trim().to_lowercase();
    }
    Ok(data)
}

/// Trim surrounding whitespace from every top-level string value.
pub fn sanitize_strings(mut data: RawData) -> Result<RawData, ValidationError> {
    for value in data.values_mut() {
        if let Value::String(s) = value {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawData {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let data = normalize_email(raw(json!({"email": "  TEST@Email.Com  "}))).unwrap();
        assert_eq!(data["email"], json!("test@email.com"));
    }

    #[test]
    fn normalize_email_is_idempotent() {
        let once = normalize_email(raw(json!({"email": "  TEST@Email.Com  "}))).unwrap();
        let twice = normalize_email(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_email_ignores_missing_or_non_string() {
        let data = normalize_email(raw(json!({"name": "alice"}))).unwrap();
        assert_eq!(data["name"], json!("alice"));

        let data = normalize_email(raw(json!({"email": 42}))).unwrap();
        assert_eq!(data["email"], json!(42));
    }

    #[test]
    fn sanitize_strings_trims_all_string_fields() {
        let data = sanitize_strings(raw(json!({
            "name": "  alice  ",
            "message": "\thello\n",
            "count": 3
        })))
        .unwrap();
        assert_eq!(data["name"], json!("alice"));
        assert_eq!(data["message"], json!("hello"));
        assert_eq!(data["count"], json!(3));
    }
}
