use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::errors::RequestError;

pub const INVALID_RESPONSE_FORMAT: &str = "Invalid response format";

/// Every backend reply after normalization, whatever shape it arrived in.
///
/// JSON bodies are parsed as-is (a body that fails to parse becomes
/// `{"message": "Invalid response format"}`); anything else is wrapped as
/// `{"message": <text>, "status": "SUCCESS" | "ERROR"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub ok: bool,
    pub status_code: u16,
    pub body: Value,
    pub message: Option<String>,
}

impl NormalizedResponse {
    pub fn from_parts(status_code: u16, content_type: Option<&str>, raw: &str) -> Self {
        let ok = (200..300).contains(&status_code);
        let is_json = content_type
            .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"));

        let body = if is_json {
            serde_json::from_str(raw).unwrap_or_else(|err| {
                tracing::warn!(status_code, error = %err, "backend sent malformed json.");
                json!({ "message": INVALID_RESPONSE_FORMAT })
            })
        } else {
            json!({
                "message": raw,
                "status": if ok { "SUCCESS" } else { "ERROR" },
            })
        };
        let message = extract_message(&body);

        Self {
            ok,
            status_code,
            body,
            message,
        }
    }

    // Non-success statuses become a RequestError carrying the best message available.
    pub fn into_result(self) -> Result<Self, RequestError> {
        if self.ok {
            return Ok(self);
        }
        let message = self
            .message
            .unwrap_or_else(|| format!("HTTP error: {}", self.status_code));
        Err(RequestError::upstream(self.status_code, message))
    }

    // The `data` member of a `{status, message, data}` envelope, or the whole body.
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&self.body)
    }

    // List payloads arrive either as a bare array or as a page with `content`.
    pub fn items(&self) -> Vec<Value> {
        match self.data() {
            Value::Array(items) => items.clone(),
            other => other
                .get("content")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn is_success(&self) -> bool {
        if let Some(status) = self.body.get("status").and_then(Value::as_str) {
            return status.eq_ignore_ascii_case("SUCCESS");
        }
        if let Some(success) = self.body.get("success").and_then(Value::as_bool) {
            return success;
        }
        self.ok
    }

    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        decode(self.status_code, self.data())
    }

    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        decode(self.status_code, &self.body)
    }
}

fn decode<T: DeserializeOwned>(status_code: u16, value: &Value) -> Result<T, RequestError> {
    T::deserialize(value).map_err(|err| {
        tracing::warn!(status_code, error = %err, "response did not match the expected shape.");
        RequestError::upstream(status_code, INVALID_RESPONSE_FORMAT)
    })
}

fn extract_message(body: &Value) -> Option<String> {
    let text = match body {
        Value::String(text) => Some(text.as_str()),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .or_else(|| other.get("error").and_then(Value::as_str)),
    };
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json;charset=UTF-8");

    #[test]
    fn when_body_is_an_envelope_then_data_is_unchanged() {
        let raw = r#"{"status":"SUCCESS","message":"ok","data":[{"id":1},{"id":2,"tags":["ac"]}]}"#;

        let response = NormalizedResponse::from_parts(200, JSON, raw);

        assert!(response.is_success());
        assert_eq!(response.data(), &json!([{"id": 1}, {"id": 2, "tags": ["ac"]}]));
        assert_eq!(response.message.as_deref(), Some("ok"));
    }

    #[test]
    fn when_json_is_malformed_then_substitutes_invalid_format_message() {
        let response = NormalizedResponse::from_parts(200, JSON, "{\"status\":");

        assert_eq!(response.body, json!({"message": INVALID_RESPONSE_FORMAT}));
        assert!(response.into_result().is_ok());
    }

    #[test]
    fn when_body_is_plain_text_then_wraps_with_status() {
        let ok = NormalizedResponse::from_parts(200, Some("text/plain"), "Ride cancelled");
        let failed = NormalizedResponse::from_parts(409, None, "Ride already started");

        assert_eq!(ok.body, json!({"message": "Ride cancelled", "status": "SUCCESS"}));
        assert_eq!(failed.body, json!({"message": "Ride already started", "status": "ERROR"}));
    }

    #[test]
    fn when_status_is_failure_then_error_carries_extracted_message() {
        let response = NormalizedResponse::from_parts(
            400,
            JSON,
            r#"{"status":"ERROR","message":"Not enough seats available"}"#,
        );

        let err = response.into_result().expect_err("expected failure");

        assert_eq!(err, RequestError::upstream(400, "Not enough seats available"));
    }

    #[test]
    fn when_failure_has_no_message_then_falls_back_to_http_status() {
        let text = NormalizedResponse::from_parts(502, Some("text/html"), "");
        let json_body = NormalizedResponse::from_parts(500, JSON, r#"{"timestamp":"now"}"#);

        assert_eq!(
            text.into_result().expect_err("expected failure").message,
            "HTTP error: 502"
        );
        assert_eq!(
            json_body.into_result().expect_err("expected failure").message,
            "HTTP error: 500"
        );
    }

    #[test]
    fn when_spring_error_body_has_blank_message_then_uses_error_field() {
        let response = NormalizedResponse::from_parts(
            403,
            JSON,
            r#"{"status":403,"error":"Forbidden","message":""}"#,
        );

        assert_eq!(response.message.as_deref(), Some("Forbidden"));
    }

    #[test]
    fn when_body_is_a_json_string_then_it_becomes_the_message() {
        let response = NormalizedResponse::from_parts(401, JSON, r#""Token expired""#);

        assert_eq!(response.message.as_deref(), Some("Token expired"));
    }

    #[test]
    fn when_list_is_paged_or_bare_then_items_unwraps_both() {
        let paged = NormalizedResponse::from_parts(
            200,
            JSON,
            r#"{"status":"SUCCESS","data":{"content":[{"id":1}],"totalElements":1}}"#,
        );
        let bare = NormalizedResponse::from_parts(200, JSON, r#"{"status":"SUCCESS","data":[{"id":2}]}"#);

        assert_eq!(paged.items(), vec![json!({"id": 1})]);
        assert_eq!(bare.items(), vec![json!({"id": 2})]);
    }

    #[test]
    fn when_envelope_uses_success_flag_then_is_success_reads_it() {
        let response =
            NormalizedResponse::from_parts(200, JSON, r#"{"success":false,"message":"No payments"}"#);

        assert!(!response.is_success());
    }
}
