//! Decoding of the `{success, message, errorCode, ...}` response envelope.
//!
//! A missing `success` field is a failure, same as `success: false`.

use serde_json::{Map, Value};

use crate::error::{ErrorCode, PrintError};

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `success` was truthy. Holds the whole body, `success` included.
    Success(Map<String, Value>),
    Failure { message: String, code: ErrorCode },
}

impl Envelope {
    /// Decode a response body. Fails only when the body is not a JSON object.
    pub fn decode(body: &str) -> Result<Self, PrintError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| PrintError::Decode(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(PrintError::Decode(
                "response body is not a JSON object".to_string(),
            ));
        };

        if map.get("success").is_some_and(is_truthy) {
            return Ok(Envelope::Success(map));
        }

        let message = match map.get("message") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let code = match map.get("errorCode") {
            None | Some(Value::Null) => ErrorCode::default(),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(whole_number))
                .map(ErrorCode::Number)
                .unwrap_or_else(|| ErrorCode::Text(n.to_string())),
            Some(Value::String(s)) => ErrorCode::Text(s.clone()),
            Some(other) => ErrorCode::Text(other.to_string()),
        };
        Ok(Envelope::Failure { message, code })
    }

    pub fn into_result(self) -> Result<Map<String, Value>, PrintError> {
        match self {
            Envelope::Success(body) => Ok(body),
            Envelope::Failure { message, code } => Err(PrintError::Application { message, code }),
        }
    }
}

/// `413.0` is the integer 413; `413.5` or out-of-range values are not.
fn whole_number(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Loose truthiness used for the `success` flag and for deciding whether a
/// request payload is worth sending.
///
/// `false`, `null`, `0`, `0.0`, `""`, `"0"`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
