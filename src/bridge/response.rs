//! Reply interpretation policies.
//!
//! The transport acknowledgement is callback-shaped: every emission carries
//! a trailing callback invoked with positional arguments. The two policies
//! here turn those arguments into a settled outcome. The policy is chosen
//! once per relay at construction and applies to every emission.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelayError;

/// Redirect codes treated as success alongside 2xx.
const REDIRECT_SUCCESS: [i64; 3] = [301, 302, 307];

/// How trailing acknowledgement arguments are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Node-style `(error, result)` pair: a truthy error rejects with that
    /// error, anything else resolves with the result.
    #[default]
    Raw,

    /// Single response object carrying a `statusCode` field and an optional
    /// `data` payload, classified by HTTP status semantics.
    Http,
}

impl ResponseMode {
    /// Turns raw acknowledgement arguments into a settled outcome.
    pub(crate) fn interpret(self, reply: Vec<Value>) -> Result<Value, RelayError> {
        match self {
            Self::Raw => interpret_raw(reply),
            Self::Http => interpret_http(reply),
        }
    }
}

/// `(error, result)` convention. Missing positions are treated as null.
fn interpret_raw(reply: Vec<Value>) -> Result<Value, RelayError> {
    let mut args = reply.into_iter();
    let error = args.next().unwrap_or(Value::Null);
    let result = args.next().unwrap_or(Value::Null);
    if is_truthy(&error) {
        Err(RelayError::Upstream(error))
    } else {
        Ok(result)
    }
}

/// Single-response-object convention with HTTP status classification.
///
/// 2xx and the conventional redirects (301, 302, 307) resolve through the
/// data-unwrapping rule. Other 3xx codes resolve the same way but are
/// logged, since transports are not expected to produce them. Everything
/// else rejects with the canonical status text.
fn interpret_http(reply: Vec<Value>) -> Result<Value, RelayError> {
    let response = reply.into_iter().next().unwrap_or(Value::Null);
    let Some(code) = status_code_of(&response) else {
        return Err(RelayError::MalformedResponse { response });
    };
    if (200..300).contains(&code) || REDIRECT_SUCCESS.contains(&code) {
        return unwrap_data(response);
    }
    if (300..400).contains(&code) {
        tracing::warn!(code, "non-standard redirect status treated as success");
        return unwrap_data(response);
    }
    Err(RelayError::from_status(code, response))
}

/// Extracts the status code from a response object. Accepts a JSON number
/// or a numeric string.
fn status_code_of(response: &Value) -> Option<i64> {
    match response.get("statusCode")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolves with `response["data"]` when the key is present (a JSON null
/// counts as present). A success status without a payload is still a
/// rejection.
fn unwrap_data(mut response: Value) -> Result<Value, RelayError> {
    match response.get_mut("data").map(Value::take) {
        Some(data) => Ok(data),
        None => Err(RelayError::DataUndefined { response }),
    }
}

/// JS-style truthiness for JSON values: null, `false`, numeric zero, and
/// the empty string are falsy; everything else, including empty arrays and
/// objects, is truthy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_resolves_with_result_on_null_error() {
        let outcome = ResponseMode::Raw.interpret(vec![Value::Null, json!({"value": 42})]);
        let Ok(value) = outcome else {
            panic!("expected resolution");
        };
        assert_eq!(value, json!({"value": 42}));
    }

    #[test]
    fn raw_rejects_with_truthy_error_verbatim() {
        let outcome = ResponseMode::Raw.interpret(vec![json!("boom"), json!({"value": 42})]);
        let Err(RelayError::Upstream(error)) = outcome else {
            panic!("expected upstream rejection");
        };
        assert_eq!(error, json!("boom"));
    }

    #[test]
    fn raw_treats_missing_arguments_as_null() {
        let Ok(value) = ResponseMode::Raw.interpret(vec![]) else {
            panic!("expected resolution");
        };
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn http_success_resolves_with_data() {
        let reply = vec![json!({"statusCode": 200, "data": {"ok": true}})];
        let Ok(value) = ResponseMode::Http.interpret(reply) else {
            panic!("expected resolution");
        };
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn http_success_without_data_rejects() {
        let reply = vec![json!({"statusCode": 200})];
        let Err(RelayError::DataUndefined { response }) = ResponseMode::Http.interpret(reply)
        else {
            panic!("expected data-undefined rejection");
        };
        assert_eq!(response, json!({"statusCode": 200}));
    }

    #[test]
    fn http_null_data_counts_as_present() {
        let reply = vec![json!({"statusCode": "204", "data": null})];
        let Ok(value) = ResponseMode::Http.interpret(reply) else {
            panic!("expected resolution");
        };
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn http_redirects_resolve() {
        for code in [301, 302, 307] {
            let reply = vec![json!({"statusCode": code, "data": "moved"})];
            let Ok(value) = ResponseMode::Http.interpret(reply) else {
                panic!("expected resolution for {code}");
            };
            assert_eq!(value, json!("moved"));
        }
    }

    #[test]
    fn http_nonstandard_3xx_resolves_through_unwrapping() {
        let reply = vec![json!({"statusCode": 304, "data": "cached"})];
        let Ok(value) = ResponseMode::Http.interpret(reply) else {
            panic!("expected resolution");
        };
        assert_eq!(value, json!("cached"));
    }

    #[test]
    fn http_error_status_rejects_with_reason_phrase() {
        let reply = vec![json!({"statusCode": 404})];
        let Err(RelayError::Status {
            code,
            text,
            response,
        }) = ResponseMode::Http.interpret(reply)
        else {
            panic!("expected status rejection");
        };
        assert_eq!(code, 404);
        assert_eq!(text, "Not Found");
        assert_eq!(response, json!({"statusCode": 404}));
    }

    #[test]
    fn http_informational_status_rejects() {
        let reply = vec![json!({"statusCode": 101, "data": "x"})];
        let Err(RelayError::Status { code, .. }) = ResponseMode::Http.interpret(reply) else {
            panic!("expected status rejection");
        };
        assert_eq!(code, 101);
    }

    #[test]
    fn http_without_status_code_is_malformed() {
        for raw in [json!({"data": 1}), Value::Null, json!({"statusCode": true})] {
            let outcome = ResponseMode::Http.interpret(vec![raw.clone()]);
            let Err(RelayError::MalformedResponse { response }) = outcome else {
                panic!("expected malformed rejection");
            };
            assert_eq!(response, raw);
        }
    }

    #[test]
    fn truthiness_follows_js_semantics() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("x"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }
}
