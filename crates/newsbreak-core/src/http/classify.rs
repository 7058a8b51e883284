//! Classification of upstream responses into a single normalized outcome
//!
//! NewsBreak responses are not uniformly shaped: errors arrive as HTTP
//! statuses, as `code`/`errMsg` envelopes under HTTP 200, and as
//! timestamp/url error pages also under HTTP 200. The ordered probes below
//! were transcribed from observed upstream behavior. The order is
//! load-bearing: status-based detection always wins, the `code` field beats
//! the timestamp/url shape, and anything left is optimistically data. Do
//! not reorganize it.

use serde_json::Value;

use crate::error::{Error, Result};

/// How much of a non-JSON error body makes it into the message
const RAW_BODY_SNIPPET_CHARS: usize = 200;

/// Normalized outcome of one dispatched request. Exactly one variant.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A response the classifier accepts as valid data
    Success { payload: Value },
    /// The upstream processed and rejected the request
    Api {
        code: i64,
        message: String,
        raw: Option<Value>,
    },
    /// No HTTP response was obtained on any attempt
    Transport { attempts: u32, message: String },
}

impl Outcome {
    /// Map onto the crate error taxonomy for callers that want `?`
    pub fn into_result(self) -> Result<Value> {
        match self {
            Outcome::Success { payload } => Ok(payload),
            Outcome::Api { code, message, raw } => Err(Error::Api { code, message, raw }),
            Outcome::Transport { attempts, message } => {
                Err(Error::MaxRetriesExceeded { attempts, message })
            }
        }
    }
}

/// Classify one obtained HTTP response
pub fn classify(status: u16, body: &str) -> Outcome {
    // Bad HTTP status overrides anything the body claims
    if status >= 400 {
        return classify_http_error(status, body);
    }

    // A success status with a non-JSON body is an upstream protocol
    // violation, surfaced as an API error rather than data
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return Outcome::Api {
                code: i64::from(status),
                message: "invalid response body".to_string(),
                raw: None,
            };
        }
    };

    // Standard envelope: `code` 0 is success, anything else is a rejection
    if let Some(code_field) = parsed.get("code") {
        let code = code_field.as_i64().unwrap_or(-1);
        if code != 0 {
            let message = parsed
                .get("errMsg")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            return Outcome::Api {
                code,
                message,
                raw: Some(parsed),
            };
        }
        return Outcome::Success { payload: parsed };
    }

    // timestamp + url without `code` is empirically an error page served
    // with a success status. Undocumented upstream behavior; log every hit
    // so the trigger conditions can be refined later.
    if parsed.get("timestamp").is_some() && parsed.get("url").is_some() {
        let base_message = parsed
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| parsed.get("error").and_then(Value::as_str))
            .unwrap_or("API returned error response");
        let timestamp = display_field(&parsed["timestamp"]);
        log::warn!(
            "error-page shape under HTTP {} (url: {}, timestamp: {})",
            status,
            display_field(&parsed["url"]),
            timestamp,
        );
        return Outcome::Api {
            code: i64::from(status),
            message: format!("{} (timestamp: {})", base_message, timestamp),
            raw: Some(parsed),
        };
    }

    // No recognized error shape and no `code` field: treat as valid data
    Outcome::Success { payload: parsed }
}

/// Classify a response with an HTTP error status
fn classify_http_error(status: u16, body: &str) -> Outcome {
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => {
            // Message fields in priority order, with the status as fallback
            let message = parsed
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| parsed.get("errMsg").and_then(Value::as_str))
                .or_else(|| parsed.get("error").and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status));
            Outcome::Api {
                code: i64::from(status),
                message,
                raw: Some(parsed),
            }
        }
        Err(_) => {
            let snippet: String = body.chars().take(RAW_BODY_SNIPPET_CHARS).collect();
            Outcome::Api {
                code: i64::from(status),
                message: format!("HTTP {}: {}", status, snippet),
                raw: None,
            }
        }
    }
}

/// Render a JSON field the way it should read inside a message
fn display_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
