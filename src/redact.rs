//! Credential redaction for audit payloads.
//!
//! Every JSON payload persisted to audit tables (sync logs, integration
//! logs, webhook events) passes through [`redact_value`] first so bearer
//! tokens and secret-bearing fields never land in storage.

use serde_json::Value as JsonValue;

const REDACTED: &str = "[REDACTED]";

/// Field names whose string values are always replaced wholesale.
const SENSITIVE_KEYS: &[&str] = &[
    "authorization",
    "token",
    "api_token",
    "api_key",
    "secret",
    "password",
    "x-onecode-hook-secret",
];

/// Recursively redacts credential-bearing content from a JSON value.
pub fn redact_value(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => JsonValue::Object(
            map.into_iter()
                .map(|(key, inner)| {
                    if is_sensitive_key(&key) && inner.is_string() {
                        (key, JsonValue::String(REDACTED.to_string()))
                    } else {
                        (key, redact_value(inner))
                    }
                })
                .collect(),
        ),
        JsonValue::Array(items) => {
            JsonValue::Array(items.into_iter().map(redact_value).collect())
        }
        JsonValue::String(s) => JsonValue::String(redact_bearer(&s)),
        other => other,
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|k| lowered == *k)
}

/// Replaces the token following any `Bearer ` marker inside a string.
fn redact_bearer(input: &str) -> String {
    const MARKER: &str = "Bearer ";

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(MARKER) {
        let after = pos + MARKER.len();
        result.push_str(&rest[..after]);

        let tail = &rest[after..];
        let token_len = tail
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
            .unwrap_or(tail.len());
        if token_len > 0 {
            result.push_str(REDACTED);
        }
        rest = &tail[token_len..];
    }
    result.push_str(rest);
    result
}
