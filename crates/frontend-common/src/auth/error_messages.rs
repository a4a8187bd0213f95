//! Error message extraction
//!
//! Turns a failed response into a single human-readable message, trying
//! in order: the envelope's `message` field, a domain-specific extractor
//! over the parsed body, the raw response text, then a fixed fallback.

use garage_http::ApiEnvelope;
use serde_json::Value;

/// Message shown when nothing usable can be extracted.
pub const GENERIC_ERROR: &str = "An unexpected error occurred";

/// Domain-specific message extractor applied to a parsed failure body.
pub type DomainExtractor = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// Extract the message to surface for a failed call.
pub fn extract_error_message(
    raw: &str,
    envelope: Option<&ApiEnvelope>,
    extractor: Option<&DomainExtractor>,
) -> String {
    if let Some(message) = envelope.and_then(|e| e.message.as_deref()) {
        if !message.trim().is_empty() {
            return message.to_string();
        }
    }

    if let Some(extract) = extractor {
        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            if let Some(message) = extract(&value) {
                return message;
            }
        }
    }

    if !raw.trim().is_empty() {
        return raw.to_string();
    }
    GENERIC_ERROR.to_string()
}

/// Default extractor for garage API failure bodies: a direct `error`
/// field from the web controllers, then `message`, then `errorMessage`
/// with an embedded JSON fragment unwrapped when one is present.
pub fn garage_error_extractor(body: &Value) -> Option<String> {
    if let Some(error) = non_empty_str(body.get("error")) {
        return Some(error.to_string());
    }
    if let Some(message) = non_empty_str(body.get("message")) {
        return Some(message.to_string());
    }

    let relayed = non_empty_str(body.get("errorMessage"))?;
    // The API layer relays upstream failures as
    // "API Error: BadRequest - {...}"; prefer the inner message.
    if let Some(fragment) = embedded_json(relayed) {
        if let Ok(inner) = serde_json::from_str::<Value>(fragment) {
            if let Some(message) = non_empty_str(inner.get("message")) {
                return Some(message.to_string());
            }
        }
    }
    Some(relayed.to_string())
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn embedded_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
