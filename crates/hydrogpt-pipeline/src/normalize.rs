//! Response normalization
//!
//! Coerces whatever the model returns into the envelope contract. A reply
//! that parses as a JSON object passes through with a stamped timestamp;
//! anything else is a normal, expected outcome and wraps into the fallback
//! envelope. No error leaves this module.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Two-branch parse result for a model reply
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// Reply text was a well-formed JSON object
    Structured(Map<String, Value>),
    /// Anything else: free text, arrays, malformed JSON
    Raw(String),
}

impl ModelReply {
    /// Classify raw reply text. Only a top-level JSON object counts as
    /// structured; fields the model did not emit stay absent.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self::Structured(map),
            _ => Self::Raw(text.to_string()),
        }
    }

    /// Convert into the response envelope, stamping the given time.
    pub fn into_envelope(self, now: DateTime<Utc>) -> Value {
        match self {
            Self::Structured(mut map) => {
                map.insert("timestamp".to_string(), Value::String(stamp(now)));
                Value::Object(map)
            }
            Self::Raw(text) => raw_envelope(text, now),
        }
    }
}

/// Fallback envelope carrying plain text and explicit null instructions
pub fn raw_envelope(text: impl Into<String>, now: DateTime<Utc>) -> Value {
    json!({
        "text_response": text.into(),
        "map_instructions": null,
        "chart_instructions": null,
        "timestamp": stamp(now),
    })
}

fn stamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_structured_reply_passes_through_with_timestamp() {
        let reply = ModelReply::parse(
            r#"{"text_response": "Makima is Very Weak", "query_type": "location_specific_analysis", "confidence_level": "high"}"#,
        );
        let envelope = reply.into_envelope(now());

        assert_eq!(envelope["text_response"], "Makima is Very Weak");
        assert_eq!(envelope["query_type"], "location_specific_analysis");
        assert_eq!(envelope["confidence_level"], "high");
        assert_eq!(envelope["timestamp"], "2025-06-01T12:00:00Z");
        // Absent optional fields stay absent, not defaulted.
        assert!(envelope.get("map_instructions").is_none());
        assert!(envelope.get("proactive_suggestions").is_none());
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let reply = ModelReply::parse(
            r#"{"text_response": "ok", "database_query_needed": false}"#,
        );
        let envelope = reply.into_envelope(now());
        assert_eq!(envelope["database_query_needed"], false);
    }

    #[test]
    fn test_free_text_wraps_into_fallback() {
        let reply = ModelReply::parse("The worst area is Makima at 0.968.");
        let envelope = reply.into_envelope(now());

        assert_eq!(envelope["text_response"], "The worst area is Makima at 0.968.");
        assert_eq!(envelope["map_instructions"], Value::Null);
        assert_eq!(envelope["chart_instructions"], Value::Null);
        assert_eq!(envelope["timestamp"], "2025-06-01T12:00:00Z");
    }

    #[test]
    fn test_truncated_json_is_raw() {
        let text = r#"{"text_response": "cut off"#;
        assert_eq!(ModelReply::parse(text), ModelReply::Raw(text.to_string()));
    }

    #[test]
    fn test_non_object_json_is_raw() {
        assert!(matches!(ModelReply::parse("[1, 2, 3]"), ModelReply::Raw(_)));
        assert!(matches!(ModelReply::parse("42"), ModelReply::Raw(_)));
        assert!(matches!(ModelReply::parse("\"quoted\""), ModelReply::Raw(_)));
    }
}
