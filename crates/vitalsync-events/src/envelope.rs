//! Envelope codec for the named-event wire format.
//!
//! Every transport message is a single JSON text frame holding an event
//! name and its payload. The codec enforces a size ceiling in both
//! directions so a misbehaving peer cannot balloon memory.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum encoded envelope size (64 KiB).
pub const MAX_ENVELOPE_SIZE: usize = 64 * 1024;

/// Errors that can occur during envelope encoding/decoding.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Encoded envelope exceeds maximum size.
    #[error("Envelope size {0} exceeds maximum {MAX_ENVELOPE_SIZE}")]
    TooLarge(usize),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A named event with its payload.
///
/// `data` defaults to JSON null for payload-less events such as the
/// liveness probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name, matched exactly by both peers.
    pub event: String,
    /// Event payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Create a new envelope.
    #[must_use]
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Create an envelope with no payload.
    #[must_use]
    pub fn bare(event: impl Into<String>) -> Self {
        Self::new(event, serde_json::Value::Null)
    }
}

/// Encode an envelope to its JSON text form.
///
/// # Errors
///
/// Returns an error if the envelope is too large or serialization fails.
pub fn encode(envelope: &Envelope) -> Result<String, EnvelopeError> {
    let text = serde_json::to_string(envelope)?;

    if text.len() > MAX_ENVELOPE_SIZE {
        return Err(EnvelopeError::TooLarge(text.len()));
    }

    Ok(text)
}

/// Decode an envelope from JSON text.
///
/// # Errors
///
/// Returns an error if the text is too large or not a valid envelope.
pub fn decode(text: &str) -> Result<Envelope, EnvelopeError> {
    if text.len() > MAX_ENVELOPE_SIZE {
        return Err(EnvelopeError::TooLarge(text.len()));
    }

    let envelope = serde_json::from_str(text)?;
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_decode_roundtrip() {
        let envelopes = vec![
            Envelope::new("track_activity", json!({"type": "click", "element": "button"})),
            Envelope::new("search_suggestions", json!({"query": "sleep"})),
            Envelope::bare("health_check"),
        ];

        for envelope in envelopes {
            let encoded = encode(&envelope).unwrap();
            let decoded = decode(&encoded).unwrap();
            assert_eq!(envelope, decoded);
        }
    }

    #[test]
    fn test_bare_envelope_omits_data() {
        let encoded = encode(&Envelope::bare("health_check")).unwrap();
        assert_eq!(encoded, r#"{"event":"health_check"}"#);
    }

    #[test]
    fn test_decode_missing_data_defaults_to_null() {
        let decoded = decode(r#"{"event":"health_check"}"#).unwrap();
        assert_eq!(decoded.data, serde_json::Value::Null);
    }

    #[test]
    fn test_decode_malformed() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"data": {}}"#).is_err());
    }

    #[test]
    fn test_envelope_too_large() {
        let big = "x".repeat(MAX_ENVELOPE_SIZE);
        let envelope = Envelope::new("track_activity", serde_json::Value::String(big));

        match encode(&envelope) {
            Err(EnvelopeError::TooLarge(_)) => {}
            other => panic!("Expected TooLarge error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_too_large() {
        let text = format!(r#"{{"event":"x","data":"{}"}}"#, "y".repeat(MAX_ENVELOPE_SIZE));
        match decode(&text) {
            Err(EnvelopeError::TooLarge(_)) => {}
            other => panic!("Expected TooLarge error, got {:?}", other),
        }
    }
}
