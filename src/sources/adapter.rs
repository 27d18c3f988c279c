//! Field mappings from raw stored shapes to [`FeedbackRecord`].
//!
//! Each page of the site stored submissions with its own field names.
//! A [`FieldMapping`] lists, per canonical field, the raw keys to try in
//! order, so one normalization routine serves every shape.

use crate::analysis::window::parse_timestamp;
use crate::models::FeedbackRecord;
use crate::sources::extract::extract_embedded;
use serde_json::{Map, Value};
use tracing::debug;

/// Message used by the AI-files form, which stores no message of its own.
pub const AI_FILES_DEFAULT_MESSAGE: &str = "agentbase inbound";

/// How to read one raw record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub email_keys: Vec<String>,
    pub message_keys: Vec<String>,
    pub timestamp_keys: Vec<String>,
    pub rating_keys: Vec<String>,
    pub source_keys: Vec<String>,
    /// Message used when none of `message_keys` is present.
    pub default_message: Option<String>,
    /// Source tag used when none of `source_keys` is present.
    pub default_source: Option<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl FieldMapping {
    /// Records saved by the AI-files request form: `{email, ts}`.
    pub fn ai_file_requests() -> Self {
        Self {
            email_keys: keys(&["email"]),
            message_keys: keys(&["message"]),
            timestamp_keys: keys(&["ts", "timestamp"]),
            rating_keys: Vec::new(),
            source_keys: Vec::new(),
            default_message: Some(AI_FILES_DEFAULT_MESSAGE.to_string()),
            default_source: Some("localStorage".to_string()),
        }
    }

    /// Records saved by the feedback widget.
    pub fn feedback_data() -> Self {
        Self {
            email_keys: keys(&["email"]),
            message_keys: keys(&["message", "text"]),
            timestamp_keys: keys(&["timestamp", "ts", "created_at"]),
            rating_keys: keys(&["rating"]),
            source_keys: keys(&["source", "type"]),
            default_message: None,
            default_source: None,
        }
    }

    /// Records returned by the remote feedback endpoint.
    pub fn remote() -> Self {
        Self {
            email_keys: keys(&["email"]),
            message_keys: keys(&["message", "text"]),
            timestamp_keys: keys(&["timestamp", "created_at", "ts"]),
            rating_keys: keys(&["rating"]),
            source_keys: keys(&["source", "type"]),
            default_message: None,
            default_source: Some("feedback".to_string()),
        }
    }

    /// Normalize one raw record.
    ///
    /// Returns `None` for non-objects and for records without a parsable
    /// timestamp.
    pub fn normalize(&self, raw: &Value) -> Option<FeedbackRecord> {
        let obj = raw.as_object()?;

        let Some(timestamp) = first_present(obj, &self.timestamp_keys).and_then(parse_timestamp)
        else {
            debug!("Skipping record without a usable timestamp");
            return None;
        };

        let mut email = first_string(obj, &self.email_keys);
        let mut message = first_string(obj, &self.message_keys);
        let mut rating = first_present(obj, &self.rating_keys).and_then(parse_rating);

        let embedded = message
            .as_deref()
            .map(extract_embedded)
            .unwrap_or_default();
        if !embedded.is_empty() {
            email = email.or(embedded.email);
            rating = rating.or(embedded.rating);
            if embedded.message.is_some() {
                message = embedded.message;
            }
        }

        let message = message
            .or_else(|| self.default_message.clone())
            .unwrap_or_default();
        let source = first_string(obj, &self.source_keys).or_else(|| self.default_source.clone());

        Some(FeedbackRecord {
            email,
            message,
            timestamp,
            rating,
            source,
        })
    }
}

/// First key whose value is present and not null.
fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[String]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(k))
        .find(|v| !v.is_null())
}

/// First key holding a non-empty string.
fn first_string(obj: &Map<String, Value>, keys: &[String]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// Ratings are integers 0..=5; numeric strings are accepted.
fn parse_rating(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    if n <= 5 {
        Some(n as u8)
    } else {
        debug!("Ignoring out-of-range rating {}", n);
        None
    }
}
