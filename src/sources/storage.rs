//! Local key-value storage of submitted records.
//!
//! The site kept submissions in browser storage: string keys mapping to
//! serialized JSON arrays. On disk this is a JSON object whose values are
//! either those serialized strings or the JSON values themselves.

use super::adapter::FieldMapping;
use super::RecordSource;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Key written by the AI-files request form.
pub const AI_FILE_REQUESTS_KEY: &str = "ai_file_requests";

/// Key written by the feedback widget.
pub const FEEDBACK_DATA_KEY: &str = "feedback_data";

/// Read-only view of a string key-value store.
pub trait KeyValueStore {
    /// Stored string for `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;
}

impl KeyValueStore for HashMap<String, String> {
    fn get_item(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Store backed by a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore {
    entries: Map<String, Value>,
}

impl JsonFileStore {
    /// Load a store from `path`.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// also an empty store, with a warning.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("No storage file at {}", path.display());
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read storage file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        Self::from_json(&content).unwrap_or_else(|| {
            warn!(
                "Storage file {} is not a JSON object, treating as empty",
                path.display()
            );
            Self::default()
        })
    }

    /// Build a store from JSON text; `None` unless the top level is an object.
    pub fn from_json(content: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(entries)) => Some(Self { entries }),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.entries.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Read the JSON array stored under `key`.
///
/// Missing keys and malformed contents both read as an empty list.
pub fn read_records(store: &dyn KeyValueStore, key: &str) -> Vec<Value> {
    let Some(raw) = store.get_item(key) else {
        return Vec::new();
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("Stored value under '{}' is not an array, ignoring", key);
            Vec::new()
        }
        Err(e) => {
            warn!("Could not parse stored value under '{}': {}", key, e);
            Vec::new()
        }
    }
}

/// The local sources in merge order.
pub fn local_sources(store: &dyn KeyValueStore) -> Vec<RecordSource> {
    vec![
        RecordSource::new(
            AI_FILE_REQUESTS_KEY,
            FieldMapping::ai_file_requests(),
            read_records(store, AI_FILE_REQUESTS_KEY),
        ),
        RecordSource::new(
            FEEDBACK_DATA_KEY,
            FieldMapping::feedback_data(),
            read_records(store, FEEDBACK_DATA_KEY),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_records_from_serialized_string() {
        let mut store = HashMap::new();
        store.insert(
            AI_FILE_REQUESTS_KEY.to_string(),
            r#"[{"email":"a@x.com","ts":"2025-09-01"}]"#.to_string(),
        );
        let records = read_records(&store, AI_FILE_REQUESTS_KEY);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["email"], "a@x.com");
    }

    #[test]
    fn test_malformed_and_missing_read_as_empty() {
        let mut store = HashMap::new();
        store.insert(FEEDBACK_DATA_KEY.to_string(), "{not json".to_string());
        store.insert(AI_FILE_REQUESTS_KEY.to_string(), r#"{"a":1}"#.to_string());
        assert!(read_records(&store, FEEDBACK_DATA_KEY).is_empty());
        assert!(read_records(&store, AI_FILE_REQUESTS_KEY).is_empty());
        assert!(read_records(&store, "nothing_here").is_empty());
    }

    #[test]
    fn test_json_file_store_accepts_inline_arrays() {
        let store = JsonFileStore::from_json(
            r#"{
                "ai_file_requests": "[{\"email\":\"a@x.com\",\"ts\":\"2025-09-01\"}]",
                "feedback_data": [{"email":"b@y.com","timestamp":"2025-09-02","rating":5}]
            }"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);

        let sources = local_sources(&store);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name, AI_FILE_REQUESTS_KEY);
        assert_eq!(sources[0].records.len(), 1);
        assert_eq!(sources[1].name, FEEDBACK_DATA_KEY);
        assert_eq!(sources[1].records[0]["rating"], 5);
    }

    #[test]
    fn test_json_file_store_load() {
        let dir = tempfile::tempdir().unwrap();

        let missing = JsonFileStore::load(&dir.path().join("absent.json"));
        assert!(missing.is_empty());

        let bad_path = dir.path().join("bad.json");
        std::fs::write(&bad_path, "[1, 2, 3]").unwrap();
        assert!(JsonFileStore::load(&bad_path).is_empty());

        let good_path = dir.path().join("storage.json");
        let mut file = std::fs::File::create(&good_path).unwrap();
        file.write_all(br#"{"feedback_data": []}"#).unwrap();
        let store = JsonFileStore::load(&good_path);
        assert_eq!(store.get_item(FEEDBACK_DATA_KEY).as_deref(), Some("[]"));
    }
}
