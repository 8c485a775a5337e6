//! Persisted Format Module
//!
//! Each collection is stored as `{"version": 1, "records": [...]}`. Any blob
//! that is not valid JSON of that shape, or carries another version, decodes
//! to [`CacheError::Malformed`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use crate::storage::KeyValueStore;

/// Version written by [`encode`] and the only one [`decode`] accepts.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    records: &'a [T],
}

#[derive(Deserialize)]
struct Envelope<T> {
    version: u32,
    records: Vec<T>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Serializes a collection into a versioned blob.
pub fn encode<T: Serialize>(records: &[T]) -> Result<String> {
    serde_json::to_string(&EnvelopeRef {
        version: FORMAT_VERSION,
        records,
    })
    .map_err(|e| CacheError::Internal(format!("Failed to encode collection: {}", e)))
}

/// Parses a versioned blob back into its records.
pub fn decode<T: DeserializeOwned>(blob: &str) -> Result<Vec<T>> {
    // Version is checked before record shape.
    let probe: VersionProbe = serde_json::from_str(blob)
        .map_err(|e| CacheError::Malformed(format!("Unreadable collection: {}", e)))?;
    if probe.version != FORMAT_VERSION {
        return Err(CacheError::Malformed(format!(
            "Unsupported format version {} (expected {})",
            probe.version, FORMAT_VERSION
        )));
    }

    let envelope: Envelope<T> = serde_json::from_str(blob)
        .map_err(|e| CacheError::Malformed(format!("Invalid collection records: {}", e)))?;
    Ok(envelope.records)
}

/// Reads and decodes the collection under `key`. A never-written key is empty.
pub fn read_collection<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>> {
    match storage.get(key)? {
        Some(blob) => decode(&blob),
        None => Ok(Vec::new()),
    }
}

/// Encodes and writes the whole collection under `key`.
pub fn write_collection<T: Serialize>(
    storage: &dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> Result<()> {
    let blob = encode(records)?;
    storage.set(key, &blob)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedFeedback;
    use crate::storage::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_encode_writes_version() {
        let blob = encode::<CachedFeedback>(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

        assert_eq!(value["version"], FORMAT_VERSION);
        assert_eq!(value["records"], json!([]));
    }

    #[test]
    fn test_decode_encoded_records() {
        let records = vec![CachedFeedback {
            exercise_id: "e1".to_string(),
            user_input: "Ich wohne in Berlin.".to_string(),
            feedback: json!({"score": 4, "comments": ["good"]}),
            cached_at: 7,
        }];

        let decoded: Vec<CachedFeedback> = decode(&encode(&records).unwrap()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode::<CachedFeedback>("not json at all");
        assert!(matches!(result, Err(CacheError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_bare_array() {
        let result = decode::<CachedFeedback>("[]");
        assert!(matches!(result, Err(CacheError::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let result = decode::<CachedFeedback>(r#"{"version": 2, "records": []}"#);
        match result {
            Err(CacheError::Malformed(msg)) => assert!(msg.contains("version 2")),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_read_collection_missing_key_is_empty() {
        let storage = MemoryStore::new();
        let records: Vec<CachedFeedback> = read_collection(&storage, "feedback_cache").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_write_then_read_collection() {
        let storage = MemoryStore::new();
        let records = vec![CachedFeedback {
            exercise_id: "e1".to_string(),
            user_input: "a".to_string(),
            feedback: json!(null),
            cached_at: 1,
        }];

        write_collection(&storage, "feedback_cache", &records).unwrap();
        let read: Vec<CachedFeedback> = read_collection(&storage, "feedback_cache").unwrap();

        assert_eq!(read, records);
    }

    #[test]
    fn test_decode_rejects_wrong_record_shape() {
        let result = decode::<CachedFeedback>(r#"{"version": 1, "records": [{"foo": 1}]}"#);
        assert!(matches!(result, Err(CacheError::Malformed(_))));
    }
}
