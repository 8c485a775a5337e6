//! Feedback Store Module
//!
//! Memoizes evaluation results keyed by the exact (exercise id, user input)
//! pair. No capacity bound; records only leave through expiry or a clear.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::cache::codec::{read_collection, write_collection};
use crate::cache::{CacheSettings, CachedFeedback, Clock, FEEDBACK_STORE_KEY};
use crate::error::Result;
use crate::storage::KeyValueStore;

// == Feedback Store ==
/// Feedback collection persisted as a single blob.
pub struct FeedbackStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
}

impl FeedbackStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            storage,
            clock,
            settings,
        }
    }

    /// Returns the full, unfiltered collection, or empty on any fault.
    pub fn load(&self) -> Vec<CachedFeedback> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to load cached feedback, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn try_load(&self) -> Result<Vec<CachedFeedback>> {
        read_collection(self.storage.as_ref(), FEEDBACK_STORE_KEY)
    }

    // == Lookup ==
    /// Returns the feedback of the first live record matching both keys.
    ///
    /// `user_input` is compared byte for byte; no trimming or case folding.
    pub fn lookup(&self, exercise_id: &str, user_input: &str) -> Option<Value> {
        let now = self.clock.now_ms();
        self.load()
            .into_iter()
            .filter(|r| !r.is_expired(now, self.settings.ttl_ms))
            .find(|r| r.matches(exercise_id, user_input))
            .map(|r| r.feedback)
    }

    /// Number of non-expired records. Load faults are returned, not logged.
    pub fn live_count(&self) -> Result<usize> {
        let now = self.clock.now_ms();
        Ok(self
            .try_load()?
            .iter()
            .filter(|r| !r.is_expired(now, self.settings.ttl_ms))
            .count())
    }

    // == Upsert ==
    /// Stamps and writes a feedback record. Returns true if it replaced one.
    ///
    /// An unreadable collection is overwritten; its load fault is logged only
    /// once the write has succeeded.
    pub fn upsert(&self, exercise_id: &str, user_input: &str, feedback: Value) -> Result<bool> {
        let (mut records, load_fault) = match self.try_load() {
            Ok(records) => (records, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        let record = CachedFeedback {
            exercise_id: exercise_id.to_string(),
            user_input: user_input.to_string(),
            feedback,
            cached_at: self.clock.now_ms(),
        };

        let replaced = match records
            .iter()
            .position(|r| r.matches(exercise_id, user_input))
        {
            Some(index) => {
                records[index] = record;
                true
            }
            None => {
                records.push(record);
                false
            }
        };

        write_collection(self.storage.as_ref(), FEEDBACK_STORE_KEY, &records)?;
        if let Some(e) = load_fault {
            warn!("Overwrote unreadable feedback collection: {}", e);
        }
        Ok(replaced)
    }

    /// Deletes the persisted collection.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(FEEDBACK_STORE_KEY)
    }
}
