//! In-memory history of completed analyses.
//!
//! Bounded and newest first. Nothing is persisted; the store lives as long as the process.

use crate::envelope::ResultEnvelope;
use api_shared::{format_timestamp, HistoryEntryRes};
use std::collections::VecDeque;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A stored analysis with its identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub envelope: ResultEnvelope,
}

impl HistoryEntry {
    pub fn to_wire(&self) -> HistoryEntryRes {
        HistoryEntryRes {
            id: self.id.clone(),
            timestamp: format_timestamp(self.envelope.timestamp),
            patient_data: self.envelope.patient.to_wire(),
            analysis: self.envelope.analysis.as_value().clone(),
        }
    }
}

/// Shared, bounded history. Cloning shares the underlying store.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    entries: Arc<RwLock<VecDeque<HistoryEntry>>>,
    capacity: usize,
}

impl HistoryStore {
    /// Create a store holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock cannot leave the deque half-updated, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<HistoryEntry>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<HistoryEntry>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `envelope` as the newest entry, evicting the oldest beyond capacity.
    pub fn record(&self, envelope: ResultEnvelope) -> HistoryEntry {
        let entry = HistoryEntry {
            id: uuid::Uuid::new_v4().simple().to_string(),
            envelope,
        };

        let mut entries = self.write();
        entries.push_front(entry.clone());
        while entries.len() > self.capacity {
            if let Some(evicted) = entries.pop_back() {
                tracing::debug!(id = %evicted.id, "history entry evicted");
            }
        }
        entry
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.read().iter().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<HistoryEntry> {
        self.read().iter().find(|entry| entry.id == id).cloned()
    }

    /// Remove one entry. Returns `false` when no entry has `id`.
    pub fn delete(&self, id: &str) -> bool {
        let mut entries = self.write();
        match entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisRecord;
    use crate::normalizer::{NormalizationTier, Normalized};
    use crate::patient::fixtures::patient;
    use serde_json::json;

    fn envelope(n: u64) -> ResultEnvelope {
        ResultEnvelope::new(
            patient(),
            Normalized {
                record: AnalysisRecord::from_value(json!({ "n": n })),
                tier: NormalizationTier::Strict,
            },
        )
    }

    #[test]
    fn newest_entry_comes_first_and_oldest_is_evicted() {
        let store = HistoryStore::new(2);
        let first = store.record(envelope(1));
        store.record(envelope(2));
        let third = store.record(envelope(3));

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, third.id);
        assert_eq!(listed[1].envelope.analysis.as_value()["n"], 2);
        assert!(store.get(&first.id).is_none());
    }

    #[test]
    fn ids_are_32_hex_characters_and_unique() {
        let store = HistoryStore::default();
        let a = store.record(envelope(1));
        let b = store.record(envelope(2));
        assert_eq!(a.id.len(), 32);
        assert!(a.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn delete_and_clear() {
        let store = HistoryStore::new(5);
        let a = store.record(envelope(1));
        store.record(envelope(2));

        assert!(store.delete(&a.id));
        assert!(!store.delete(&a.id));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_entries() {
        let store = HistoryStore::new(3);
        let shared = store.clone();
        let entry = shared.record(envelope(7));
        assert_eq!(store.get(&entry.id), Some(entry.clone()));
        assert_eq!(entry.to_wire().analysis, json!({"n": 7}));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let store = HistoryStore::new(0);
        store.record(envelope(1));
        store.record(envelope(2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.capacity(), 1);
    }
}
