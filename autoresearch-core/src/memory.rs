//! Shared log of agent actions
//!
//! An append-only record every agent writes to after finishing its work.
//! It is a domain record for the final report, independent of the
//! `tracing` diagnostics.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

/// One logged agent action. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryEntry {
    /// Position in the log, starting at 0
    pub sequence: u64,
    /// Agent that performed the action
    pub agent_name: String,
    /// What happened
    pub note: String,
    /// When it was recorded
    pub timestamp: DateTime<Local>,
}

impl MemoryEntry {
    /// Timestamp in 12-hour clock form, e.g. `03:04:05 PM`
    pub fn display_time(&self) -> String {
        self.timestamp.format("%I:%M:%S %p").to_string()
    }
}

/// Append-only, shareable log handle.
///
/// Clones share the same underlying log. Appends from concurrently running
/// agents are serialized by the lock, so no entry is lost.
#[derive(Debug, Clone, Default)]
pub struct SharedLog {
    entries: Arc<RwLock<Vec<MemoryEntry>>>,
}

impl SharedLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action. Never fails.
    pub fn append(&self, agent_name: impl Into<String>, note: impl Into<String>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = MemoryEntry {
            sequence: entries.len() as u64,
            agent_name: agent_name.into(),
            note: note.into(),
            timestamp: Local::now(),
        };
        tracing::debug!(
            agent = %entry.agent_name,
            sequence = entry.sequence,
            "{}",
            entry.note
        );
        entries.push(entry);
    }

    /// Snapshot of every entry in append order
    pub fn all_entries(&self) -> Vec<MemoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the entries from position `start` onward
    pub fn entries_since(&self, start: usize) -> Vec<MemoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(start..)
            .map(<[MemoryEntry]>::to_vec)
            .unwrap_or_default()
    }

    /// Entries recorded by one agent
    pub fn entries_for(&self, agent_name: &str) -> Vec<MemoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.agent_name == agent_name)
            .cloned()
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let log = SharedLog::new();
        log.append("a", "first");
        log.append("b", "second");
        log.append("a", "third");

        let entries = log.all_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.iter().map(|e| e.sequence).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(entries[1].note, "second");
        assert!(entries[0].timestamp <= entries[2].timestamp);
    }

    #[test]
    fn test_snapshot_does_not_track_later_appends() {
        let log = SharedLog::new();
        log.append("a", "one");
        let snapshot = log.all_entries();
        log.append("a", "two");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_entries_since_offset() {
        let log = SharedLog::new();
        log.append("a", "old");
        let start = log.len();
        log.append("b", "new one");
        log.append("c", "new two");

        let recent = log.entries_since(start);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].sequence, 1);
        assert_eq!(recent[1].note, "new two");
        assert!(log.entries_since(3).is_empty());
        assert!(log.entries_since(10).is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let log = SharedLog::new();
        let other = log.clone();
        other.append("writer", "done");

        assert!(!log.is_empty());
        assert_eq!(log.entries_for("writer").len(), 1);
        assert!(log.entries_for("reviewer").is_empty());
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let log = SharedLog::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        log.append(format!("agent-{}", i), format!("note {}", j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = log.all_entries();
        assert_eq!(entries.len(), 400);
        assert!(entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.sequence == i as u64));
    }

    #[test]
    fn test_display_time_format() {
        let log = SharedLog::new();
        log.append("a", "x");
        let time = log.all_entries()[0].display_time();
        assert_eq!(time.len(), 11);
        assert!(time.ends_with("AM") || time.ends_with("PM"));
    }
}
