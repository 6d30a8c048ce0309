//! Mock history ledger
//!
//! In-memory append-only store with a fail-next-append switch for
//! persistence-failure tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::{HistoryEntry, HistoryLedger, LedgerError, NewHistoryEntry};

/// Mock ledger backed by an in-memory vector
#[derive(Default)]
pub struct MockLedger {
    entries: RwLock<Vec<HistoryEntry>>,
    fail_next_append: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next append fail once
    pub fn fail_next_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }

    /// Snapshot of all appended entries, in append order
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HistoryLedger for MockLedger {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, LedgerError> {
        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Response("mock append failure".to_string()));
        }

        let entry = HistoryEntry {
            id: Uuid::new_v4().simple().to_string(),
            user_id: entry.user_id,
            user_email: entry.user_email,
            prompt: entry.prompt,
            image_urls: entry.image_urls,
            created_at: Utc::now(),
        };

        self.entries.write().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, LedgerError> {
        let mut entries: Vec<HistoryEntry> = self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();

        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }
}
