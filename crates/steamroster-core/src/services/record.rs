//! Serialized access to the record file for operations that need no network.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::models::RosterEntry;
use crate::reconcile::purge;
use crate::store::RecordStore;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Record file guarded so that only one load-mutate-save cycle runs at a time.
///
/// Clones share the same guard.
#[derive(Debug, Clone)]
pub struct RosterRecord {
    store: RecordStore,
    lock: Arc<Mutex<()>>,
}

impl RosterRecord {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }

    /// Current record, as stored.
    pub async fn load(&self) -> Vec<RosterEntry> {
        let _guard = self.lock().await;
        self.store.load()
    }

    /// Drop every removed entry from the record.
    ///
    /// When nothing active remains the record file is deleted.
    pub async fn purge(&self) -> Result<PurgeReport> {
        let _guard = self.lock().await;

        let stored = self.store.load();
        let before = stored.len();
        let kept = purge(stored);
        let report = PurgeReport {
            kept: kept.len(),
            dropped: before - kept.len(),
        };
        if report.dropped == 0 {
            return Ok(report);
        }

        if kept.is_empty() {
            self.store.clear()?;
        } else {
            self.store.save(&kept)?;
        }
        tracing::info!(
            "Purged {} removed entries, {} remain",
            report.dropped,
            report.kept
        );
        Ok(report)
    }

    /// Set the remark of one account. Returns whether anything changed.
    pub async fn set_remark(&self, account_id: &str, remark: &str) -> Result<bool> {
        let _guard = self.lock().await;

        let mut entries = self.store.load();
        let entry = entries
            .iter_mut()
            .find(|entry| entry.account_id == account_id)
            .ok_or_else(|| Error::NotFound(account_id.to_string()))?;
        if entry.remark == remark {
            return Ok(false);
        }
        entry.remark = remark.to_string();
        tracing::info!("Updated remark for {} ({account_id})", entry.display_name);

        self.store.save(&entries)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::FriendshipStatus;

    fn entry(id: &str, status: FriendshipStatus, remark: &str) -> RosterEntry {
        RosterEntry {
            avatar_ref: String::new(),
            display_name: format!("name {id}"),
            account_id: id.to_string(),
            friendship_status: status,
            became_friend_at: "2019-01-01 00:00:00".to_string(),
            removed_at: if status.is_active() {
                String::new()
            } else {
                "2024-01-01 00:00:00".to_string()
            },
            remark: remark.to_string(),
        }
    }

    fn record_in(dir: &tempfile::TempDir) -> RosterRecord {
        RosterRecord::new(RecordStore::new(dir.path().join("friends_data.csv")))
    }

    #[tokio::test]
    async fn purge_drops_removed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_in(&dir);
        record
            .store()
            .save(&[
                entry("1", FriendshipStatus::Active, ""),
                entry("2", FriendshipStatus::Removed, ""),
                entry("3", FriendshipStatus::Active, ""),
                entry("4", FriendshipStatus::Removed, ""),
                entry("5", FriendshipStatus::Active, ""),
            ])
            .unwrap();

        let report = record.purge().await.unwrap();
        assert_eq!(report, PurgeReport { kept: 3, dropped: 2 });
        let remaining = record.load().await;
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(RosterEntry::is_active));
    }

    #[tokio::test]
    async fn purge_of_only_removed_entries_clears_record() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_in(&dir);
        record
            .store()
            .save(&[entry("2", FriendshipStatus::Removed, "")])
            .unwrap();

        let report = record.purge().await.unwrap();
        assert_eq!(report, PurgeReport { kept: 0, dropped: 1 });
        assert!(!record.store().path().exists());
    }

    #[tokio::test]
    async fn purge_without_removed_entries_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_in(&dir);

        let report = record.purge().await.unwrap();
        assert_eq!(report, PurgeReport { kept: 0, dropped: 0 });
        assert!(!record.store().path().exists());
    }

    #[tokio::test]
    async fn set_remark_updates_only_that_entry() {
        let dir = tempfile::tempdir().unwrap();
        let record = record_in(&dir);
        record
            .store()
            .save(&[
                entry("1", FriendshipStatus::Active, ""),
                entry("2", FriendshipStatus::Removed, "b"),
            ])
            .unwrap();

        assert!(record.set_remark("1", "raid buddy, EU").await.unwrap());
        assert!(!record.set_remark("1", "raid buddy, EU").await.unwrap());
        let entries = record.load().await;
        assert_eq!(entries[0].remark, "raid buddy, EU");
        assert_eq!(entries[1].remark, "b");

        assert!(matches!(
            record.set_remark("404", "x").await.unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
