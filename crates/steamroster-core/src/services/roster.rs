//! Roster operations that talk to the Steam Web API.
//!
//! Every operation that touches the record file holds the record guard for
//! its whole load-mutate-save cycle, so at most one runs at a time.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::avatar::{resolve_many, AvatarCache, AvatarResolver};
use crate::config::{ApiCredentials, DataPaths};
use crate::friend_code::parse_friend_code;
use crate::models::{RosterEntry, UserProfile};
use crate::reconcile::{reconcile_with_summary, ReconcileSummary, Reconciliation};
use crate::services::{PurgeReport, RosterRecord};
use crate::steam::{fetch_live_friends, SteamClient};
use crate::store::RecordStore;
use crate::util::{format_timestamp, local_now};
use crate::{Error, Result};

/// Outcome of an update pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub total: usize,
    pub active: usize,
    pub summary: ReconcileSummary,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalFailure {
    pub account_id: String,
    pub message: String,
}

/// Per-account result of a removal request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    pub removed: Vec<String>,
    pub failed: Vec<RemovalFailure>,
}

/// Roster operations over one API client, record file and avatar resolver.
#[derive(Clone)]
pub struct RosterService<A = AvatarCache> {
    client: SteamClient,
    record: RosterRecord,
    avatars: A,
}

impl RosterService<AvatarCache> {
    /// Service with the standard data layout and an on-disk avatar cache.
    pub fn open(credentials: ApiCredentials, paths: &DataPaths) -> Result<Self> {
        let avatars = AvatarCache::open(&paths.avatar_dir, credentials.proxy())?;
        let client = SteamClient::new(credentials)?;
        Ok(Self::new(
            client,
            RecordStore::new(&paths.record_file),
            avatars,
        ))
    }
}

impl<A: AvatarResolver> RosterService<A> {
    pub fn new(client: SteamClient, store: RecordStore, avatars: A) -> Self {
        Self {
            client,
            record: RosterRecord::new(store),
            avatars,
        }
    }

    pub const fn store(&self) -> &RecordStore {
        self.record.store()
    }

    /// Current record, as stored.
    pub async fn load(&self) -> Vec<RosterEntry> {
        self.record.load().await
    }

    /// Fetch the live friends, reconcile with the record and save it.
    pub async fn update(&self) -> Result<UpdateReport> {
        self.update_at(local_now()).await
    }

    /// [`Self::update`] with an explicit clock.
    ///
    /// The record is only written after every API call has succeeded.
    pub async fn update_at(&self, now: NaiveDateTime) -> Result<UpdateReport> {
        let _guard = self.record.lock().await;

        let live = fetch_live_friends(&self.client, &self.avatars).await?;
        let stored = self.store().load();
        let Reconciliation { entries, summary } = reconcile_with_summary(stored, &live, now);
        let saved = self.store().save(&entries)?;

        let report = UpdateReport {
            total: entries.len(),
            active: entries.iter().filter(|entry| entry.is_active()).count(),
            summary,
            saved,
        };
        tracing::info!(
            "Roster updated: {} entries ({} active), {} added, {} re-added, {} removed",
            report.total,
            report.active,
            summary.added,
            summary.readded,
            summary.removed
        );
        Ok(report)
    }

    /// See [`RosterRecord::purge`].
    pub async fn purge(&self) -> Result<PurgeReport> {
        self.record.purge().await
    }

    /// See [`RosterRecord::set_remark`].
    pub async fn set_remark(&self, account_id: &str, remark: &str) -> Result<bool> {
        self.record.set_remark(account_id, remark).await
    }

    /// Remove friends through the API, then mark the removed ones in the record.
    pub async fn remove_friends(&self, account_ids: &[String]) -> Result<RemovalReport> {
        self.remove_friends_at(account_ids, local_now()).await
    }

    /// [`Self::remove_friends`] with an explicit clock.
    pub async fn remove_friends_at(
        &self,
        account_ids: &[String],
        now: NaiveDateTime,
    ) -> Result<RemovalReport> {
        let _guard = self.record.lock().await;

        let mut report = RemovalReport::default();
        for account_id in account_ids {
            match self.client.remove_friend(account_id).await {
                Ok(()) => report.removed.push(account_id.clone()),
                Err(error) => {
                    tracing::warn!("Failed to remove friend {account_id}: {error}");
                    report.failed.push(RemovalFailure {
                        account_id: account_id.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }

        if !report.removed.is_empty() {
            let now = format_timestamp(now);
            let mut entries = self.store().load();
            for entry in &mut entries {
                if report.removed.contains(&entry.account_id) {
                    entry.mark_removed(&now);
                }
            }
            self.store().save(&entries)?;
        }

        tracing::info!(
            "Removed {} friends, {} failed",
            report.removed.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Re-resolve the avatar of every recorded account from fresh summaries.
    ///
    /// Returns how many avatar references changed; saves only when some did.
    pub async fn refresh_avatars(&self) -> Result<usize> {
        let _guard = self.record.lock().await;

        let mut entries = self.store().load();
        if entries.is_empty() {
            return Ok(0);
        }

        let ids = entries
            .iter()
            .map(|entry| entry.account_id.clone())
            .collect::<Vec<_>>();
        let remote_urls = self
            .client
            .player_summaries(&ids)
            .await?
            .into_iter()
            .map(|player| (player.steamid, player.avatar))
            .collect::<HashMap<_, _>>();

        let targets = entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                remote_urls
                    .get(&entry.account_id)
                    .map(|url| (position, (url.clone(), entry.account_id.clone())))
            })
            .collect::<Vec<_>>();
        let (positions, requests): (Vec<usize>, Vec<(String, String)>) =
            targets.into_iter().unzip();
        let resolved = resolve_many(&self.avatars, requests).await;

        let mut changed = 0;
        for (position, avatar_ref) in positions.into_iter().zip(resolved) {
            let entry = &mut entries[position];
            if entry.avatar_ref != avatar_ref {
                entry.avatar_ref = avatar_ref;
                changed += 1;
            }
        }

        if changed > 0 {
            self.store().save(&entries)?;
        }
        tracing::info!("Refreshed {changed} avatars");
        Ok(changed)
    }

    /// Profile behind a friend code, SteamID or SteamID64.
    pub async fn lookup_user(&self, friend_code: &str) -> Result<UserProfile> {
        let steam_id = parse_friend_code(friend_code)
            .ok_or_else(|| Error::InvalidInput(format!("invalid friend code '{friend_code}'")))?;
        Ok(self.client.lookup_user(&steam_id).await?)
    }

    pub async fn send_friend_request(&self, steam_id: &str) -> Result<()> {
        self.client.add_friend(steam_id).await?;
        tracing::info!("Sent friend request to {steam_id}");
        Ok(())
    }
}

impl<A: AvatarResolver + Clone + 'static> RosterService<A> {
    /// Run [`Self::update`] on a background task.
    ///
    /// Aborting the handle before the task starts cancels the update.
    pub fn spawn_update(&self) -> JoinHandle<Result<UpdateReport>> {
        let service = self.clone();
        tokio::spawn(async move { service.update().await })
    }
}
