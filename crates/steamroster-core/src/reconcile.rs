//! Merge a freshly fetched friend set into the stored roster.
//!
//! The pass is idempotent and lossless: every account ever stored stays in the
//! output, removal times are only ever set once, and remarks are never touched.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{FriendshipStatus, LiveFriend, RosterEntry};
use crate::util::{epoch_to_timestamp, format_timestamp};

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    /// Accounts seen for the first time
    pub added: usize,
    /// Previously removed accounts that are friends again
    pub readded: usize,
    /// Active accounts missing from the live set
    pub removed: usize,
    /// Entries whose status did not change
    pub unchanged: usize,
}

/// Output of [`reconcile_with_summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub entries: Vec<RosterEntry>,
    pub summary: ReconcileSummary,
}

/// New authoritative roster for `stored` given the `live` friend set at `now`.
#[must_use]
pub fn reconcile(stored: Vec<RosterEntry>, live: &[LiveFriend], now: NaiveDateTime) -> Vec<RosterEntry> {
    reconcile_with_summary(stored, live, now).entries
}

/// [`reconcile`] plus counts of what changed.
///
/// Live friends come first in live order, then the remaining stored entries in
/// stored order, so a repeated pass yields an identical sequence.
#[must_use]
pub fn reconcile_with_summary(
    stored: Vec<RosterEntry>,
    live: &[LiveFriend],
    now: NaiveDateTime,
) -> Reconciliation {
    let now = format_timestamp(now);
    let mut summary = ReconcileSummary::default();

    let mut pending: Vec<Option<RosterEntry>> = Vec::with_capacity(stored.len());
    let mut stored_index: HashMap<String, usize> = HashMap::with_capacity(stored.len());
    for entry in stored {
        if stored_index.contains_key(&entry.account_id) {
            tracing::warn!(
                "Duplicate roster entry for {} ignored",
                entry.account_id
            );
            continue;
        }
        stored_index.insert(entry.account_id.clone(), pending.len());
        pending.push(Some(entry));
    }

    let mut entries: Vec<RosterEntry> = Vec::with_capacity(pending.len() + live.len());
    let mut output_index: HashMap<String, usize> = HashMap::with_capacity(live.len());
    for friend in live {
        if let Some(&position) = output_index.get(&friend.account_id) {
            refresh_profile(&mut entries[position], friend);
            continue;
        }

        let entry = match stored_index
            .get(&friend.account_id)
            .and_then(|&position| pending[position].take())
        {
            Some(mut entry) => {
                if entry.is_active() {
                    summary.unchanged += 1;
                } else {
                    summary.readded += 1;
                }
                refresh_profile(&mut entry, friend);
                entry.friendship_status = FriendshipStatus::Active;
                entry.removed_at.clear();
                if entry.became_friend_at.is_empty() {
                    entry.became_friend_at = epoch_to_timestamp(friend.friend_since);
                }
                entry
            }
            None => {
                summary.added += 1;
                friend.to_new_entry()
            }
        };
        output_index.insert(entry.account_id.clone(), entries.len());
        entries.push(entry);
    }

    for mut entry in pending.into_iter().flatten() {
        if entry.is_active() {
            summary.removed += 1;
            entry.mark_removed(&now);
        } else {
            summary.unchanged += 1;
        }
        entries.push(entry);
    }

    Reconciliation { entries, summary }
}

/// Keep only active entries, dropping the removal history.
#[must_use]
pub fn purge(stored: Vec<RosterEntry>) -> Vec<RosterEntry> {
    stored.into_iter().filter(RosterEntry::is_active).collect()
}

fn refresh_profile(entry: &mut RosterEntry, friend: &LiveFriend) {
    entry.display_name.clone_from(&friend.display_name);
    entry.avatar_ref.clone_from(&friend.avatar_ref);
}
