//! Roster entry model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an account is still on the friends list.
///
/// Serialized with the check/cross markers used by the record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FriendshipStatus {
    #[serde(rename = "✅", alias = "active", alias = "ACTIVE")]
    Active,
    #[serde(rename = "❌", alias = "removed", alias = "REMOVED")]
    Removed,
}

impl FriendshipStatus {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the persisted roster.
///
/// Field order is the column order of the record file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Local cache path or fallback remote URL
    #[serde(rename = "avatar")]
    pub avatar_ref: String,
    /// Sanitized persona name
    #[serde(rename = "name")]
    pub display_name: String,
    /// 64-bit Steam id, unique within the record
    #[serde(rename = "steamid")]
    pub account_id: String,
    #[serde(rename = "is_friend")]
    pub friendship_status: FriendshipStatus,
    /// Set when the account is first seen as a friend
    #[serde(rename = "bfd", default)]
    pub became_friend_at: String,
    /// Set on the first pass that no longer sees the account; empty while active
    #[serde(rename = "removed_time", default)]
    pub removed_at: String,
    /// User-owned note, never touched by reconciliation
    #[serde(default)]
    pub remark: String,
}

impl RosterEntry {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.friendship_status.is_active()
    }

    /// Flip an active entry to removed, keeping any earlier removal time.
    pub fn mark_removed(&mut self, now: &str) {
        if !self.is_active() {
            return;
        }
        self.friendship_status = FriendshipStatus::Removed;
        if self.removed_at.is_empty() {
            self.removed_at = now.to_string();
        }
    }
}

/// Sort entries by the time they became friends.
///
/// Timestamps sort lexicographically; entries without one go last either way.
pub fn sort_by_became_friend(entries: &mut [RosterEntry], ascending: bool) {
    entries.sort_by(|left, right| {
        match (left.became_friend_at.is_empty(), right.became_friend_at.is_empty()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) if ascending => left.became_friend_at.cmp(&right.became_friend_at),
            (false, false) => right.became_friend_at.cmp(&left.became_friend_at),
        }
    });
}
