//! Freshly fetched friend, consumed by reconciliation

use serde::{Deserialize, Serialize};

use crate::models::{FriendshipStatus, RosterEntry};
use crate::util::epoch_to_timestamp;

/// A friend as reported by the API on this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveFriend {
    pub account_id: String,
    pub display_name: String,
    pub avatar_ref: String,
    /// Epoch seconds
    pub friend_since: i64,
}

impl LiveFriend {
    /// First-sighting roster row for this friend.
    #[must_use]
    pub fn to_new_entry(&self) -> RosterEntry {
        RosterEntry {
            avatar_ref: self.avatar_ref.clone(),
            display_name: self.display_name.clone(),
            account_id: self.account_id.clone(),
            friendship_status: FriendshipStatus::Active,
            became_friend_at: epoch_to_timestamp(self.friend_since),
            removed_at: String::new(),
            remark: String::new(),
        }
    }
}

/// Replace characters that break the record file or table output.
///
/// ```
/// use steamroster_core::models::sanitize_display_name;
///
/// assert_eq!(sanitize_display_name("a|b-c:d"), "a`b`c`d");
/// ```
#[must_use]
pub fn sanitize_display_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '|' | '-' | '+' | ':' | '"' | '\'' | '\n' | '\r' => '`',
            other => other,
        })
        .collect()
}
