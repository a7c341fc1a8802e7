//! Data models for steamroster

mod entry;
mod live_friend;
mod profile;

pub use entry::{sort_by_became_friend, FriendshipStatus, RosterEntry};
pub use live_friend::{sanitize_display_name, LiveFriend};
pub use profile::UserProfile;
