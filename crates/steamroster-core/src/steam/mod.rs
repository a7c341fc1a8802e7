//! Steam Web API client and roster fetching.

mod client;
mod error;
mod payload;
mod roster;

pub use client::{build_http_client, SteamClient, DEFAULT_BASE_URL, SUMMARY_BATCH_SIZE};
pub use error::{SteamApiError, SteamApiResult};
pub use payload::{FriendListItem, PlayerSummary};
pub use roster::fetch_live_friends;
