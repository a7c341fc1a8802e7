//! Response bodies of the Steam Web API endpoints we call.

use serde::Deserialize;

/// Both levels are required: a body without them is not an empty list.
#[derive(Debug, Deserialize)]
pub(crate) struct FriendListResponse {
    pub friendslist: FriendList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FriendList {
    pub friends: Vec<FriendListItem>,
}

/// One friend id from `GetFriendList`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FriendListItem {
    pub steamid: String,
    #[serde(default)]
    pub relationship: String,
    /// Epoch seconds
    #[serde(default)]
    pub friend_since: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummariesResponse {
    pub response: SummariesBody,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SummariesBody {
    #[serde(default)]
    pub players: Vec<PlayerSummary>,
}

/// Public profile data from `GetPlayerSummaries`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerSummary {
    pub steamid: String,
    #[serde(default)]
    pub personaname: String,
    #[serde(default)]
    pub profileurl: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatarfull: String,
    #[serde(default)]
    pub personastate: u8,
    #[serde(default)]
    pub realname: Option<String>,
    #[serde(default)]
    pub loccountrycode: Option<String>,
    #[serde(default)]
    pub timecreated: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnedGamesResponse {
    #[serde(default)]
    pub response: OwnedGamesBody,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OwnedGamesBody {
    #[serde(default)]
    pub game_count: Option<u32>,
}
