//! Looked-up user profile

use serde::{Deserialize, Serialize};

/// Public profile details shown before sending a friend request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub steam_id: String,
    pub persona_name: String,
    pub profile_url: String,
    pub avatar_url: String,
    pub real_name: Option<String>,
    pub country_code: Option<String>,
    pub persona_state: u8,
    /// Epoch seconds; hidden on private profiles
    pub created_at: Option<i64>,
    pub game_count: u32,
}

impl UserProfile {
    /// Human label for the persona state code.
    #[must_use]
    pub const fn persona_state_label(&self) -> &'static str {
        match self.persona_state {
            0 => "offline",
            1 => "online",
            2 => "busy",
            3 => "away",
            4 => "snooze",
            5 => "looking to trade",
            6 => "looking to play",
            _ => "unknown",
        }
    }
}
