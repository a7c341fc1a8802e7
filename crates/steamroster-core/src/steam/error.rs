use reqwest::StatusCode;
use thiserror::Error;

use crate::util::compact_text;

/// Failures talking to the Steam Web API.
///
/// None of these are retried; the user re-runs the action.
#[derive(Debug, Error)]
pub enum SteamApiError {
    #[error("Unauthorized (HTTP 401): check your Steam privacy settings")]
    Auth,
    #[error("Forbidden (HTTP 403): check the Web API key and Steam ID")]
    Permission,
    #[error("Steam server error (HTTP 500): check the Steam ID")]
    Server,
    #[error("Too many requests (HTTP 429), try again later")]
    RateLimited,
    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
    #[error("Steam API returned HTTP {status}: {body}")]
    Response { status: u16, body: String },
    #[error("Steam API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid Steam API payload: {0}")]
    InvalidPayload(String),
    #[error("Steam user not found: {0}")]
    UserNotFound(String),
}

pub type SteamApiResult<T> = Result<T, SteamApiError>;

impl SteamApiError {
    /// Mapping shared by the friend list, removal and friend request endpoints.
    pub(crate) fn from_account_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Auth,
            StatusCode::FORBIDDEN => Self::Permission,
            StatusCode::INTERNAL_SERVER_ERROR => Self::Server,
            other => Self::UnexpectedStatus(other.as_u16()),
        }
    }

    /// Mapping for batched player summary requests.
    pub(crate) fn from_summary_status(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else {
            Self::Response {
                status: status.as_u16(),
                body: compact_text(body),
            }
        }
    }

    /// Mapping for single-user profile lookups.
    pub(crate) fn from_lookup_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Auth,
            StatusCode::INTERNAL_SERVER_ERROR => Self::Server,
            other => Self::UnexpectedStatus(other.as_u16()),
        }
    }
}
