use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] steamroster_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Update task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Steam API credentials are not configured. Run `steamroster config set --api-key <KEY> --steam-id <ID>`, or set STEAM_API_KEY and STEAM_ID."
    )]
    NotConfigured,
    #[error("Steam ID cannot be empty")]
    EmptySteamId,
    #[error("Failed to remove {0} friend(s)")]
    RemovalFailed(usize),
    #[error("Confirmation required; rerun with --yes")]
    ConfirmationRequired,
    #[error("Aborted")]
    Aborted,
}
