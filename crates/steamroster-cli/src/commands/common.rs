use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use serde::Serialize;
use steamroster_core::avatar::RemoteAvatars;
use steamroster_core::config::DataPaths;
use steamroster_core::models::{sort_by_became_friend, UserProfile};
use steamroster_core::services::{RosterRecord, RosterService};
use steamroster_core::steam::SteamClient;
use steamroster_core::store::RecordStore;
use steamroster_core::util::epoch_to_timestamp;
use steamroster_core::RosterEntry;

use crate::cli::StatusFilter;
use crate::error::CliError;
use crate::settings::CliSettings;

/// Effective settings plus the global path overrides.
#[derive(Debug)]
pub struct AppContext {
    pub settings: CliSettings,
    pub settings_path: PathBuf,
    pub data_dir_override: Option<PathBuf>,
}

impl AppContext {
    pub fn data_paths(&self) -> Result<DataPaths, CliError> {
        let data_dir = self
            .settings
            .resolve_data_dir(self.data_dir_override.as_deref())?;
        Ok(DataPaths::in_dir(&data_dir))
    }

    /// Record access that needs no API credentials.
    pub fn record(&self) -> Result<RosterRecord, CliError> {
        let paths = self.data_paths()?;
        Ok(RosterRecord::new(RecordStore::new(paths.record_file)))
    }

    /// Service that caches avatars under the data directory.
    pub fn service(&self) -> Result<RosterService, CliError> {
        let credentials = self.settings.credentials()?;
        let paths = self.data_paths()?;
        Ok(RosterService::open(credentials, &paths)?)
    }

    /// Service that keeps remote avatar URLs and never touches the cache.
    pub fn remote_service(&self) -> Result<RosterService<RemoteAvatars>, CliError> {
        let credentials = self.settings.credentials()?;
        let paths = self.data_paths()?;
        let client = SteamClient::new(credentials).map_err(steamroster_core::Error::from)?;
        Ok(RosterService::new(
            client,
            RecordStore::new(paths.record_file),
            RemoteAvatars,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct RosterListItem {
    pub steam_id: String,
    pub name: String,
    pub status: String,
    pub became_friend_at: String,
    pub removed_at: String,
    pub remark: String,
    pub avatar: String,
}

pub fn entry_to_list_item(entry: &RosterEntry) -> RosterListItem {
    RosterListItem {
        steam_id: entry.account_id.clone(),
        name: entry.display_name.clone(),
        status: entry.friendship_status.label().to_string(),
        became_friend_at: entry.became_friend_at.clone(),
        removed_at: entry.removed_at.clone(),
        remark: entry.remark.clone(),
        avatar: entry.avatar_ref.clone(),
    }
}

/// Filter by status and order by friendship date.
pub fn select_entries(
    mut entries: Vec<RosterEntry>,
    status: StatusFilter,
    descending: bool,
) -> Vec<RosterEntry> {
    entries.retain(|entry| match status {
        StatusFilter::All => true,
        StatusFilter::Active => entry.is_active(),
        StatusFilter::Removed => !entry.is_active(),
    });
    sort_by_became_friend(&mut entries, !descending);
    entries
}

pub fn format_roster_lines(entries: &[RosterEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let name = truncate_chars(&entry.display_name, 24);
            let since = or_dash(&entry.became_friend_at);
            let mut line = format!(
                "{:<17}  {:<7}  {name:<24}  {since:<19}",
                entry.account_id,
                entry.friendship_status.label()
            );
            if !entry.removed_at.is_empty() {
                line.push_str(&format!("  removed {}", entry.removed_at));
            }
            if !entry.remark.is_empty() {
                line.push_str(&format!("  ({})", entry.remark));
            }
            line
        })
        .collect()
}

pub fn format_profile_lines(profile: &UserProfile) -> Vec<String> {
    let mut lines = vec![
        format!("Name:     {}", profile.persona_name),
        format!("SteamID:  {}", profile.steam_id),
        format!("Profile:  {}", or_dash(&profile.profile_url)),
        format!("Status:   {}", profile.persona_state_label()),
    ];
    if let Some(real_name) = &profile.real_name {
        lines.push(format!("Real name: {real_name}"));
    }
    if let Some(country) = &profile.country_code {
        lines.push(format!("Country:  {country}"));
    }
    if let Some(created_at) = profile.created_at {
        lines.push(format!("Created:  {}", epoch_to_timestamp(created_at)));
    }
    lines.push(format!("Games:    {}", profile.game_count));
    lines
}

pub fn normalize_steam_id(value: &str) -> Result<String, CliError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptySteamId);
    }
    Ok(trimmed.to_string())
}

/// Ask before a destructive action unless `--yes` was given.
///
/// Without a terminal on stdin there is nobody to ask.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<(), CliError> {
    if assume_yes {
        return Ok(());
    }
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::ConfirmationRequired);
    }
    confirm_with(prompt, &mut stdin.lock(), &mut io::stderr())
}

pub fn confirm_with<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<(), CliError> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => Err(CliError::Aborted),
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let mut truncated = value
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
