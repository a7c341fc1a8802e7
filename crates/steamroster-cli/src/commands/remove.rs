use std::collections::HashMap;

use crate::commands::common::{confirm, normalize_steam_id, AppContext};
use crate::error::CliError;

pub async fn run_remove(
    ctx: &AppContext,
    steam_ids: &[String],
    assume_yes: bool,
) -> Result<(), CliError> {
    let steam_ids = normalize_steam_ids(steam_ids)?;
    let service = ctx.remote_service()?;

    let names = service
        .load()
        .await
        .into_iter()
        .map(|entry| (entry.account_id, entry.display_name))
        .collect::<HashMap<_, _>>();
    for steam_id in &steam_ids {
        let name = names.get(steam_id).map_or("unknown", String::as_str);
        println!("{steam_id}  {name}");
    }
    confirm(
        &format!("Remove {} friend(s) from your Steam friends list?", steam_ids.len()),
        assume_yes,
    )?;

    let report = service.remove_friends(&steam_ids).await?;
    for steam_id in &report.removed {
        println!("Removed {steam_id}");
    }
    for failure in &report.failed {
        eprintln!("Failed to remove {}: {}", failure.account_id, failure.message);
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::RemovalFailed(report.failed.len()))
    }
}

/// Trim, drop duplicates and keep the given order.
pub fn normalize_steam_ids(values: &[String]) -> Result<Vec<String>, CliError> {
    let mut steam_ids = Vec::with_capacity(values.len());
    for value in values {
        let steam_id = normalize_steam_id(value)?;
        if !steam_ids.contains(&steam_id) {
            steam_ids.push(steam_id);
        }
    }
    if steam_ids.is_empty() {
        return Err(CliError::EmptySteamId);
    }
    Ok(steam_ids)
}
