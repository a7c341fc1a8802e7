use std::path::{Path, PathBuf};

use serde::Serialize;
use steamroster_core::config::DataPaths;
use steamroster_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::commands::common::AppContext;
use crate::error::CliError;
use crate::settings::CliSettings;

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub settings_path: PathBuf,
    pub api_key: Option<String>,
    pub steam_id: Option<String>,
    pub proxy: Option<String>,
    pub data_dir: PathBuf,
    pub record_file: PathBuf,
    pub avatar_dir: PathBuf,
}

pub fn run_config(ctx: &AppContext, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Set {
            api_key,
            steam_id,
            proxy,
            data_dir,
        } => {
            let changes = SettingsChanges {
                api_key,
                steam_id,
                proxy,
                data_dir,
            };
            apply_settings_changes(&ctx.settings_path, changes)?;
            println!("{}", ctx.settings_path.display());
            Ok(())
        }
        ConfigCommands::Show { json } => {
            let view = settings_view(ctx)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                for line in format_settings_lines(&view) {
                    println!("{line}");
                }
            }
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", ctx.settings_path.display());
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub struct SettingsChanges {
    pub api_key: Option<String>,
    pub steam_id: Option<String>,
    pub proxy: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Merge explicit values into the stored settings file.
///
/// Environment overrides are not written back. An empty `--proxy` clears
/// the stored proxy.
pub fn apply_settings_changes(
    path: &Path,
    changes: SettingsChanges,
) -> Result<CliSettings, CliError> {
    let mut settings = CliSettings::load_from_path(path)?;

    if let Some(api_key) = changes.api_key {
        settings.api_key = Some(
            normalize_text_option(Some(api_key))
                .ok_or_else(|| CliError::Config("API key cannot be empty".to_string()))?,
        );
    }
    if let Some(steam_id) = changes.steam_id {
        settings.steam_id = Some(normalize_text_option(Some(steam_id)).ok_or(CliError::EmptySteamId)?);
    }
    if let Some(proxy) = changes.proxy {
        let proxy = normalize_text_option(Some(proxy));
        if let Some(value) = proxy.as_deref() {
            if !is_http_url(value) {
                return Err(CliError::Config(format!(
                    "proxy '{value}' must include http:// or https://"
                )));
            }
        }
        settings.proxy = proxy;
    }
    if let Some(data_dir) = changes.data_dir {
        settings.data_dir = Some(data_dir);
    }

    settings.save_to_path(path)?;
    Ok(settings)
}

pub fn settings_view(ctx: &AppContext) -> Result<SettingsView, CliError> {
    let data_dir = ctx
        .settings
        .resolve_data_dir(ctx.data_dir_override.as_deref())?;
    let DataPaths {
        record_file,
        avatar_dir,
    } = DataPaths::in_dir(&data_dir);

    Ok(SettingsView {
        settings_path: ctx.settings_path.clone(),
        api_key: ctx.settings.redacted_api_key(),
        steam_id: ctx.settings.steam_id.clone(),
        proxy: ctx.settings.proxy.clone(),
        data_dir,
        record_file,
        avatar_dir,
    })
}

pub fn format_settings_lines(view: &SettingsView) -> Vec<String> {
    let unset = || "(not set)".to_string();
    vec![
        format!("settings:    {}", view.settings_path.display()),
        format!("api_key:     {}", view.api_key.clone().unwrap_or_else(unset)),
        format!("steam_id:    {}", view.steam_id.clone().unwrap_or_else(unset)),
        format!("proxy:       {}", view.proxy.clone().unwrap_or_else(unset)),
        format!("data_dir:    {}", view.data_dir.display()),
        format!("record_file: {}", view.record_file.display()),
        format!("avatar_dir:  {}", view.avatar_dir.display()),
    ]
}
