//! steamroster - keep a local history of your Steam friends list
//!
//! Tracks who is still on the list, who left and when, with your remarks.

mod cli;
mod commands;
mod error;
mod settings;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::avatars::run_avatars;
use crate::commands::common::AppContext;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::list::run_list;
use crate::commands::lookup::run_lookup;
use crate::commands::purge::run_purge;
use crate::commands::remark::run_remark;
use crate::commands::remove::run_remove;
use crate::commands::update::run_update;
use crate::error::CliError;
use crate::settings::{resolve_settings_path, CliSettings};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("steamroster=info".parse().map_err(|error| {
                    CliError::Config(format!("Invalid log directive: {error}"))
                })?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let settings_path = resolve_settings_path(cli.config.as_deref())?;
    let mut settings = CliSettings::load_from_path(&settings_path)?;
    settings.apply_env();
    tracing::debug!("Using settings at {}", settings_path.display());
    let ctx = AppContext {
        settings,
        settings_path,
        data_dir_override: cli.data_dir,
    };

    match cli.command {
        Commands::Update { no_avatars, json } => run_update(&ctx, no_avatars, json).await,
        Commands::List { status, desc, json } => run_list(&ctx, status, desc, json).await,
        Commands::Purge { yes } => run_purge(&ctx, yes).await,
        Commands::Remark { steam_id, text } => run_remark(&ctx, &steam_id, &text).await,
        Commands::Remove { steam_ids, yes } => run_remove(&ctx, &steam_ids, yes).await,
        Commands::Lookup { code, json } => run_lookup(&ctx, &code, json).await,
        Commands::Add { code, yes } => run_add(&ctx, &code, yes).await,
        Commands::Avatars => run_avatars(&ctx).await,
        Commands::Config { command } => run_config(&ctx, command),
        Commands::Completions { .. } => Ok(()),
    }
}
