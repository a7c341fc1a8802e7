use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "steamroster")]
#[command(about = "Keep a local history of your Steam friends list")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the record file and avatar cache
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the friends list and merge it into the local record
    #[command(alias = "sync")]
    Update {
        /// Keep remote avatar URLs instead of caching images
        #[arg(long)]
        no_avatars: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List recorded friends
    #[command(alias = "ls")]
    List {
        /// Which entries to show
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Newest friendships first
        #[arg(long)]
        desc: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every removed friend from the local record
    Purge {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Set or clear the remark of a recorded friend
    Remark {
        /// SteamID64 of the friend
        steam_id: String,
        /// Remark text (omit to clear)
        text: Vec<String>,
    },
    /// Remove friends from your Steam friends list
    Remove {
        /// SteamID64s to remove
        #[arg(required = true)]
        steam_ids: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Look up a user by friend code, SteamID or SteamID64
    Lookup {
        /// Friend code or id
        code: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up a user and send them a friend request
    Add {
        /// Friend code or id
        code: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Re-download avatars for every recorded friend
    Avatars,
    /// Manage stored settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StatusFilter {
    All,
    Active,
    Removed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Store API credentials and paths
    Set {
        /// Steam Web API key
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,
        /// Your SteamID64
        #[arg(long, value_name = "ID")]
        steam_id: Option<String>,
        /// HTTP(S) proxy URL (empty string clears it)
        #[arg(long, value_name = "URL")]
        proxy: Option<String>,
        /// Default data directory
        #[arg(long, value_name = "PATH")]
        data_dir: Option<PathBuf>,
    },
    /// Show effective settings (API key redacted)
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the settings file location
    Path,
}
