use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use songsync_engine::{CatalogSettings, PipelineSettings, RateLimitSettings};
use songsync_logging::{LevelFilter, LogDestination};

#[derive(Parser, Debug)]
#[command(name = "songsync", version)]
#[command(about = "Import osu! song folders into a YouTube playlist", long_about = None)]
pub struct Cli {
    /// OAuth access token for the YouTube Data API
    #[arg(long, env = "SONGSYNC_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,

    /// Base URL of the YouTube Data API
    #[arg(long, env = "SONGSYNC_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Pause between two imported songs, in milliseconds
    #[arg(long, default_value_t = 1000, global = true)]
    pub item_delay_ms: u64,

    /// Minimum spacing between two API calls, in milliseconds
    #[arg(long, default_value_t = 250, global = true)]
    pub min_call_interval_ms: u64,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal, global = true)]
    pub log: LogTarget,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List song folders and the search names derived from them
    Scan {
        /// osu! Songs directory
        dir: PathBuf,
    },
    /// List the signed-in user's playlists
    Playlists,
    /// Create a new private playlist
    CreatePlaylist {
        title: String,
    },
    /// Search every song folder and add the matches to a playlist
    #[command(group(ArgGroup::new("target").required(true).args(["playlist", "new_playlist"])))]
    Import {
        /// osu! Songs directory
        dir: PathBuf,
        /// Id of an existing playlist
        #[arg(long)]
        playlist: Option<String>,
        /// Create a playlist with this title and import into it
        #[arg(long)]
        new_playlist: Option<String>,
        /// Run a second pass over the songs that failed
        #[arg(long)]
        retry_failed: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        let mut settings = CatalogSettings::default();
        if let Some(base) = self.api_base.as_deref().filter(|base| !base.trim().is_empty()) {
            settings.api_base = base.trim().to_string();
        }
        settings
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            item_delay: Duration::from_millis(self.item_delay_ms),
            ..PipelineSettings::default()
        }
    }

    pub fn rate_limit_settings(&self) -> RateLimitSettings {
        RateLimitSettings {
            min_interval: Duration::from_millis(self.min_call_interval_ms),
        }
    }

    /// Token from the command line or environment, if it is not blank.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
