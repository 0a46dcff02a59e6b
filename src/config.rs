//! Command-line and environment configuration.
//!
//! Everything is read once at startup.  The backend address can come from
//! `--api-url` or `PULSE_API_URL`; without either the dashboard talks to a
//! backend on localhost.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const DEFAULT_LOG_FILE: &str = "pulse-dash.log";

#[derive(Debug, Parser)]
#[command(
    name = "pulse-dash",
    version,
    about = "Terminal dashboard for a news aggregation backend"
)]
pub struct Cli {
    /// Base URL of the news backend.
    #[arg(long, env = "PULSE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Where to write logs (the terminal belongs to the UI).
    #[arg(long, env = "PULSE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level and honour RUST_LOG.
    #[arg(long)]
    pub debug: bool,

    /// Also record news shares on the backend via POST /broadcast.
    #[arg(long)]
    pub broadcast: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
