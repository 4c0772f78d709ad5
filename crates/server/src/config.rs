//! Server configuration from flags and environment.

use clap::Parser;
use deck_net::DEFAULT_UPLOAD_ENDPOINT;
use std::net::SocketAddr;
use std::time::Duration;

/// Serve the script-to-slides web interface.
#[derive(Parser, Debug, Clone)]
#[command(name = "deck-server")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "DECK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Image host upload endpoint
    #[arg(long, env = "DECK_UPLOAD_ENDPOINT", default_value = DEFAULT_UPLOAD_ENDPOINT)]
    pub upload_endpoint: String,

    /// API key for the image host (uploads are refused without one)
    #[arg(long, env = "DECK_UPLOAD_KEY", hide_env_values = true)]
    pub upload_key: Option<String>,

    /// Timeout for each outgoing request, in seconds
    #[arg(long, default_value = "10")]
    pub fetch_timeout_secs: u64,

    /// Largest accepted request body, in bytes
    #[arg(long, default_value = "16777216")]
    pub max_upload_bytes: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}
