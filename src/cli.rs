use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "release-stats")]
#[command(about = "Release download and traffic statistics for a GitHub user's repositories")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com", global = true)]
    pub api_url: String,

    /// HTTP timeout in seconds
    #[arg(long, env = "GITHUB_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Location of the stored access token
    #[arg(long, env = "RELEASE_STATS_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch and rank the repositories of a user
    Show {
        /// GitHub username
        username: String,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// List releases and assets under each repository
        #[arg(long)]
        releases: bool,
    },

    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Store a token; traffic statistics are requested while one is set
    Set { value: String },
    /// Remove the stored token
    Clear,
    /// Report whether a token is stored
    Status,
}
