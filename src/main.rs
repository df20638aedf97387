mod cli;
mod render;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, TokenAction};
use colored::*;
use release_stats::credentials::CredentialStore;
use release_stats::dashboard::{Dashboard, DashboardState};
use release_stats::github::{ClientConfig, GitHubClient};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,release_stats=info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let credentials = match cli.token_file {
        Some(path) => CredentialStore::with_path(path),
        None => CredentialStore::new()
            .context("Cannot locate the token file; pass --token-file")?,
    };

    match cli.command {
        Command::Token { action } => run_token_action(&credentials, action),
        Command::Show { username, json, releases } => {
            let config = ClientConfig {
                api_base: cli.api_url,
                timeout: Duration::from_secs(cli.timeout),
                ..Default::default()
            };
            let client = GitHubClient::new(config).context("Failed to build GitHub client")?;

            let mut dashboard = Dashboard::new(credentials);
            match dashboard.run(&client, &username).await? {
                DashboardState::Loaded(report) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(report)?);
                    } else {
                        render::print_report(report, releases);
                    }
                    Ok(())
                }
                DashboardState::Failed { username, error } => {
                    eprintln!("{} {}", "✗".red(), error);
                    anyhow::bail!("fetch for {} failed", username)
                }
                DashboardState::Idle | DashboardState::Loading { .. } => {
                    anyhow::bail!("fetch cycle did not complete")
                }
            }
        }
    }
}

fn run_token_action(credentials: &CredentialStore, action: TokenAction) -> anyhow::Result<()> {
    match action {
        TokenAction::Set { value } => {
            credentials.set(&value)?;
            println!("✅ Token stored at {}", credentials.path().display());
        }
        TokenAction::Clear => {
            credentials.clear()?;
            println!("✅ Token removed");
        }
        TokenAction::Status => match credentials.get()? {
            Some(_) => println!("Token stored at {}", credentials.path().display()),
            None => println!("{}", "No token stored; traffic statistics are skipped".yellow()),
        },
    }
    Ok(())
}
