use crate::credentials::CredentialStore;
use crate::error::{ReleaseStatsError, Result};
use crate::github::{list_repositories, HttpClient};
use crate::models::FetchReport;
use crate::ranking::{rank, summarize};
use crate::releases::enrich_all;
use tracing::{debug, info, warn};

/// Identifies one fetch cycle. The token is captured when the cycle starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleTicket {
    pub generation: u64,
    pub username: String,
    pub token: Option<String>,
}

#[derive(Debug)]
pub enum DashboardState {
    Idle,
    Loading { username: String },
    Loaded(FetchReport),
    Failed {
        username: String,
        error: ReleaseStatsError,
    },
}

/// Runs one cycle: listing, concurrent enrichment of the whole batch, ranking.
///
/// A listing failure aborts before any enrichment request is issued.
pub async fn fetch_cycle<C: HttpClient>(client: &C, ticket: &CycleTicket) -> Result<FetchReport> {
    let username = ticket.username.as_str();
    let token = ticket.token.as_deref();

    let (skeletons, rate_limit) = list_repositories(client, username, token).await?;
    let enriched = enrich_all(client, skeletons, username, token).await;

    let repositories = rank(enriched);
    let summary = summarize(&repositories);

    info!(
        username,
        generation = ticket.generation,
        repositories = repositories.len(),
        total_downloads = summary.total_downloads,
        "Fetch cycle complete"
    );

    Ok(FetchReport {
        username: username.to_string(),
        rate_limit,
        repositories,
        summary,
    })
}

/// Owner of the credential store and the displayed result set.
///
/// Cycles are tagged with a generation; only the latest one may commit.
#[derive(Debug)]
pub struct Dashboard {
    credentials: CredentialStore,
    generation: u64,
    last_username: Option<String>,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(credentials: CredentialStore) -> Self {
        Self {
            credentials,
            generation: 0,
            last_username: None,
            state: DashboardState::Idle,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new cycle, superseding any cycle still in flight.
    pub fn begin_cycle(&mut self, username: &str) -> Result<CycleTicket> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ReleaseStatsError::InvalidUsername(username.to_string()));
        }

        let token = self.credentials.get()?;

        self.generation += 1;
        self.last_username = Some(username.to_string());
        self.state = DashboardState::Loading {
            username: username.to_string(),
        };

        debug!(
            username,
            generation = self.generation,
            authenticated = token.is_some(),
            "Starting fetch cycle"
        );

        Ok(CycleTicket {
            generation: self.generation,
            username: username.to_string(),
            token,
        })
    }

    /// Starts a new cycle for the last username, if there is one.
    pub fn refresh(&mut self) -> Option<Result<CycleTicket>> {
        let username = self.last_username.clone()?;
        Some(self.begin_cycle(&username))
    }

    /// Applies a finished cycle. Returns `false` if the ticket was superseded.
    pub fn commit(&mut self, ticket: &CycleTicket, outcome: Result<FetchReport>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                username = %ticket.username,
                stale = ticket.generation,
                current = self.generation,
                "Discarding result of superseded fetch cycle"
            );
            return false;
        }

        self.state = match outcome {
            Ok(report) => DashboardState::Loaded(report),
            Err(error) => DashboardState::Failed {
                username: ticket.username.clone(),
                error,
            },
        };
        true
    }

    /// Convenience: begin, fetch and commit one cycle.
    pub async fn run<C: HttpClient>(&mut self, client: &C, username: &str) -> Result<&DashboardState> {
        let ticket = self.begin_cycle(username)?;
        let outcome = fetch_cycle(client, &ticket).await;
        // `&mut self` is held across the fetch, so no newer cycle can start
        let committed = self.commit(&ticket, outcome);
        debug_assert!(committed, "exclusive cycle was superseded");
        Ok(&self.state)
    }
}
