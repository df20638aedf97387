use crate::error::{ReleaseStatsError, Result};
use crate::models::{RateLimitStatus, RepositorySummary};
use crate::types::GitHubRepo;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;
const USER_AGENT: &str = "release-stats/0.1.0";

/// A GET target relative to the API base: raw path segments plus query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Endpoint {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// `GET /users/{user}/repos?per_page=100&sort=updated`
    pub fn user_repos(username: &str) -> Self {
        Endpoint::new(["users", username, "repos"])
            .query("per_page", PER_PAGE)
            .query("sort", "updated")
    }

    /// `GET /repos/{owner}/{repo}/releases?per_page=100`
    pub fn releases(owner: &str, repo: &str) -> Self {
        Endpoint::new(["repos", owner, repo, "releases"]).query("per_page", PER_PAGE)
    }

    pub fn traffic_clones(owner: &str, repo: &str) -> Self {
        Endpoint::new(["repos", owner, repo, "traffic", "clones"])
    }

    pub fn traffic_views(owner: &str, repo: &str) -> Self {
        Endpoint::new(["repos", owner, repo, "traffic", "views"])
    }

    /// Resolves against `base`, percent-encoding each segment.
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty().extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Raw upstream response. Non-2xx statuses are returned, not raised.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    fn header<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<T>().ok())
    }

    /// Reads `x-ratelimit-*` headers; missing or malformed values stay `None`.
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        let reset_time = self
            .header::<i64>("x-ratelimit-reset")
            .and_then(|timestamp| DateTime::<Utc>::from_timestamp(timestamp, 0));

        RateLimitStatus {
            remaining: self.header("x-ratelimit-remaining"),
            limit: self.header("x-ratelimit-limit"),
            reset_time,
        }
    }
}

/// Issues one GET per call. Only transport failures become `Err`.
pub trait HttpClient {
    fn request(
        &self,
        endpoint: &Endpoint,
        token: Option<&str>,
    ) -> impl Future<Output = Result<HttpResponse>> + Send;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base: Url,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.api_base)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(GitHubClient { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

impl HttpClient for GitHubClient {
    async fn request(&self, endpoint: &Endpoint, token: Option<&str>) -> Result<HttpResponse> {
        let url = endpoint.to_url(&self.base)?;

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!(%endpoint, status = status.as_u16(), "GitHub request finished");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Lists up to [`PER_PAGE`] repositories of `username`, most recently updated first.
///
/// Results beyond the first page are not fetched.
pub async fn list_repositories<C: HttpClient>(
    client: &C,
    username: &str,
    token: Option<&str>,
) -> Result<(Vec<RepositorySummary>, RateLimitStatus)> {
    let endpoint = Endpoint::user_repos(username);
    let response = client.request(&endpoint, token).await?;

    match response.status {
        status if status.is_success() => {}
        StatusCode::NOT_FOUND => {
            return Err(ReleaseStatsError::UserNotFound(username.to_string()));
        }
        StatusCode::FORBIDDEN => {
            warn!(username, "Repository listing refused, assuming rate limit");
            return Err(ReleaseStatsError::RateLimited);
        }
        status => {
            return Err(ReleaseStatsError::ApiError(status.as_u16()));
        }
    }

    let rate_limit = response.rate_limit_status();
    let repos: Vec<GitHubRepo> = response.json()?;

    if repos.len() == PER_PAGE as usize {
        warn!(username, "Listing returned a full page; further repositories are not fetched");
    }

    info!(
        username,
        repositories = repos.len(),
        remaining = ?rate_limit.remaining,
        "Fetched repository listing"
    );

    let skeletons = repos.into_iter().map(RepositorySummary::skeleton).collect();
    Ok((skeletons, rate_limit))
}
