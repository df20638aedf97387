use crate::error::Result;
use crate::github::{Endpoint, HttpClient, HttpResponse};
use crate::models::{ReleaseDetail, RepositorySummary, TrafficCounts};
use crate::types::{GitHubRelease, GitHubTraffic};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Populates releases, downloads and traffic for one repository.
///
/// Never fails. A non-2xx releases status counts as zero releases and keeps
/// traffic; a releases call that cannot be sent or decoded also drops traffic.
/// Each traffic metric independently degrades to `None`, and traffic is only
/// requested with a token.
pub async fn enrich<C: HttpClient>(
    client: &C,
    repo: RepositorySummary,
    username: &str,
    token: Option<&str>,
) -> RepositorySummary {
    let releases_endpoint = Endpoint::releases(username, &repo.name);

    let traffic = async {
        match token {
            Some(_) => {
                let clones_endpoint = Endpoint::traffic_clones(username, &repo.name);
                let views_endpoint = Endpoint::traffic_views(username, &repo.name);
                tokio::join!(
                    fetch_traffic(client, &clones_endpoint, token),
                    fetch_traffic(client, &views_endpoint, token),
                )
            }
            None => (None, None),
        }
    };

    let (releases, (clones, views)) =
        tokio::join!(fetch_releases(client, &releases_endpoint, token), traffic);

    match releases {
        Ok(releases) => {
            let releases: Vec<ReleaseDetail> =
                releases.into_iter().map(ReleaseDetail::from).collect();
            repo.with_releases(releases).with_traffic(clones, views)
        }
        Err(e) => {
            warn!(%releases_endpoint, "Releases unavailable, degrading repository: {}", e);
            repo.with_releases(Vec::new()).with_traffic(None, None)
        }
    }
}

/// Enriches every repository concurrently and waits for all of them.
///
/// Output order matches input order.
pub async fn enrich_all<C: HttpClient>(
    client: &C,
    repos: Vec<RepositorySummary>,
    username: &str,
    token: Option<&str>,
) -> Vec<RepositorySummary> {
    let count = repos.len();
    let enriched = join_all(
        repos
            .into_iter()
            .map(|repo| enrich(client, repo, username, token)),
    )
    .await;

    info!(username, repositories = count, "Enriched repository batch");
    enriched
}

/// A non-2xx status reads as no releases; transport and decode failures are `Err`.
async fn fetch_releases<C: HttpClient>(
    client: &C,
    endpoint: &Endpoint,
    token: Option<&str>,
) -> Result<Vec<GitHubRelease>> {
    let releases = get_json::<_, Vec<GitHubRelease>>(client, endpoint, token).await?;
    Ok(releases.unwrap_or_default())
}

async fn fetch_traffic<C: HttpClient>(
    client: &C,
    endpoint: &Endpoint,
    token: Option<&str>,
) -> Option<TrafficCounts> {
    match get_json::<_, GitHubTraffic>(client, endpoint, token).await {
        Ok(traffic) => traffic.map(TrafficCounts::from),
        Err(e) => {
            debug!(%endpoint, "Traffic unavailable: {}", e);
            None
        }
    }
}

/// `Ok(None)` for a non-2xx status, `Err` for transport or decoding failures.
async fn get_json<C, T>(client: &C, endpoint: &Endpoint, token: Option<&str>) -> Result<Option<T>>
where
    C: HttpClient,
    T: serde::de::DeserializeOwned,
{
    let response: HttpResponse = client.request(endpoint, token).await?;
    if !response.is_success() {
        debug!(%endpoint, status = response.status.as_u16(), "Non-success status");
        return Ok(None);
    }
    response.json().map(Some)
}
