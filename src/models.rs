use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{GitHubAsset, GitHubRelease, GitHubRepo, GitHubTraffic};

/// One repository of the user's result set, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub url: String,
    pub total_downloads: u64,
    pub release_count: usize,
    pub releases: Vec<ReleaseDetail>,
    pub clones: Option<TrafficCounts>,
    pub views: Option<TrafficCounts>,
}

impl RepositorySummary {
    /// Skeleton built from the listing call, before releases and traffic are known.
    pub fn skeleton(repo: GitHubRepo) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language,
            url: repo.html_url,
            total_downloads: 0,
            release_count: 0,
            releases: Vec::new(),
            clones: None,
            views: None,
        }
    }

    /// Replaces releases and recomputes the download total from them.
    pub fn with_releases(mut self, releases: Vec<ReleaseDetail>) -> Self {
        self.total_downloads = releases.iter().map(|r| r.downloads).sum();
        self.release_count = releases.len();
        self.releases = releases;
        self
    }

    pub fn with_traffic(
        mut self,
        clones: Option<TrafficCounts>,
        views: Option<TrafficCounts>,
    ) -> Self {
        self.clones = clones;
        self.views = views;
        self
    }

    pub fn has_releases(&self) -> bool {
        self.release_count > 0
    }

    pub fn has_traffic(&self) -> bool {
        self.clones.is_some() || self.views.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseDetail {
    pub tag_name: String,
    pub name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub prerelease: bool,
    pub downloads: u64,
    pub assets: Vec<AssetDetail>,
}

impl ReleaseDetail {
    pub fn is_source_only(&self) -> bool {
        self.assets.is_empty()
    }
}

impl From<GitHubRelease> for ReleaseDetail {
    fn from(release: GitHubRelease) -> Self {
        let assets: Vec<AssetDetail> = release.assets.into_iter().map(AssetDetail::from).collect();
        let downloads = assets.iter().map(|a| a.downloads).sum();

        // An empty name is as good as none
        let name = release
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| release.tag_name.clone());

        ReleaseDetail {
            tag_name: release.tag_name,
            name,
            published_at: release.published_at,
            prerelease: release.prerelease,
            downloads,
            assets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDetail {
    pub name: String,
    pub downloads: u64,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

impl From<GitHubAsset> for AssetDetail {
    fn from(asset: GitHubAsset) -> Self {
        AssetDetail {
            name: asset.name,
            downloads: asset.download_count,
            size: asset.size,
            created_at: asset.created_at,
        }
    }
}

/// A traffic metric; count and uniques are always present together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrafficCounts {
    pub count: u64,
    pub uniques: u64,
}

impl From<GitHubTraffic> for TrafficCounts {
    fn from(traffic: GitHubTraffic) -> Self {
        TrafficCounts {
            count: traffic.count,
            uniques: traffic.uniques,
        }
    }
}

/// Rate limit state captured from the listing call's response headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateLimitStatus {
    pub remaining: Option<u32>,
    pub limit: Option<u32>,
    pub reset_time: Option<DateTime<Utc>>,
}

impl RateLimitStatus {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Cross-repository statistics for one fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_downloads: u64,
    pub total_releases: usize,
    pub count_with_downloads: usize,
    pub max_downloads: u64,
    pub has_traffic: bool,
    pub total_clones: u64,
    pub total_views: u64,
}

/// Everything one completed fetch cycle produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchReport {
    pub username: String,
    pub rate_limit: RateLimitStatus,
    pub repositories: Vec<RepositorySummary>,
    pub summary: Summary,
}
