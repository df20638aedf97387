use crate::models::{RepositorySummary, Summary};
use std::cmp::Ordering;

/// Most downloaded first. Between two repositories without downloads, the
/// one with more stars comes first. Equal keys keep their input order.
pub fn rank(mut repos: Vec<RepositorySummary>) -> Vec<RepositorySummary> {
    repos.sort_by(compare);
    repos
}

pub fn compare(a: &RepositorySummary, b: &RepositorySummary) -> Ordering {
    if a.total_downloads == 0 && b.total_downloads == 0 {
        b.stars.cmp(&a.stars)
    } else {
        b.total_downloads.cmp(&a.total_downloads)
    }
}

pub fn summarize(repos: &[RepositorySummary]) -> Summary {
    repos.iter().fold(Summary::default(), |mut summary, repo| {
        summary.total_downloads += repo.total_downloads;
        summary.total_releases += repo.release_count;
        if repo.total_downloads > 0 {
            summary.count_with_downloads += 1;
        }
        summary.max_downloads = summary.max_downloads.max(repo.total_downloads);
        summary.has_traffic |= repo.has_traffic();
        summary.total_clones += repo.clones.map_or(0, |c| c.count);
        summary.total_views += repo.views.map_or(0, |v| v.count);
        summary
    })
}
