use colored::*;
use release_stats::models::{FetchReport, RateLimitStatus, ReleaseDetail, RepositorySummary};

pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    }
}

pub fn print_report(report: &FetchReport, show_releases: bool) {
    let summary = &report.summary;

    println!("{}", format!("Release statistics for {}", report.username).bold().green());
    println!("{}", "=".repeat(50).dimmed());
    println!(
        "{} downloads across {} releases ({} of {} repositories with downloads)",
        format_count(summary.total_downloads).bold(),
        summary.total_releases,
        summary.count_with_downloads,
        report.repositories.len()
    );
    if summary.has_traffic {
        println!(
            "{} clones, {} views (last 14 days)",
            format_count(summary.total_clones).cyan(),
            format_count(summary.total_views).magenta()
        );
    }
    println!();

    for repo in &report.repositories {
        print_repository(repo);
        if show_releases {
            for release in &repo.releases {
                print_release(release);
            }
        }
    }

    println!();
    print_rate_limit(&report.rate_limit);
}

fn print_repository(repo: &RepositorySummary) {
    let downloads = format_count(repo.total_downloads);
    let downloads = if repo.total_downloads > 0 {
        downloads.green().bold()
    } else {
        downloads.dimmed()
    };

    let mut line = format!("{:>10}  {}", downloads, repo.name.blue().bold());
    if let Some(language) = &repo.language {
        line.push_str(&format!(" [{}]", language));
    }
    line.push_str(&format!(" ★{}", repo.stars));
    if repo.has_releases() {
        let noun = if repo.release_count > 1 { "releases" } else { "release" };
        line.push_str(&format!(" ({} {})", repo.release_count, noun));
    }
    println!("{}", line);

    if let Some(description) = &repo.description {
        println!("{:>10}  {}", "", description.dimmed());
    }
    if let Some(clones) = repo.clones {
        println!(
            "{:>10}  clones {} ({} uniq)",
            "",
            format_count(clones.count).cyan(),
            format_count(clones.uniques)
        );
    }
    if let Some(views) = repo.views {
        println!(
            "{:>10}  views {} ({} uniq)",
            "",
            format_count(views.count).magenta(),
            format_count(views.uniques)
        );
    }
}

fn print_release(release: &ReleaseDetail) {
    let mut line = format!("{:>14}{}", "", release.tag_name.bold());
    if release.name != release.tag_name {
        line.push_str(&format!(" {}", release.name.dimmed()));
    }
    if release.prerelease {
        line.push_str(&format!(" {}", "PRE-RELEASE".purple()));
    }
    if let Some(published) = release.published_at {
        line.push_str(&format!(" {}", published.format("%Y-%m-%d").to_string().dimmed()));
    }
    println!("{}", line);

    if release.is_source_only() {
        println!("{:>16}{}", "", "source code only".dimmed().italic());
    }
    for asset in &release.assets {
        println!(
            "{:>16}{} ({}) {}",
            "",
            asset.name,
            format_bytes(asset.size).dimmed(),
            format_count(asset.downloads)
        );
    }
}

pub fn print_rate_limit(rate_limit: &RateLimitStatus) {
    let remaining = rate_limit
        .remaining
        .map_or_else(|| "?".to_string(), |r| r.to_string());
    let limit = rate_limit
        .limit
        .map_or_else(|| "?".to_string(), |l| l.to_string());
    let mut line = format!("API rate limit: {}/{}", remaining, limit);
    if let Some(reset) = rate_limit.reset_time {
        line.push_str(&format!(", resets at {}", reset.format("%H:%M:%S UTC")));
    }

    if rate_limit.is_exhausted() {
        println!("{}", line.red());
    } else {
        println!("{}", line.dimmed());
    }
}
