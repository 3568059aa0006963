use chrono::{Local, NaiveDateTime};
use interfaces_github_activity::index::{
    fetch_commit_search, fetch_user_repos, CommitSearchResponse, FetchCommitSearchError,
    FetchUserReposError, GitHubRestResult, UserRepo,
};
use interfaces_supabase_postgrest::index::SupabaseClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::GithubCredentials;
use crate::sink::models::StatsRecord;
use crate::sink::queries::{upsert_stats_record, UpsertStatsRecordError};
use crate::stats::months::{trailing_month_windows, MonthWindow};

pub const GITHUB_CATEGORY: &str = "github";

const TRAILING_MONTHS: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCommits {
    pub month: String,
    pub year: i32,
    pub commits: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubStats {
    pub total_stars: u64,
    pub monthly_commits: Vec<MonthlyCommits>,
    pub last_updated: NaiveDateTime,
}

/// Outcome of one GitHub aggregation run.
#[derive(Debug)]
pub enum GithubRefresh {
    /// Credentials were absent; nothing was fetched and nothing written.
    Skipped,
    Updated {
        total_stars: u64,
    },
}

#[derive(Debug, Error)]
pub enum RefreshGithubStatsError {
    #[error("FetchUserRepos: {source}")]
    FetchUserRepos {
        #[from]
        source: FetchUserReposError,
    },

    #[error("UserReposRequestFailed: {status}")]
    UserReposRequestFailed {
        status: reqwest::StatusCode,
    },

    #[error("DeserializeUserRepos: {source}")]
    DeserializeUserRepos {
        source: serde_json::Error,
    },

    #[error("FetchCommitSearch: {source}")]
    FetchCommitSearch {
        #[from]
        source: FetchCommitSearchError,
    },

    #[error("DeserializeCommitSearch: {source}")]
    DeserializeCommitSearch {
        source: serde_json::Error,
    },

    #[error("SerializeStats: {source}")]
    SerializeStats {
        source: serde_json::Error,
    },

    #[error("UpsertStats: {source}")]
    UpsertStats {
        #[from]
        source: UpsertStatsRecordError,
    },
}

/// Fetches the star total and twelve months of commit counts, then
/// overwrites the `github` sink record. Nothing is written unless the whole
/// sequence succeeds.
pub async fn refresh_github_stats(
    sink: &SupabaseClient,
    creds: Option<&GithubCredentials>,
) -> Result<GithubRefresh, RefreshGithubStatsError> {
    let Some(creds) = creds else {
        warn!("GITHUB_TOKEN or GITHUB_USERNAME not set, skipping GitHub stats");
        return Ok(GithubRefresh::Skipped);
    };

    info!(username = %creds.username, "fetching GitHub stats");

    let GitHubRestResult { body, status } = fetch_user_repos(&creds.token, &creds.username).await?;
    if !status.is_success() {
        return Err(RefreshGithubStatsError::UserReposRequestFailed { status });
    }

    let repos: Vec<UserRepo> = serde_json::from_str(&body)
        .map_err(|source| RefreshGithubStatsError::DeserializeUserRepos { source })?;

    let total_stars = total_stars(&repos);
    info!(total_stars, "summed repository stars");

    let windows = trailing_month_windows(Local::now().date_naive(), TRAILING_MONTHS);
    let mut monthly_commits = Vec::with_capacity(windows.len());

    for window in &windows {
        let commits = fetch_month_commit_count(creds, window).await?;
        info!(month = %window.label, year = window.year, commits, "commit count");

        monthly_commits.push(MonthlyCommits {
            month: window.label.clone(),
            year: window.year,
            commits,
        });
    }

    let stats = GithubStats {
        total_stars,
        monthly_commits,
        last_updated: Local::now().naive_local(),
    };

    let record = StatsRecord {
        category: GITHUB_CATEGORY.to_string(),
        data: serde_json::to_value(&stats)
            .map_err(|source| RefreshGithubStatsError::SerializeStats { source })?,
    };

    upsert_stats_record(sink, &record).await?;

    Ok(GithubRefresh::Updated { total_stars })
}

pub fn total_stars(repos: &[UserRepo]) -> u64 {
    repos.iter().map(|repo| repo.stargazers_count).sum()
}

async fn fetch_month_commit_count(
    creds: &GithubCredentials,
    window: &MonthWindow,
) -> Result<u64, RefreshGithubStatsError> {
    let GitHubRestResult { body, status } =
        fetch_commit_search(&creds.token, &creds.username, window.start, window.end).await?;

    month_commit_count(status, &body, &window.label, window.year)
        .map_err(|source| RefreshGithubStatsError::DeserializeCommitSearch { source })
}

/// Extracts the commit count for one searched month. The search API's
/// `total_count` is taken as-is; a non-2xx status yields zero for that month
/// without failing the run.
pub fn month_commit_count(
    status: reqwest::StatusCode,
    body: &str,
    label: &str,
    year: i32,
) -> Result<u64, serde_json::Error> {
    if !status.is_success() {
        warn!(%status, month = %label, year, "commit search failed, recording zero");
        return Ok(0);
    }

    let parsed: CommitSearchResponse = serde_json::from_str(body)?;
    Ok(parsed.total_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn stars_are_summed_across_repositories() {
        let repos = vec![
            UserRepo { stargazers_count: 3 },
            UserRepo { stargazers_count: 0 },
            UserRepo { stargazers_count: 17 },
        ];

        assert_eq!(total_stars(&repos), 20);
    }

    #[test]
    fn no_repositories_means_zero_stars() {
        assert_eq!(total_stars(&[]), 0);
    }

    #[test]
    fn a_failed_commit_search_counts_as_zero_for_that_month() {
        let count = month_commit_count(StatusCode::FORBIDDEN, "rate limited", "Jan", 2024);

        assert_eq!(count.unwrap(), 0);
    }

    #[test]
    fn a_successful_commit_search_reports_total_count() {
        let body = r#"{"total_count": 42, "incomplete_results": false, "items": []}"#;
        let count = month_commit_count(StatusCode::OK, body, "Jan", 2024);

        assert_eq!(count.unwrap(), 42);
    }

    #[test]
    fn a_malformed_search_body_is_an_error_rather_than_zero() {
        let count = month_commit_count(StatusCode::OK, "not json", "Jan", 2024);

        assert!(count.is_err());
    }

    #[tokio::test]
    async fn missing_credentials_skip_without_touching_the_sink() {
        let sink = SupabaseClient::new("http://localhost:9", "key");

        let outcome = refresh_github_stats(&sink, None).await.unwrap();

        assert!(matches!(outcome, GithubRefresh::Skipped));
    }

    #[test]
    fn stats_blob_is_serialized_with_camel_case_keys() {
        let stats = GithubStats {
            total_stars: 5,
            monthly_commits: vec![MonthlyCommits {
                month: "Mar".to_string(),
                year: 2024,
                commits: 7,
            }],
            last_updated: chrono::NaiveDate::from_ymd_opt(2024, 3, 31)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };

        let blob = serde_json::to_value(&stats).unwrap();

        assert_eq!(blob["totalStars"], 5);
        assert_eq!(blob["monthlyCommits"][0]["month"], "Mar");
        assert_eq!(blob["monthlyCommits"][0]["commits"], 7);
        assert!(blob["lastUpdated"].is_string());
    }
}
