use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
}

/// One row of the user repository listing. Only the star count is read;
/// every other field in the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct UserRepo {
    pub stargazers_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct CommitSearchResponse {
    pub total_count: u64,
}

/// Fetches up to 100 public repositories for a user in a single page.
pub async fn fetch_user_repos(
    token: &str,
    username: &str,
) -> Result<GitHubRestResult, FetchUserReposError> {
    let url = format!("https://api.github.com/users/{username}/repos?per_page=100&type=public");

    let client = Client::new();

    let response = client
        .get(&url)
        .header("Authorization", format!("token {token}"))
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", "rust-client")
        .send()
        .await
        .map_err(|source| FetchUserReposError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchUserReposError::ResponseRead { source })?;

    Ok(GitHubRestResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchUserReposError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

/// Commit search scoped to one author and one committer-date window.
/// `total_count` in the response may be capped by the search API; callers
/// take it as-is.
pub async fn fetch_commit_search(
    token: &str,
    username: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<GitHubRestResult, FetchCommitSearchError> {
    let url = format!(
        "https://api.github.com/search/commits?q=author:{username}+committer-date:{}..{}",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
    );

    let client = Client::new();

    let response = client
        .get(&url)
        .header("Authorization", format!("token {token}"))
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", "rust-client")
        .send()
        .await
        .map_err(|source| FetchCommitSearchError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchCommitSearchError::ResponseRead { source })?;

    Ok(GitHubRestResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchCommitSearchError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}
