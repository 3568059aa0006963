use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub struct LeetCodeGraphQLResult {
    pub body: String,
    pub status: StatusCode,
}

/// Fetches a user's solved counts and submission calendar in one GraphQL
/// round trip.
pub async fn fetch_user_profile(
    username: &str,
) -> Result<LeetCodeGraphQLResult, FetchUserProfileError> {
    let graphql_query = r#"
        query userProfile($username: String!) {
            allQuestionsCount {
                difficulty
                count
            }
            matchedUser(username: $username) {
                submitStats {
                    acSubmissionNum {
                        difficulty
                        count
                        submissions
                    }
                }
                submissionCalendar
            }
        }
    "#;

    let payload = serde_json::json!({
        "query": graphql_query,
        "variables": {
            "username": username,
        }
    });

    let client = Client::new();

    let response = client
        .post("https://leetcode.com/graphql")
        .header("Content-Type", "application/json")
        .header("User-Agent", "rust-client")
        .json(&payload)
        .send()
        .await
        .map_err(|source| FetchUserProfileError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchUserProfileError::ResponseRead { source })?;

    Ok(LeetCodeGraphQLResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchUserProfileError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<ProfileData>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub all_questions_count: Vec<DifficultyCount>,
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    pub submit_stats: SubmitStats,
    /// JSON-encoded map of unix day timestamps (as strings) to that day's
    /// submission count.
    pub submission_calendar: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    pub ac_submission_num: Vec<AcSubmissionCount>,
}

#[derive(Debug, Deserialize)]
pub struct AcSubmissionCount {
    pub difficulty: String,
    pub count: u32,
    pub submissions: u32,
}
