use std::collections::HashMap;

use chrono::{Local, NaiveDateTime};
use interfaces_leetcode_profile::index::{
    fetch_user_profile, FetchUserProfileError, GraphQLResponse, LeetCodeGraphQLResult,
};
use interfaces_supabase_postgrest::index::SupabaseClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::sink::models::StatsRecord;
use crate::sink::queries::{
    get_stats_record, upsert_stats_record, GetStatsRecordError, UpsertStatsRecordError,
};
use crate::stats::months::{local_midnight_ts, trailing_month_windows, MonthWindow};

pub const LEETCODE_CATEGORY: &str = "leetcode";

const TRAILING_MONTHS: usize = 12;
const ALL_DIFFICULTY: &str = "All";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySolves {
    pub month: String,
    pub year: i32,
    pub solved: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeStats {
    pub solved: u32,
    pub total_questions: u32,
    pub streak: u32,
    pub daily_done: bool,
    pub monthly_solves: Vec<MonthlySolves>,
    pub last_updated: NaiveDateTime,
}

/// Fields owned by other writers. They are copied from the previous stored
/// record and never recomputed by the aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarriedFields {
    pub streak: u32,
    pub daily_done: bool,
}

#[derive(Debug)]
pub struct LeetcodeRefresh {
    pub solved: u32,
    pub total_questions: u32,
}

#[derive(Debug, Error)]
pub enum RefreshLeetcodeStatsError {
    #[error("FetchUserProfile: {source}")]
    FetchUserProfile {
        #[from]
        source: FetchUserProfileError,
    },

    #[error("ProfileRequestFailed: {status}")]
    ProfileRequestFailed {
        status: reqwest::StatusCode,
    },

    #[error("DeserializeProfile: {source}")]
    DeserializeProfile {
        source: serde_json::Error,
    },

    #[error("GraphQLErrors: {messages}")]
    GraphQLErrors {
        messages: String,
    },

    #[error("Missing data field in GraphQL response")]
    MissingProfileData,

    #[error("UserNotFound: {username}")]
    UserNotFound {
        username: String,
    },

    #[error("DeserializeSubmissionCalendar: {source}")]
    DeserializeSubmissionCalendar {
        source: serde_json::Error,
    },

    #[error("SerializeStats: {source}")]
    SerializeStats {
        source: serde_json::Error,
    },

    #[error("GetPriorRecord: {source}")]
    GetPriorRecord {
        #[from]
        source: GetStatsRecordError,
    },

    #[error("UpsertStats: {source}")]
    UpsertStats {
        #[from]
        source: UpsertStatsRecordError,
    },
}

/// Fetches solved totals and the submission calendar, buckets the calendar
/// into trailing months, and overwrites the `leetcode` sink record. The
/// `streak` and `dailyDone` fields of the prior record survive the
/// overwrite verbatim.
pub async fn refresh_leetcode_stats(
    sink: &SupabaseClient,
    username: &str,
) -> Result<LeetcodeRefresh, RefreshLeetcodeStatsError> {
    info!(username, "fetching LeetCode stats");

    let LeetCodeGraphQLResult { body, status } = fetch_user_profile(username).await?;
    if !status.is_success() {
        return Err(RefreshLeetcodeStatsError::ProfileRequestFailed { status });
    }

    let parsed: GraphQLResponse = serde_json::from_str(&body)
        .map_err(|source| RefreshLeetcodeStatsError::DeserializeProfile { source })?;

    if let Some(errors) = parsed.errors {
        let messages = errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(RefreshLeetcodeStatsError::GraphQLErrors { messages });
    }

    let data = parsed
        .data
        .ok_or(RefreshLeetcodeStatsError::MissingProfileData)?;
    let matched_user =
        data.matched_user
            .ok_or_else(|| RefreshLeetcodeStatsError::UserNotFound {
                username: username.to_string(),
            })?;

    let solved = matched_user
        .submit_stats
        .ac_submission_num
        .iter()
        .find(|item| item.difficulty == ALL_DIFFICULTY)
        .map(|item| item.count)
        .unwrap_or(0);

    let total_questions = data
        .all_questions_count
        .iter()
        .find(|item| item.difficulty == ALL_DIFFICULTY)
        .map(|item| item.count)
        .unwrap_or(0);

    info!(solved, total_questions, "fetched LeetCode profile");

    let calendar: HashMap<String, u32> = serde_json::from_str(&matched_user.submission_calendar)
        .map_err(|source| RefreshLeetcodeStatsError::DeserializeSubmissionCalendar { source })?;

    let windows = trailing_month_windows(Local::now().date_naive(), TRAILING_MONTHS);
    let monthly_solves = bucket_submission_calendar(&calendar, &windows);

    let prior = get_stats_record(sink, LEETCODE_CATEGORY).await?;
    let carried = carried_fields(prior.as_ref().map(|record| &record.data));

    let stats = LeetcodeStats {
        solved,
        total_questions,
        streak: carried.streak,
        daily_done: carried.daily_done,
        monthly_solves,
        last_updated: Local::now().naive_local(),
    };

    let record = StatsRecord {
        category: LEETCODE_CATEGORY.to_string(),
        data: serde_json::to_value(&stats)
            .map_err(|source| RefreshLeetcodeStatsError::SerializeStats { source })?,
    };

    upsert_stats_record(sink, &record).await?;

    Ok(LeetcodeRefresh {
        solved,
        total_questions,
    })
}

/// Sums submission-calendar entries into the given month windows. Bounds are
/// half-open: an entry landing exactly on the instant after a month's last
/// day belongs to the next month.
pub fn bucket_submission_calendar(
    calendar: &HashMap<String, u32>,
    windows: &[MonthWindow],
) -> Vec<MonthlySolves> {
    windows
        .iter()
        .map(|window| {
            let start_ts = local_midnight_ts(window.start);
            let end_ts = local_midnight_ts(window.end.succ_opt().unwrap_or(window.end));

            let solved = calendar
                .iter()
                .filter_map(|(ts_str, count)| {
                    ts_str.parse::<i64>().ok().map(|ts| (ts, *count))
                })
                .filter(|(ts, _)| (start_ts..end_ts).contains(ts))
                .map(|(_, count)| count)
                .sum();

            MonthlySolves {
                month: window.label.clone(),
                year: window.year,
                solved,
            }
        })
        .collect()
}

/// Reads the carry-forward fields out of the prior blob, defaulting when no
/// record exists or the fields are absent.
pub fn carried_fields(prior: Option<&serde_json::Value>) -> CarriedFields {
    prior
        .and_then(|data| serde_json::from_value(data.clone()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn calendar_entries_land_in_their_month_buckets() {
        let windows = trailing_month_windows(date(2024, 2, 15), 2);
        let calendar = HashMap::from([
            (local_midnight_ts(date(2024, 1, 15)).to_string(), 3),
            (local_midnight_ts(date(2024, 2, 1)).to_string(), 2),
        ]);

        let buckets = bucket_submission_calendar(&calendar, &windows);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].month, "Jan");
        assert_eq!(buckets[0].solved, 3);
        assert_eq!(buckets[1].month, "Feb");
        assert_eq!(buckets[1].solved, 2);
    }

    #[test]
    fn an_entry_on_the_end_boundary_belongs_to_the_next_month() {
        let windows = trailing_month_windows(date(2024, 2, 15), 2);
        let january = &windows[0];
        let boundary_ts = local_midnight_ts(january.end.succ_opt().unwrap());
        let calendar = HashMap::from([(boundary_ts.to_string(), 5)]);

        let buckets = bucket_submission_calendar(&calendar, &windows);

        assert_eq!(buckets[0].solved, 0);
        assert_eq!(buckets[1].solved, 5);
    }

    #[test]
    fn entries_outside_every_window_are_dropped() {
        let windows = trailing_month_windows(date(2024, 2, 15), 2);
        let calendar = HashMap::from([
            (local_midnight_ts(date(2021, 6, 1)).to_string(), 9),
            ("garbage".to_string(), 4),
        ]);

        let buckets = bucket_submission_calendar(&calendar, &windows);

        assert!(buckets.iter().all(|bucket| bucket.solved == 0));
    }

    #[test]
    fn carried_fields_survive_from_the_prior_record() {
        let prior = json!({
            "solved": 40,
            "streak": 5,
            "dailyDone": true,
            "lastUpdated": "2024-02-01T00:00:00"
        });

        let carried = carried_fields(Some(&prior));

        assert_eq!(carried.streak, 5);
        assert!(carried.daily_done);
    }

    #[test]
    fn carried_fields_default_when_no_prior_record_exists() {
        assert_eq!(carried_fields(None), CarriedFields::default());

        let empty = json!({});
        assert_eq!(carried_fields(Some(&empty)), CarriedFields::default());
    }

    #[test]
    fn a_new_blob_keeps_carried_fields_next_to_fresh_counts() {
        let prior = json!({"streak": 5, "dailyDone": true, "solved": 10});
        let carried = carried_fields(Some(&prior));

        let stats = LeetcodeStats {
            solved: 42,
            total_questions: 3000,
            streak: carried.streak,
            daily_done: carried.daily_done,
            monthly_solves: Vec::new(),
            last_updated: date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap(),
        };

        let blob = serde_json::to_value(&stats).unwrap();

        assert_eq!(blob["solved"], 42);
        assert_eq!(blob["streak"], 5);
        assert_eq!(blob["dailyDone"], true);
        assert_eq!(blob["totalQuestions"], 3000);
    }
}
