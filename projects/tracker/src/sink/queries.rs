use interfaces_supabase_postgrest::index::{SelectError, SupabaseClient, UpsertError};
use thiserror::Error;

use crate::sink::models::{StatsRecord, BLOG_TABLE, STATS_CONFLICT_COLUMN, STATS_TABLE};

#[derive(Debug, Error)]
pub enum UpsertStatsRecordError {
    #[error("SerializeRecord: {source}")]
    SerializeRecord {
        source: serde_json::Error,
    },

    #[error("UpsertStatsRecord: {source}")]
    UpsertStatsRecord {
        #[from]
        source: UpsertError,
    },
}

pub async fn upsert_stats_record(
    client: &SupabaseClient,
    record: &StatsRecord,
) -> Result<(), UpsertStatsRecordError> {
    let row = serde_json::to_value(record)
        .map_err(|source| UpsertStatsRecordError::SerializeRecord { source })?;

    client
        .upsert(STATS_TABLE, STATS_CONFLICT_COLUMN, &row)
        .await
        .map_err(|source| UpsertStatsRecordError::UpsertStatsRecord { source })
}

#[derive(Debug, Error)]
pub enum GetStatsRecordError {
    #[error("GetStatsRecord: {source}")]
    GetStatsRecord {
        #[from]
        source: SelectError,
    },

    #[error("DeserializeRecord: {source}")]
    DeserializeRecord {
        source: serde_json::Error,
    },
}

pub async fn get_stats_record(
    client: &SupabaseClient,
    category: &str,
) -> Result<Option<StatsRecord>, GetStatsRecordError> {
    let rows = client
        .select(STATS_TABLE, Some((STATS_CONFLICT_COLUMN, category)))
        .await
        .map_err(|source| GetStatsRecordError::GetStatsRecord { source })?;

    rows.into_iter()
        .next()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|source| GetStatsRecordError::DeserializeRecord { source })
        })
        .transpose()
}

#[derive(Debug, Error)]
pub enum GetAllStatsRecordsError {
    #[error("GetAllStatsRecords: {source}")]
    GetAllStatsRecords {
        #[from]
        source: SelectError,
    },

    #[error("DeserializeRecord: {source}")]
    DeserializeRecord {
        source: serde_json::Error,
    },
}

pub async fn get_all_stats_records(
    client: &SupabaseClient,
) -> Result<Vec<StatsRecord>, GetAllStatsRecordsError> {
    let rows = client
        .select(STATS_TABLE, None)
        .await
        .map_err(|source| GetAllStatsRecordsError::GetAllStatsRecords { source })?;

    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|source| GetAllStatsRecordsError::DeserializeRecord { source })
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum GetBlogPostsError {
    #[error("GetBlogPosts: {source}")]
    GetBlogPosts {
        #[from]
        source: SelectError,
    },
}

/// Blog rows are opaque to this service; they pass through as raw JSON.
pub async fn get_blog_posts(
    client: &SupabaseClient,
) -> Result<Vec<serde_json::Value>, GetBlogPostsError> {
    client
        .select(BLOG_TABLE, None)
        .await
        .map_err(|source| GetBlogPostsError::GetBlogPosts { source })
}
