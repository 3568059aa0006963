use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use interfaces_supabase_postgrest::index::SupabaseClient;
use serde_json::json;
use thiserror::Error;

use crate::sink::models::StatsRecord;
use crate::sink::queries::{get_all_stats_records, GetAllStatsRecordsError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("GetAllStatsRecords: {source}")]
    GetAllStatsRecords {
        #[from]
        source: GetAllStatsRecordsError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            HandlerError::GetAllStatsRecords { source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": source.to_string() })),
            )
                .into_response(),
        }
    }
}

/// Axum handler: GET /api/tracking
pub async fn handler(Extension(sink): Extension<SupabaseClient>) -> impl IntoResponse {
    let records = match get_all_stats_records(&sink).await {
        Ok(records) => records,
        Err(source) => return HandlerError::GetAllStatsRecords { source }.into_response(),
    };

    (StatusCode::OK, Json(reshape_by_category(records))).into_response()
}

/// Reshapes the sink's row list into an object keyed by category, each value
/// being that row's stats blob. Missing categories are simply absent keys.
pub fn reshape_by_category(records: Vec<StatsRecord>) -> serde_json::Value {
    let mut by_category = serde_json::Map::new();
    for record in records {
        by_category.insert(record.category, record.data);
    }

    serde_json::Value::Object(by_category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_become_an_object_keyed_by_category() {
        let records = vec![
            StatsRecord {
                category: "github".to_string(),
                data: json!({ "totalStars": 10 }),
            },
            StatsRecord {
                category: "leetcode".to_string(),
                data: json!({ "solved": 42 }),
            },
        ];

        let reshaped = reshape_by_category(records);

        assert_eq!(
            reshaped,
            json!({
                "github": { "totalStars": 10 },
                "leetcode": { "solved": 42 },
            })
        );
    }

    #[test]
    fn no_rows_reshape_to_an_empty_object() {
        assert_eq!(reshape_by_category(Vec::new()), json!({}));
    }
}
