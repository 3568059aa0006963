use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Client for a Supabase project's PostgREST endpoint. Every request carries
/// the key both as `apikey` and as a bearer token; a service-role key makes
/// writes bypass row level security.
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    key: String,
    http: Client,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            key: key.into(),
            http: Client::new(),
        }
    }

    /// Upserts one row, merging with any existing row on the `on_conflict`
    /// column.
    pub async fn upsert(
        &self,
        table: &str,
        on_conflict: &str,
        row: &serde_json::Value,
    ) -> Result<(), UpsertError> {
        let url = format!("{}/rest/v1/{table}?on_conflict={on_conflict}", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|source| UpsertError::RequestSend { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpsertError::RequestFailed { status, body });
        }

        Ok(())
    }

    /// Selects all columns of a table's rows, optionally filtered by
    /// equality on one column.
    pub async fn select(
        &self,
        table: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<serde_json::Value>, SelectError> {
        let mut url = format!("{}/rest/v1/{table}?select=*", self.base_url);
        if let Some((column, value)) = filter {
            url.push_str(&format!("&{column}=eq.{value}"));
        }

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
            .send()
            .await
            .map_err(|source| SelectError::RequestSend { source })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| SelectError::ResponseRead { source })?;

        if !status.is_success() {
            return Err(SelectError::RequestFailed { status, body });
        }

        serde_json::from_str(&body).map_err(|source| SelectError::DeserializeRows { source })
    }
}

#[derive(Debug, Error)]
pub enum UpsertError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("RequestFailed: {status}: {body}")]
    RequestFailed {
        status: StatusCode,
        body: String,
    },
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },

    #[error("RequestFailed: {status}: {body}")]
    RequestFailed {
        status: StatusCode,
        body: String,
    },

    #[error("DeserializeRows: {source}")]
    DeserializeRows {
        source: serde_json::Error,
    },
}
