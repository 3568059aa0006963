use std::env;

use thiserror::Error;

pub const DEFAULT_LEETCODE_USERNAME: &str = "kaylode";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SUPABASE_URL is not set")]
    MissingStoreUrl,

    #[error("SUPABASE_KEY (or SUPABASE_SERVICE_KEY) is not set")]
    MissingStoreKey,
}

/// Connection settings for the backing store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
}

impl StoreConfig {
    /// Store settings for the batch job. The service-role key is preferred
    /// so upserts bypass row level security; falls back to the general key.
    pub fn from_env_for_job() -> Result<Self, ConfigError> {
        let url = non_empty_var("SUPABASE_URL").ok_or(ConfigError::MissingStoreUrl)?;
        let key = non_empty_var("SUPABASE_SERVICE_KEY")
            .or_else(|| non_empty_var("SUPABASE_KEY"))
            .ok_or(ConfigError::MissingStoreKey)?;

        Ok(Self { url, key })
    }

    /// Store settings for the read API, always on the general key.
    pub fn from_env_for_api() -> Result<Self, ConfigError> {
        let url = non_empty_var("SUPABASE_URL").ok_or(ConfigError::MissingStoreUrl)?;
        let key = non_empty_var("SUPABASE_KEY").ok_or(ConfigError::MissingStoreKey)?;

        Ok(Self { url, key })
    }
}

/// GitHub access is optional: when either half is missing the GitHub
/// aggregation is skipped rather than failed.
#[derive(Debug, Clone)]
pub struct GithubCredentials {
    pub token: String,
    pub username: String,
}

impl GithubCredentials {
    pub fn from_env() -> Option<Self> {
        let token = non_empty_var("GITHUB_TOKEN")?;
        let username = non_empty_var("GITHUB_USERNAME")?;

        Some(Self { token, username })
    }
}

/// The LeetCode username may differ from the GitHub one; env override with
/// a fixed default.
pub fn leetcode_username_from_env() -> String {
    non_empty_var("LEETCODE_USERNAME").unwrap_or_else(|| DEFAULT_LEETCODE_USERNAME.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
