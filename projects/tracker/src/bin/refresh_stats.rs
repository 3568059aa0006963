use interfaces_supabase_postgrest::index::SupabaseClient;
use projects_tracker::config::{
	leetcode_username_from_env, ConfigError, GithubCredentials, StoreConfig,
};
use projects_tracker::stats::github::{refresh_github_stats, GithubRefresh};
use projects_tracker::stats::leetcode::refresh_leetcode_stats;
use thiserror::Error;
use tracing::{error, info};
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
	#[error("Config: {source}")]
	Config {
		#[source]
		source: ConfigError,
	},
}

/// One-shot batch job: GitHub first, then LeetCode. A failed aggregator is
/// logged and the next one still runs; only missing store credentials abort
/// the process.
#[tokio::main]
async fn main() -> Result<(), MainError> {
	dotenvy::dotenv().ok();

    tracing_init("info")
        .map_err(|source| MainError::TracingInit { source })?;

	let store = StoreConfig::from_env_for_job()
		.map_err(|source| MainError::Config { source })?;
	let sink = SupabaseClient::new(store.url, store.key);

	info!("Starting stats refresh");

	let creds = GithubCredentials::from_env();
	match refresh_github_stats(&sink, creds.as_ref()).await {
		Ok(GithubRefresh::Skipped) => info!("GitHub stats skipped"),
		Ok(GithubRefresh::Updated { total_stars }) => {
			info!(total_stars, "GitHub stats updated")
		}
		Err(err) => error!("Error refreshing GitHub stats: {err}"),
	}

	let username = leetcode_username_from_env();
	match refresh_leetcode_stats(&sink, &username).await {
		Ok(refresh) => info!(
			solved = refresh.solved,
			total_questions = refresh.total_questions,
			"LeetCode stats updated"
		),
		Err(err) => error!("Error refreshing LeetCode stats: {err}"),
	}

	info!("Stats refresh complete");

	Ok(())
}
