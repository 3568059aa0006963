use std::net::SocketAddr;

use axum::{
	extract::Extension,
	http::HeaderValue,
	routing::get,
	serve, Router,
};
use interfaces_supabase_postgrest::index::SupabaseClient;
use projects_tracker::config::{ConfigError, StoreConfig};
use projects_tracker::endpoints::blog::read::index::handler as blog_read_handler;
use projects_tracker::endpoints::status::read::index::handler as status_read_handler;
use projects_tracker::endpoints::tracking::read::index::handler as tracking_read_handler;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;
use utils_trace::tracing_init;

const ALLOWED_ORIGINS: [&str; 3] = [
	"http://localhost:5173",
	"http://localhost:3000",
	"http://localhost:3001",
];

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
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	}
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	dotenvy::dotenv().ok();

    tracing_init("info")
        .map_err(|source| MainError::TracingInit { source })?;

	let store = StoreConfig::from_env_for_api()
		.map_err(|source| MainError::Config { source })?;
	let sink = SupabaseClient::new(store.url, store.key);

	let cors = CorsLayer::new()
		.allow_origin(AllowOrigin::list(
			ALLOWED_ORIGINS
				.iter()
				.filter_map(|origin| origin.parse::<HeaderValue>().ok()),
		))
		.allow_methods(Any)
		.allow_headers(Any);

	// Set up the router
	let app = Router::new()
		.route("/", get(status_read_handler))
		.route("/api/blog", get(blog_read_handler))
		.route("/api/tracking", get(tracking_read_handler))
		.layer(Extension(sink))
		.layer(cors);

	let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
	let listener = tokio::net::TcpListener::bind(addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", addr);

	serve(listener, app)
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
