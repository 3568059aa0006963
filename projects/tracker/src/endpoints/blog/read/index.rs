use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use interfaces_supabase_postgrest::index::SupabaseClient;
use thiserror::Error;

use crate::sink::queries::{get_blog_posts, GetBlogPostsError};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("GetBlogPosts: {source}")]
    GetBlogPosts {
        #[from]
        source: GetBlogPostsError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            HandlerError::GetBlogPosts { source } => {
                (StatusCode::INTERNAL_SERVER_ERROR, source.to_string()).into_response()
            }
        }
    }
}

/// Axum handler: GET /api/blog — blog rows pass through unmodified.
pub async fn handler(Extension(sink): Extension<SupabaseClient>) -> impl IntoResponse {
    let posts = match get_blog_posts(&sink).await {
        Ok(posts) => posts,
        Err(source) => return HandlerError::GetBlogPosts { source }.into_response(),
    };

    (StatusCode::OK, Json(posts)).into_response()
}
