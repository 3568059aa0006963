//! Developer-activity stats tracking service
//!
//! - REST API endpoints in `endpoints/`
//! - GitHub and LeetCode aggregators in `stats/`
//! - Supabase sink rows and queries in `sink/`
//! - Store credentials come from SUPABASE_URL / SUPABASE_KEY env vars

pub mod config;
pub mod endpoints;
pub mod sink;
pub mod stats;
