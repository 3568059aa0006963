use serde::{Deserialize, Serialize};

pub const STATS_TABLE: &str = "tracking_stats";
pub const STATS_CONFLICT_COLUMN: &str = "category";
pub const BLOG_TABLE: &str = "blog_posts";

/// One sink row: a category key and the stats blob stored under it. Each
/// aggregator run overwrites the whole blob for its category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRecord {
    pub category: String,
    pub data: serde_json::Value,
}
