//! Response DTOs for the cache node API
//!
//! Defines the structure of outgoing JSON response bodies. Peer responses
//! are raw bytes and have no DTO.

use serde::Serialize;

use crate::cache::{CacheStats, GroupStatsSnapshot};

/// Response body for the stats endpoint (GET /stats/:group)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Group the numbers belong to
    pub group: String,
    /// Lookup and load counters
    #[serde(flatten)]
    pub loads: GroupStatsSnapshot,
    /// Local cache metrics
    pub cache: CacheStats,
    /// Local cache hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from group and cache statistics
    pub fn new(group: impl Into<String>, loads: GroupStatsSnapshot, cache: CacheStats) -> Self {
        let hit_rate = cache.hit_rate();
        Self {
            group: group.into(),
            loads,
            cache,
            hit_rate,
        }
    }
}

/// Response body for the groups endpoint (GET /groups)
#[derive(Debug, Clone, Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<String>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// This node's own URL
    pub node: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(node: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            node: node.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
