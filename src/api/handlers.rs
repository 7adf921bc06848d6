//! API Handlers
//!
//! HTTP request handlers for each cache node endpoint.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::error::{CacheError, Result};
use crate::group::{get_group, group_names};
use crate::models::{GroupsResponse, HealthResponse, StatsResponse};
use crate::peers::DEFAULT_BASE_PATH;

/// Application state shared across all handlers.
///
/// Groups themselves live in the process-wide registry; the state only
/// carries how this node presents itself.
#[derive(Debug, Clone)]
pub struct AppState {
    /// This node's URL as listed among the peers
    pub self_url: String,
    /// Prefix of the peer endpoint, starting and ending with '/'
    pub base_path: String,
}

impl AppState {
    /// Creates a new AppState serving peers under `DEFAULT_BASE_PATH`.
    pub fn new(self_url: impl Into<String>) -> Self {
        Self {
            self_url: self_url.into(),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            self_url: config.self_url.clone(),
            base_path: config.base_path.clone(),
        }
    }
}

/// Handler for GET {base_path}:group/:key
///
/// Looks the group up and answers with the raw value bytes.
pub async fn peer_get_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    info!("[Server {}] GET {}{}/{}", state.self_url, state.base_path, group_name, key);

    let group = get_group(&group_name).ok_or(CacheError::GroupNotFound(group_name))?;
    let view = group.get(&key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.to_bytes(),
    ))
}

/// Handler for GET /groups
pub async fn groups_handler() -> Json<GroupsResponse> {
    Json(GroupsResponse {
        groups: group_names(),
    })
}

/// Handler for GET /stats/:group
///
/// Returns the group's load counters and local cache metrics.
pub async fn stats_handler(Path(group_name): Path<String>) -> Result<Json<StatsResponse>> {
    let group = get_group(&group_name).ok_or_else(|| CacheError::GroupNotFound(group_name))?;

    Ok(Json(StatsResponse::new(
        group.name(),
        group.stats(),
        group.cache_stats(),
    )))
}

/// Handler for GET /health
///
/// Returns health status of the node.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.self_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{Group, GetterFn};

    fn scores_group(name: &str) {
        Group::builder(name)
            .getter(GetterFn::new(|key: &str| match key {
                "Tom" => Ok(b"630".to_vec()),
                _ => anyhow::bail!("{} not exist", key),
            }))
            .build()
            .unwrap();
    }

    #[tokio::test]
    async fn test_peer_get_handler() {
        scores_group("handlers-peer-get");
        let state = AppState::new("http://localhost:8001");

        let result = peer_get_handler(
            State(state),
            Path(("handlers-peer-get".to_string(), "Tom".to_string())),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_peer_get_unknown_group() {
        let state = AppState::new("http://localhost:8001");

        let result = peer_get_handler(
            State(state),
            Path(("handlers-missing".to_string(), "Tom".to_string())),
        )
        .await;
        assert!(matches!(result, Err(CacheError::GroupNotFound(_))));
    }

    #[tokio::test]
    async fn test_peer_get_origin_error() {
        scores_group("handlers-origin-error");
        let state = AppState::new("http://localhost:8001");

        let result = peer_get_handler(
            State(state),
            Path(("handlers-origin-error".to_string(), "Nobody".to_string())),
        )
        .await;
        assert!(matches!(result, Err(CacheError::Origin(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        scores_group("handlers-stats");
        get_group("handlers-stats").unwrap().get("Tom").await.unwrap();

        let response = stats_handler(Path("handlers-stats".to_string()))
            .await
            .unwrap();
        assert_eq!(response.group, "handlers-stats");
        assert_eq!(response.loads.origin_loads, 1);
        assert_eq!(response.cache.entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(AppState::new("http://node-a"))).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.node, "http://node-a");
    }
}
