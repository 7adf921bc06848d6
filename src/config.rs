//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::hashring::DEFAULT_REPLICAS;
use crate::peers::DEFAULT_BASE_PATH;

const DEFAULT_CACHE_BYTES: u64 = 64 * 1024 * 1024;
const DEFAULT_PORT: u16 = 8001;
const DEFAULT_GROUP: &str = "scores";
const DEFAULT_SEED: &str = "Tom=630,Jack=589,Sam=567";

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget of the group's local cache (0 = unbounded)
    pub cache_bytes: u64,
    /// HTTP server port
    pub server_port: u16,
    /// This node's URL as it appears in the peer list
    pub self_url: String,
    /// Every node in the cluster, including this one
    pub peers: Vec<String>,
    /// Name of the group this node serves
    pub group_name: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Path prefix of the peer endpoint
    pub base_path: String,
    /// Key/value pairs backing the demo origin
    pub origin_seed: Vec<(String, String)>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BYTES` - Cache byte budget (default: 64 MiB)
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_URL` - This node's URL (default: http://localhost:{SERVER_PORT})
    /// - `PEERS` - Comma separated peer URLs (default: none besides self)
    /// - `GROUP_NAME` - Group to serve (default: scores)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `BASE_PATH` - Peer endpoint prefix (default: /cache/)
    /// - `ORIGIN_SEED` - Demo origin data as `key=value,...`
    pub fn from_env() -> Self {
        let server_port = parse_env("SERVER_PORT", DEFAULT_PORT);
        let self_url = env::var("SELF_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));
        let peers = with_self(
            env::var("PEERS").map(|v| split_list(&v)).unwrap_or_default(),
            &self_url,
        );

        Self {
            cache_bytes: parse_env("CACHE_BYTES", DEFAULT_CACHE_BYTES),
            server_port,
            self_url,
            peers,
            group_name: env::var("GROUP_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            replicas: parse_env("REPLICAS", DEFAULT_REPLICAS),
            base_path: normalize_base_path(
                &env::var("BASE_PATH").unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string()),
            ),
            origin_seed: parse_seed(
                &env::var("ORIGIN_SEED").unwrap_or_else(|_| DEFAULT_SEED.to_string()),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_url = format!("http://localhost:{}", DEFAULT_PORT);
        Self {
            cache_bytes: DEFAULT_CACHE_BYTES,
            server_port: DEFAULT_PORT,
            peers: vec![self_url.clone()],
            self_url,
            group_name: DEFAULT_GROUP.to_string(),
            replicas: DEFAULT_REPLICAS,
            base_path: DEFAULT_BASE_PATH.to_string(),
            origin_seed: parse_seed(DEFAULT_SEED),
        }
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

fn with_self(mut peers: Vec<String>, self_url: &str) -> Vec<String> {
    if !peers.iter().any(|p| p == self_url) {
        peers.push(self_url.to_string());
    }
    peers
}

/// Ensures the prefix starts and ends with '/'.
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

fn parse_seed(value: &str) -> Vec<(String, String)> {
    value
        .split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_bytes, 64 * 1024 * 1024);
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_url, "http://localhost:8001");
        assert_eq!(config.peers, vec!["http://localhost:8001".to_string()]);
        assert_eq!(config.group_name, "scores");
        assert_eq!(config.replicas, 50);
        assert_eq!(config.base_path, "/cache/");
        assert_eq!(config.origin_seed.len(), 3);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" http://a:1/ , ,http://b:2"),
            vec!["http://a:1".to_string(), "http://b:2".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_with_self_adds_missing_self() {
        let peers = with_self(vec!["http://a".to_string()], "http://me");
        assert_eq!(peers, vec!["http://a".to_string(), "http://me".to_string()]);

        let peers = with_self(vec!["http://me".to_string()], "http://me");
        assert_eq!(peers.len(), 1);
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("cache"), "/cache/");
        assert_eq!(normalize_base_path("/_peers/"), "/_peers/");
        assert_eq!(normalize_base_path(""), "/");
    }

    #[test]
    fn test_parse_seed() {
        let seed = parse_seed("Tom=630, Jack = 589,broken,=1");
        assert_eq!(
            seed,
            vec![
                ("Tom".to_string(), "630".to_string()),
                ("Jack".to_string(), "589".to_string()),
            ]
        );
    }
}
