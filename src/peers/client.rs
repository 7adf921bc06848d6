//! HTTP Peer Client
//!
//! Fetches values from another node's peer endpoint.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::peers::PeerGetter;

// == HTTP Getter ==
/// Talks to a single remote node rooted at `base_url`
/// (e.g. `http://10.0.0.2:8001/cache/`).
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    client: Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}{group}/{key}` with both segments percent-encoded.
    pub fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes> {
        let url = self.url_for(group, key);
        debug!("Fetching {} from peer", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::Peer(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Peer(format!("server returned: {}", status)));
        }

        response
            .bytes()
            .await
            .map_err(|e| CacheError::Peer(format!("reading response body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_encodes_segments() {
        let getter = HttpGetter::new("http://localhost:8001/cache/", Client::new());

        assert_eq!(
            getter.url_for("scores", "Tom"),
            "http://localhost:8001/cache/scores/Tom"
        );
        assert_eq!(
            getter.url_for("my group", "a/b?c"),
            "http://localhost:8001/cache/my%20group/a%2Fb%3Fc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_peer_is_peer_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let getter = HttpGetter::new("http://127.0.0.1:9/cache/", Client::new());
        let result = getter.get("scores", "Tom").await;

        assert!(matches!(result, Err(CacheError::Peer(_))));
    }
}
