use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;

use crate::core::plugins::{ManifestSource, PluginError, RawManifest};

/// Fetches the remote plugin index: a single manifest listing every plugin
/// that can be installed.
pub struct PluginIndexClient {
    client: Client,
    url: String,
}

impl PluginIndexClient {
    pub fn new(url: impl Into<String>) -> Result<Self, PluginError> {
        let url = url.into();

        let mut headers = HeaderMap::new();
        headers.insert(
            "User-Agent",
            HeaderValue::from_static(concat!("modmail/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| PluginError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { client, url })
    }

    fn fetch_error(&self, e: impl std::fmt::Display) -> PluginError {
        PluginError::Fetch {
            url: self.url.clone(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl ManifestSource for PluginIndexClient {
    fn describe(&self) -> String {
        format!("plugin index {}", self.url)
    }

    fn is_local(&self) -> bool {
        false
    }

    async fn load_manifests(&self) -> Result<Vec<RawManifest>, PluginError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.fetch_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.fetch_error(format!("server responded with {}", status)));
        }

        let text = response.text().await.map_err(|e| self.fetch_error(e))?;
        tracing::debug!(url = %self.url, bytes = text.len(), "Fetched plugin index");

        Ok(vec![RawManifest {
            origin: self.url.clone(),
            text,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_itself_with_the_url() {
        let client = PluginIndexClient::new("https://example.com/plugins.toml").unwrap();

        assert_eq!(
            client.describe(),
            "plugin index https://example.com/plugins.toml"
        );
        assert!(!client.is_local());
    }

    #[tokio::test]
    async fn unreachable_index_is_a_fetch_error() {
        // Port 9 (discard) on localhost is never an HTTP server.
        let client = PluginIndexClient::new("http://127.0.0.1:9/plugins.toml").unwrap();

        match client.load_manifests().await {
            Err(PluginError::Fetch { url, .. }) => {
                assert_eq!(url, "http://127.0.0.1:9/plugins.toml")
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
