//! Remote source served over HTTP(S).

use super::EpisodeSource;
use crate::catalog::{self, EpisodeDescriptor, EpisodeRecord};
use crate::config::SourceSettings;
use crate::error::{HarkError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Fetches the index and chunk files relative to a base URL.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
    layout: SourceSettings,
}

impl HttpSource {
    pub fn from_settings(settings: &SourceSettings) -> Result<Self> {
        let mut base = settings.base_url.trim().to_string();
        // Url::join drops the last path segment unless it ends with a slash.
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            layout: settings.clone(),
        })
    }

    fn index_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.layout.index_file)?)
    }

    fn chunk_url(&self, chunk: u32) -> Result<Url> {
        Ok(self.base_url.join(&self.layout.chunk_file(chunk))?)
    }

    async fn get_bytes(&self, url: Url) -> std::result::Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl EpisodeSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.to_string()
    }

    #[instrument(skip(self))]
    async fn fetch_index(&self) -> Result<Vec<EpisodeDescriptor>> {
        let url = self.index_url()?;
        debug!("GET {}", url);
        let bytes = self
            .get_bytes(url)
            .await
            .map_err(|e| HarkError::IndexUnavailable(e.to_string()))?;
        catalog::parse_index(&bytes)
    }

    #[instrument(skip(self))]
    async fn fetch_chunk(&self, chunk: u32) -> Result<Vec<EpisodeRecord>> {
        let url = self.chunk_url(chunk)?;
        debug!("GET {}", url);
        let bytes = self
            .get_bytes(url)
            .await
            .map_err(|e| HarkError::chunk_load(chunk, e))?;
        catalog::parse_chunk(chunk, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_resolve_under_base_path() {
        let settings = SourceSettings {
            base_url: "https://lessons.example.com/data".to_string(),
            ..SourceSettings::default()
        };
        let source = HttpSource::from_settings(&settings).unwrap();

        assert_eq!(
            source.index_url().unwrap().as_str(),
            "https://lessons.example.com/data/episodes-index.json"
        );
        assert_eq!(
            source.chunk_url(12).unwrap().as_str(),
            "https://lessons.example.com/data/episodes-chunk-12.json"
        );
    }
}
