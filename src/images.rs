use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::models::ImageResult;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ImageSearchError {
    #[error("invalid search URL: {0}")]
    InvalidUrl(String),
    #[error("image search request failed: {0}")]
    Request(String),
    #[error("image search returned HTTP {0}")]
    Upstream(u16),
    #[error("could not parse image search response: {0}")]
    Parse(String),
}

// ── Service seam ─────────────────────────────────────────────────────────────

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Best landscape photo for `query`, if the provider has one.
    async fn search(&self, query: &str) -> Result<Option<ImageResult>, ImageSearchError>;
}

// ── Unsplash client ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
    alt_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

pub struct UnsplashClient {
    client: reqwest::Client,
    api_base: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(client: reqwest::Client, api_base: &str, access_key: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        }
    }

    fn search_url(&self, query: &str) -> Result<Url, ImageSearchError> {
        let mut url = Url::parse(&format!("{}/search/photos", self.api_base))
            .map_err(|e| ImageSearchError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("per_page", "1")
            .append_pair("orientation", "landscape");
        Ok(url)
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> Result<Option<ImageResult>, ImageSearchError> {
        let url = self.search_url(query)?;

        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Client-ID {}", self.access_key),
            )
            .send()
            .await
            .map_err(|e| ImageSearchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImageSearchError::Upstream(response.status().as_u16()));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ImageSearchError::Parse(e.to_string()))?;

        Ok(first_result(parsed))
    }
}

fn first_result(response: SearchResponse) -> Option<ImageResult> {
    response.results.into_iter().next().map(|photo| ImageResult {
        url: photo.urls.regular,
        description: photo.alt_description.filter(|d| !d.trim().is_empty()),
    })
}
