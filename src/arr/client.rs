use super::types::{ParsedTitle, RadarrParseResponse, SonarrParseResponse};
use crate::config::ArrConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use trackforged_common::ServiceKind;

/// Common trait for *arr API clients
#[async_trait::async_trait]
pub trait LibraryService: Send + Sync {
    /// Which service this is.
    fn kind(&self) -> ServiceKind;

    /// Ask the service what a file name refers to.
    ///
    /// `Ok(None)` means the service answered but did not recognise the name.
    async fn parse_title(&self, name: &str) -> Result<Option<ParsedTitle>>;
}

/// Create an appropriate client based on config
pub fn create_client(config: &ArrConfig, timeout: Duration) -> Box<dyn LibraryService> {
    match config.arr_type {
        ServiceKind::Radarr => Box::new(RadarrClient::new(config, timeout)),
        ServiceKind::Sonarr => Box::new(SonarrClient::new(config, timeout)),
    }
}

/// Accept `host:port` as well as full URLs; drop trailing slashes.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

struct BaseArrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BaseArrClient {
    fn new(config: &ArrConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: normalize_base_url(&config.url),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url("/parse"))
            .query(&[("title", name)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .context("Failed to GET /parse")?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            anyhow::bail!("/parse returned {}: {}", status, error);
        }

        response
            .json::<T>()
            .await
            .context("Failed to decode /parse response")
    }
}

pub struct RadarrClient(BaseArrClient);

impl RadarrClient {
    pub fn new(config: &ArrConfig, timeout: Duration) -> Self {
        Self(BaseArrClient::new(config, timeout))
    }
}

#[async_trait::async_trait]
impl LibraryService for RadarrClient {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Radarr
    }

    async fn parse_title(&self, name: &str) -> Result<Option<ParsedTitle>> {
        let response: RadarrParseResponse = self.0.parse(name).await?;
        Ok(response.movie.map(ParsedTitle::from))
    }
}

pub struct SonarrClient(BaseArrClient);

impl SonarrClient {
    pub fn new(config: &ArrConfig, timeout: Duration) -> Self {
        Self(BaseArrClient::new(config, timeout))
    }
}

#[async_trait::async_trait]
impl LibraryService for SonarrClient {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Sonarr
    }

    async fn parse_title(&self, name: &str) -> Result<Option<ParsedTitle>> {
        let response: SonarrParseResponse = self.0.parse(name).await?;
        Ok(response.series.map(ParsedTitle::from))
    }
}
