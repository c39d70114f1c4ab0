//! TMDB (The Movie Database) metadata service.
//!
//! Implements [`MetadataService`] with the TMDB v3 `find` endpoint.
//!
//! Features:
//! - Token-bucket rate limiting via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Request timeout taken from configuration.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TmdbConfig;
use crate::metadata::provider::{MediaType, MetadataService, TitleMatch};

const MAX_RETRIES: u32 = 3;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbFindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbFindMovie>,
    #[serde(default)]
    tv_results: Vec<TmdbFindTv>,
}

#[derive(Debug, Deserialize)]
struct TmdbFindMovie {
    id: Option<u64>,
    title: Option<String>,
    original_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbFindTv {
    id: Option<u64>,
    name: Option<String>,
    original_language: Option<String>,
}

impl TmdbFindResponse {
    /// First movie result, else first TV result.
    fn into_match(self) -> Option<(Option<u64>, Option<String>, MediaType, Option<String>)> {
        if let Some(movie) = self.movie_results.into_iter().next() {
            return Some((movie.id, movie.title, MediaType::Movie, movie.original_language));
        }
        self.tv_results
            .into_iter()
            .next()
            .map(|tv| (tv.id, tv.name, MediaType::Tv, tv.original_language))
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata service.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use trackforged::config::TmdbConfig;
/// use trackforged::metadata::providers::TmdbProvider;
///
/// let config = TmdbConfig {
///     api_key: "your-api-key".into(),
///     ..Default::default()
/// };
/// let provider = TmdbProvider::new(&config, Duration::from_secs(10));
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a provider from configuration.
    ///
    /// Each provider owns its own rate limiter, so two providers never share
    /// a budget.
    pub fn new(config: &TmdbConfig, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            rate_limiter,
        }
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .send()
                .await
                .context("TMDB request failed")?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp
                .error_for_status()
                .context("TMDB request returned error")?;

            return Ok(resp);
        }
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url,
            urlencoded(&self.api_key),
            urlencoded(&self.language)
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

#[async_trait]
impl MetadataService for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn find_by_imdb(&self, imdb_id: &str) -> anyhow::Result<Option<TitleMatch>> {
        let url = self.url(
            &format!("/find/{}", urlencoded(imdb_id)),
            &[("external_source", "imdb_id")],
        );
        debug!(imdb_id, "TMDB find by IMDb id");

        let resp: TmdbFindResponse = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB find response")?;

        let Some((id, title, media_type, language)) = resp.into_match() else {
            return Ok(None);
        };

        match language.filter(|l| !l.trim().is_empty()) {
            Some(original_language) => Ok(Some(TitleMatch {
                id,
                title,
                media_type,
                original_language,
            })),
            None => {
                warn!(imdb_id, "TMDB match has no original_language");
                Ok(None)
            }
        }
    }
}
