//! Trait definition and types for metadata services.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Whether a match is a movie or a TV show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

/// A title found by external id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMatch {
    /// Provider-specific identifier (e.g. TMDB numeric ID).
    pub id: Option<u64>,
    pub title: Option<String>,
    pub media_type: MediaType,
    /// ISO 639-1 code as the provider reports it (`"ja"`, sometimes `"cn"`).
    pub original_language: String,
}

/// Async trait for services that can resolve an external id to a title.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Short, lowercase identifier for this service (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the service has credentials and can be queried.
    fn is_available(&self) -> bool;

    /// Find a title by IMDb id.
    ///
    /// `Ok(None)` means the service answered but knows no such title.
    async fn find_by_imdb(&self, imdb_id: &str) -> anyhow::Result<Option<TitleMatch>>;
}

/// Pull an IMDb id out of an arbitrary string.
///
/// Strings that already start with `tt` are taken as-is; anything else is
/// searched for `tt` followed by seven or eight digits.
pub fn extract_imdb_id(input: &str) -> Option<String> {
    static IMDB_ID: OnceLock<Option<Regex>> = OnceLock::new();

    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.starts_with("tt") {
        return Some(input.to_string());
    }

    let re = IMDB_ID
        .get_or_init(|| Regex::new(r"tt\d{7,8}").ok())
        .as_ref()?;
    re.find(input).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imdb_id_passthrough() {
        assert_eq!(extract_imdb_id("tt0245429").as_deref(), Some("tt0245429"));
    }

    #[test]
    fn imdb_id_from_filename() {
        assert_eq!(
            extract_imdb_id("Spirited Away (2001) {imdb-tt0245429} 1080p.mkv").as_deref(),
            Some("tt0245429")
        );
        assert_eq!(
            extract_imdb_id("show.s01e01.tt12345678.mkv").as_deref(),
            Some("tt12345678")
        );
    }

    #[test]
    fn imdb_id_absent() {
        assert_eq!(extract_imdb_id("Some.Movie.2001.1080p.mkv"), None);
        assert_eq!(extract_imdb_id("movie tt123456"), None);
        assert_eq!(extract_imdb_id("   "), None);
    }
}
