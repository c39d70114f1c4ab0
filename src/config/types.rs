use serde::{Deserialize, Serialize};
use trackforged_common::ServiceKind;

/// Smallest allowed per-request timeout.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 5;
/// Largest allowed per-request timeout.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Which library service is asked first.
    #[serde(default)]
    pub priority: ServiceKind,

    /// Timeout applied to every outbound HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub languages: LanguagesConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub faststart: FaststartConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub arrs: Vec<ArrConfig>,
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            priority: ServiceKind::default(),
            request_timeout_secs: default_request_timeout(),
            languages: LanguagesConfig::default(),
            limits: LimitsConfig::default(),
            faststart: FaststartConfig::default(),
            tmdb: TmdbConfig::default(),
            arrs: Vec::new(),
        }
    }
}

impl Config {
    /// First enabled arr of the given kind.
    pub fn arr(&self, kind: ServiceKind) -> Option<&ArrConfig> {
        self.arrs.iter().find(|a| a.enabled && a.arr_type == kind)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguagesConfig {
    /// Languages to keep alongside the resolved native language (ISO 639-2).
    #[serde(default)]
    pub user_languages: Vec<String>,

    /// Remove commentary, description, and SDH tracks.
    #[serde(default)]
    pub drop_commentary: bool,

    /// Apply the language policy to subtitles as well as audio.
    #[serde(default = "default_true")]
    pub filter_subtitles: bool,

    /// Native language for the offline keep-native plugin.
    #[serde(default = "default_native_language")]
    pub native_language: String,
}

fn default_true() -> bool {
    true
}

fn default_native_language() -> String {
    "eng".to_string()
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            user_languages: Vec::new(),
            drop_commentary: false,
            filter_subtitles: default_true(),
            native_language: default_native_language(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Skip files above `max_file_size_gb`.
    #[serde(default)]
    pub skip_large_files: bool,

    #[serde(default = "default_max_file_size_gb")]
    pub max_file_size_gb: u64,

    /// Containers the track plugins accept.
    #[serde(default = "default_track_containers")]
    pub containers: Vec<String>,
}

fn default_max_file_size_gb() -> u64 {
    50
}

fn default_track_containers() -> Vec<String> {
    ["mkv", "mp4", "m4v", "mov"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            skip_large_files: false,
            max_file_size_gb: default_max_file_size_gb(),
            containers: default_track_containers(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FaststartConfig {
    /// Rewrite even when the file already looks optimized.
    #[serde(default)]
    pub force_reprocess: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,

    /// Response language sent with every request.
    #[serde(default = "default_tmdb_language")]
    pub language: String,

    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_requests_per_second() -> u32 {
    4
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_tmdb_base_url(),
            language: default_tmdb_language(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArrConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub arr_type: ServiceKind,

    /// Base URL. A bare `host:port` gets `http://` prepended.
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ArrConfig {
    /// Whether this entry can be queried at all.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.url.trim().is_empty()
    }
}
