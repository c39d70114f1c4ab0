mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use trackforged_common::{language, Error};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./trackforged.toml",
        "./config.toml",
        "~/.config/trackforged/config.toml",
        "/etc/trackforged/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> trackforged_common::Result<()> {
    if !(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS).contains(&config.request_timeout_secs)
    {
        return Err(Error::config(format!(
            "request_timeout_secs must be between {} and {} (got {})",
            MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    if config.tmdb.requests_per_second == 0 {
        return Err(Error::config("tmdb.requests_per_second cannot be 0"));
    }

    // Validate arr configs
    for arr in &config.arrs {
        if arr.enabled && arr.api_key.trim().is_empty() {
            return Err(Error::config(format!(
                "Arr '{}' is enabled but has no API key",
                arr.name
            )));
        }
        if arr.enabled && arr.url.trim().is_empty() {
            return Err(Error::config(format!("Arr '{}' is enabled but has no URL", arr.name)));
        }
    }

    // Unknown codes still work as exact matches, so only warn
    let languages = config
        .languages
        .user_languages
        .iter()
        .chain(std::iter::once(&config.languages.native_language));
    for code in languages {
        if language::lookup(code).is_none() {
            tracing::warn!("Language code '{}' is not a known ISO 639 code", code);
        }
    }

    Ok(())
}
