//! Library-management services (Radarr, Sonarr).
//!
//! Only the `parse` endpoint is used: it maps a release or file name to the
//! catalog entry the service knows, which carries the IMDb id.

mod client;
mod types;

pub use client::{create_client, normalize_base_url, LibraryService, RadarrClient, SonarrClient};
pub use types::*;
