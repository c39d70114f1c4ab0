//! Core type definitions for streams and library services.
//!
//! All enums serialize in lowercase, matching how probe reports and plugin
//! inputs spell them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of elementary stream as reported by the probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    /// Video stream.
    Video,
    /// Audio stream.
    Audio,
    /// Subtitle stream.
    Subtitle,
    /// Attached file, e.g. a font for styled subtitles.
    Attachment,
    /// Data stream (timecodes, chapters as streams, ...).
    Data,
    /// Anything else the probe reports.
    #[serde(untagged)]
    Other(String),
}

impl CodecType {
    /// Parse a probe `codec_type` field. Case-insensitive; never fails.
    pub fn from_probe(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "video" => Self::Video,
            "audio" => Self::Audio,
            "subtitle" => Self::Subtitle,
            "attachment" => Self::Attachment,
            "data" => Self::Data,
            other => Self::Other(other.to_string()),
        }
    }

    /// Short stream specifier used in map directives (`v`, `a`, `s`, `t`, `d`).
    pub fn specifier(&self) -> Option<&'static str> {
        match self {
            Self::Video => Some("v"),
            Self::Audio => Some("a"),
            Self::Subtitle => Some("s"),
            Self::Attachment => Some("t"),
            Self::Data => Some("d"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
            Self::Subtitle => write!(f, "subtitle"),
            Self::Attachment => write!(f, "attachment"),
            Self::Data => write!(f, "data"),
            Self::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// Library-management service that can map a file name to catalog IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Movie library manager.
    #[default]
    Radarr,
    /// TV library manager.
    Sonarr,
}

impl ServiceKind {
    /// The other service, used to build a two-entry priority order.
    pub fn other(self) -> Self {
        match self {
            Self::Radarr => Self::Sonarr,
            Self::Sonarr => Self::Radarr,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radarr => write!(f, "radarr"),
            Self::Sonarr => write!(f, "sonarr"),
        }
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "radarr" => Ok(Self::Radarr),
            "sonarr" => Ok(Self::Sonarr),
            _ => Err(format!("Unknown service: {}", s)),
        }
    }
}
