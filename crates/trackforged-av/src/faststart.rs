//! Faststart detection.
//!
//! Signals are checked in order and the first confident one wins:
//!
//! 1. Atom order read from the file (`moov` before `mdat`)
//! 2. A `movflags` container tag mentioning faststart
//! 3. `isom` major brand that also lists `isom` as compatible
//! 4. Probe score of at least [`HIGH_PROBE_SCORE`]
//!
//! If none fires the file is assumed to need work. When the report has
//! neither a format section nor an atom layout the status is
//! [`FaststartStatus::Unknown`] and callers must not process the file.
//!
//! Signals 3 and 4 are weak: an `isom` file muxed without faststart, or any
//! cleanly probed MP4, reads as optimized. They only run when no atom layout
//! is available.

use crate::probe::StructuralMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probe scores at or above this are taken as a sign of a well-formed,
/// front-loaded file.
pub const HIGH_PROBE_SCORE: u32 = 95;

/// Faststart state of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaststartStatus {
    /// Metadata already precedes media data.
    Optimized,
    /// The file should be rewritten with faststart.
    NeedsOptimization,
    /// Not enough information to tell.
    Unknown,
}

impl fmt::Display for FaststartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimized => write!(f, "optimized"),
            Self::NeedsOptimization => write!(f, "needs optimization"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Which signal decided the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    AtomOrder { moov_first: bool },
    MovFlags(String),
    IsomBrand { compatible: String },
    ProbeScore(u32),
    /// No signal fired; the conservative default applied.
    Default,
    /// Nothing to look at.
    NoData,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtomOrder { moov_first: true } => write!(f, "moov atom precedes mdat"),
            Self::AtomOrder { moov_first: false } => write!(f, "mdat atom precedes moov"),
            Self::MovFlags(value) => write!(f, "movflags tag: {}", value),
            Self::IsomBrand { compatible } => {
                write!(f, "ISO base media brand (compatible: {})", compatible)
            }
            Self::ProbeScore(score) => write!(f, "probe score {}", score),
            Self::Default => write!(f, "no faststart indicator found"),
            Self::NoData => write!(f, "no format information or atom layout"),
        }
    }
}

/// Outcome of [`detect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub status: FaststartStatus,
    pub signal: Signal,
    /// What was looked at, for the decision rationale.
    pub notes: Vec<String>,
}

impl Detection {
    fn new(status: FaststartStatus, signal: Signal, notes: Vec<String>) -> Self {
        Self {
            status,
            signal,
            notes,
        }
    }
}

/// Decide whether a file already has a faststart layout.
pub fn detect(structure: &StructuralMetadata) -> Detection {
    let mut notes = Vec::new();

    if let Some(layout) = &structure.atoms {
        notes.push(format!("Top-level atoms: {}", layout.summary()));
        if let Some(moov_first) = layout.is_faststart() {
            let status = if moov_first {
                FaststartStatus::Optimized
            } else {
                FaststartStatus::NeedsOptimization
            };
            return Detection::new(status, Signal::AtomOrder { moov_first }, notes);
        }
        notes.push("Atom layout has no moov atom, falling back to tags".to_string());
    }

    let Some(format) = &structure.format else {
        #[cfg(feature = "tracing")]
        tracing::debug!("No format section and no usable atom layout");
        return Detection::new(FaststartStatus::Unknown, Signal::NoData, notes);
    };

    notes.push(format!(
        "Format: {} ({})",
        format.format_name.as_deref().unwrap_or("unknown"),
        format.format_long_name.as_deref().unwrap_or("unknown")
    ));

    if let Some(flags) = format.tag("movflags") {
        if flags.to_lowercase().contains("faststart") {
            return Detection::new(
                FaststartStatus::Optimized,
                Signal::MovFlags(flags.to_string()),
                notes,
            );
        }
    }

    if let Some(major) = format.tag("major_brand") {
        let compatible = format.tag("compatible_brands").unwrap_or_default();
        notes.push(format!("Major brand: {}, Compatible: {}", major, compatible));
        if major.trim().eq_ignore_ascii_case("isom")
            && compatible.to_lowercase().contains("isom")
        {
            return Detection::new(
                FaststartStatus::Optimized,
                Signal::IsomBrand {
                    compatible: compatible.to_string(),
                },
                notes,
            );
        }
    }

    let score = format.probe_score.unwrap_or(0);
    notes.push(format!("Probe score: {}", score));
    if score >= HIGH_PROBE_SCORE {
        return Detection::new(FaststartStatus::Optimized, Signal::ProbeScore(score), notes);
    }

    Detection::new(FaststartStatus::NeedsOptimization, Signal::Default, notes)
}
