//! Media file probing module.
//!
//! Reports come from ffprobe JSON (run here or handed over by the host).
//! For MP4-family files the top-level atom layout is read directly as well,
//! so the faststart detector has a structural signal to work with.

mod ffprobe;
mod types;

pub use ffprobe::{parse_probe_json, probe_with_ffprobe, report_from_value};
pub use types::*;

use crate::mp4;
use crate::Result;
use std::path::Path;

/// Container names that use the ISO base media layout.
pub const MP4_FAMILY: &[&str] = &["mp4", "mov", "m4v"];

/// Whether a container name (or ffprobe `format_name` list) is MP4-family.
pub fn is_mp4_family(container: &str) -> bool {
    container
        .split(',')
        .map(|c| c.trim().to_lowercase())
        .any(|c| MP4_FAMILY.contains(&c.as_str()))
}

/// Probe a media file with ffprobe and attach the atom layout for MP4s.
///
/// A failing atom scan is not an error: the report just carries no layout.
pub fn probe(path: &Path) -> Result<ProbeReport> {
    let mut report = probe_with_ffprobe(path)?;

    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(is_mp4_family)
        .unwrap_or(false);
    let by_format = report
        .structure
        .format
        .as_ref()
        .and_then(|f| f.format_name.as_deref())
        .map(is_mp4_family)
        .unwrap_or(false);

    if by_extension || by_format {
        attach_atoms(path, &mut report);
    }

    Ok(report)
}

/// Read the top-level atom layout of `path` into `report`.
pub fn attach_atoms(path: &Path, report: &mut ProbeReport) {
    match mp4::scan_file(path) {
        Ok(layout) => report.structure.atoms = Some(layout),
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("Atom scan of {} failed: {}", path.display(), _e);
        }
    }
}
