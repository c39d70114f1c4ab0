use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use trackforged_av::{ProbeReport, StreamInventory, StructuralMetadata};

use crate::decision::is_cache_file;

/// Everything a plugin knows about one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginInput {
    /// Container name without a dot (`mkv`).
    pub container: String,
    /// File size in bytes.
    pub file_size: u64,
    /// File name as the library services know it.
    pub display_name: String,
    pub path: String,
    pub streams: StreamInventory,
    /// Probe format section and atom layout.
    pub structure: StructuralMetadata,
    /// The host flagged this as one of its own intermediate files.
    pub cache_marker: bool,
}

impl PluginInput {
    /// Build an input from a local probe of `path`.
    pub fn from_probe(path: &Path, report: ProbeReport) -> Self {
        let path_str = path.display().to_string();
        let container = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let file_size = std::fs::metadata(path)
            .map(|m| m.len())
            .ok()
            .or_else(|| report.structure.format.as_ref().and_then(|f| f.size))
            .unwrap_or(0);
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Self {
            container,
            file_size,
            display_name,
            cache_marker: is_cache_file(&path_str),
            path: path_str,
            streams: report.streams,
            structure: report.structure,
        }
    }

    /// Parse the host's file object.
    ///
    /// Reads `_id` (path), `container`, `file_size`, `meta.FileName` and the
    /// embedded `ffProbeData`. Missing fields fall back to empty values.
    pub fn from_host_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).context("Host payload is not valid JSON")?;
        Self::from_host_value(&value)
    }

    pub fn from_host_value(value: &Value) -> Result<Self> {
        let file = value
            .as_object()
            .context("Host payload must be a JSON object")?;

        let path = file
            .get("_id")
            .or_else(|| file.get("file"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let container = file
            .get("container")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim_start_matches('.')
            .to_lowercase();
        let file_size = file
            .get("file_size")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f as u64)))
            .unwrap_or(0);
        let display_name = file
            .get("meta")
            .and_then(|m| m.get("FileName"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                Path::new(&path)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string()
            });

        let report = match file.get("ffProbeData") {
            Some(probe) => trackforged_av::probe::report_from_value(probe)
                .context("Host payload has unreadable ffProbeData")?,
            None => ProbeReport::default(),
        };

        Ok(Self {
            container,
            file_size,
            display_name,
            cache_marker: is_cache_file(&path),
            path,
            streams: report.streams,
            structure: report.structure,
        })
    }
}
