//! FFprobe JSON handling.
//!
//! The same JSON shape arrives two ways: from running ffprobe ourselves, and
//! embedded in a host payload. Parsing is lenient per stream so one broken
//! entry never loses the rest of the inventory.

use super::types::*;
use crate::tools::require_tool;
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use trackforged_common::CodecType;

/// Top level of ffprobe's JSON. Entries stay untyped until each one is
/// deserialized on its own.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Option<Vec<Value>>,
    #[serde(default)]
    format: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: Option<Number>,
    codec_type: Option<String>,
    #[serde(default)]
    tags: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    format_long_name: Option<String>,
    size: Option<Number>,
    probe_score: Option<Number>,
    #[serde(default)]
    tags: BTreeMap<String, Value>,
}

/// ffprobe writes sizes as strings and scores as numbers; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Number {
    Int(u64),
    Text(String),
}

impl Number {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int(n) => Some(*n),
            Number::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Probe a media file using ffprobe.
pub fn probe_with_ffprobe(path: &Path) -> Result<ProbeReport> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let ffprobe = require_tool("ffprobe")?;
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::tool_failed("ffprobe", stderr.to_string()));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| Error::parse_error("ffprobe", format!("Invalid UTF-8: {}", e)))?;

    parse_probe_json(&json_str)
}

/// Parse ffprobe's `-print_format json` output.
pub fn parse_probe_json(json: &str) -> Result<ProbeReport> {
    let value: Value = serde_json::from_str(json)?;
    report_from_value(&value)
}

/// Build a report from an already-parsed ffprobe JSON object.
///
/// Missing `streams` yields an empty inventory; missing `format` yields
/// `structure.format == None`. Only a non-object root is an error.
pub fn report_from_value(value: &Value) -> Result<ProbeReport> {
    // Derived structs also accept arrays, so check the shape first.
    if !value.is_object() {
        return Err(Error::parse_error("ffprobe", "expected a JSON object"));
    }
    let output = FfprobeOutput::deserialize(value)
        .map_err(|e| Error::parse_error("ffprobe", e.to_string()))?;

    let streams = output
        .streams
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| parse_stream(position, entry))
        .collect::<Vec<_>>();

    let format = output.format.as_ref().and_then(parse_format);

    Ok(ProbeReport {
        streams: StreamInventory::new(streams),
        structure: StructuralMetadata {
            format,
            atoms: None,
        },
    })
}

fn parse_stream(position: usize, entry: &Value) -> Option<StreamRecord> {
    let raw = match FfprobeStream::deserialize(entry) {
        Ok(raw) => raw,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(position, error = %_e, "Skipping unreadable probe stream entry");
            return None;
        }
    };

    let index = raw
        .index
        .as_ref()
        .and_then(Number::as_u64)
        .map(|i| i as u32)
        .unwrap_or(position as u32);

    let codec_type = match raw.codec_type.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(kind) => Some(CodecType::from_probe(kind)),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(index, "Probe stream has no codec_type");
            None
        }
    };

    let tags = raw.tags.as_ref();
    let language = tags
        .and_then(|t| tag_value(t, "language"))
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty());
    let title = tags.and_then(|t| tag_value(t, "title")).map(str::to_string);

    Some(StreamRecord {
        index,
        codec_type,
        language,
        title,
        has_tags: tags.is_some(),
    })
}

fn parse_format(value: &Value) -> Option<FormatInfo> {
    let raw = match FfprobeFormat::deserialize(value) {
        Ok(raw) => raw,
        Err(_e) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "Ignoring unreadable probe format section");
            return None;
        }
    };

    let tags = raw
        .tags
        .iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.to_lowercase(), s.to_string())))
        .collect();

    Some(FormatInfo {
        format_name: raw.format_name,
        format_long_name: raw.format_long_name,
        size: raw.size.as_ref().and_then(Number::as_u64),
        probe_score: raw
            .probe_score
            .as_ref()
            .and_then(Number::as_u64)
            .map(|s| s as u32),
        tags,
    })
}

/// Tags are usually lower-case but some muxers write them upper-case.
fn tag_value<'a>(tags: &'a BTreeMap<String, Value>, name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.as_str())
}
