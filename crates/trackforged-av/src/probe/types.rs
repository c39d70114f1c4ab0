//! Types describing what a probe saw in a media file.

use crate::mp4::AtomLayout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trackforged_common::CodecType;

/// One elementary stream as reported by the probe.
///
/// `index` is the absolute stream index in the container. Per-type positions
/// (the `N` in `0:a:N`) are derived by [`StreamInventory::positions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Absolute stream index.
    pub index: u32,
    /// Stream kind. `None` when the probe entry was missing or malformed.
    pub codec_type: Option<CodecType>,
    /// Language tag, lower-cased. Empty strings are stored as `None`.
    pub language: Option<String>,
    /// Track title tag.
    pub title: Option<String>,
    /// Whether the probe reported a `tags` object at all.
    #[serde(default)]
    pub has_tags: bool,
}

impl StreamRecord {
    /// Create a record with no tags.
    pub fn new(index: u32, codec_type: CodecType) -> Self {
        Self {
            index,
            codec_type: Some(codec_type),
            language: None,
            title: None,
            has_tags: false,
        }
    }

    /// Set the language tag (marks the record as tagged).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into().trim().to_lowercase();
        self.language = if language.is_empty() {
            None
        } else {
            Some(language)
        };
        self.has_tags = true;
        self
    }

    /// Set the title tag (marks the record as tagged).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.has_tags = true;
        self
    }

    /// Mark the record as carrying an (otherwise empty) tags object.
    pub fn tagged(mut self) -> Self {
        self.has_tags = true;
        self
    }

    pub fn is_video(&self) -> bool {
        self.codec_type == Some(CodecType::Video)
    }
}

/// A stream together with its position among streams of the same kind.
#[derive(Debug, Clone, Copy)]
pub struct Positioned<'a> {
    /// Zero-based position among streams with the same codec type.
    pub position: u32,
    pub stream: &'a StreamRecord,
}

/// Ordered list of streams in container order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamInventory {
    streams: Vec<StreamRecord>,
}

impl StreamInventory {
    pub fn new(streams: Vec<StreamRecord>) -> Self {
        Self { streams }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StreamRecord> {
        self.streams.iter()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams of one codec type, each paired with its per-type position.
    pub fn positions(&self, codec_type: CodecType) -> Vec<Positioned<'_>> {
        self.streams
            .iter()
            .filter(|s| s.codec_type.as_ref() == Some(&codec_type))
            .enumerate()
            .map(|(position, stream)| Positioned {
                position: position as u32,
                stream,
            })
            .collect()
    }

    pub fn count(&self, codec_type: CodecType) -> usize {
        self.streams
            .iter()
            .filter(|s| s.codec_type.as_ref() == Some(&codec_type))
            .count()
    }

    pub fn has_video(&self) -> bool {
        self.streams.iter().any(StreamRecord::is_video)
    }

    pub fn as_slice(&self) -> &[StreamRecord] {
        &self.streams
    }
}

impl From<Vec<StreamRecord>> for StreamInventory {
    fn from(streams: Vec<StreamRecord>) -> Self {
        Self::new(streams)
    }
}

impl<'a> IntoIterator for &'a StreamInventory {
    type Item = &'a StreamRecord;
    type IntoIter = std::slice::Iter<'a, StreamRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.iter()
    }
}

/// Container-level information from the probe's `format` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatInfo {
    pub format_name: Option<String>,
    pub format_long_name: Option<String>,
    pub size: Option<u64>,
    /// How sure the probe was about the format, 0-100.
    pub probe_score: Option<u32>,
    /// Container tags keyed by lower-cased tag name.
    pub tags: BTreeMap<String, String>,
}

impl FormatInfo {
    /// Case-insensitive tag lookup.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Everything the faststart detector can look at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralMetadata {
    /// Probe format section, if the probe produced one.
    pub format: Option<FormatInfo>,
    /// Top-level atom layout read directly from the file.
    pub atoms: Option<AtomLayout>,
}

/// Result of probing one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub streams: StreamInventory,
    pub structure: StructuralMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_are_per_type() {
        let inventory = StreamInventory::new(vec![
            StreamRecord::new(0, CodecType::Video),
            StreamRecord::new(1, CodecType::Audio).with_language("eng"),
            StreamRecord::new(2, CodecType::Subtitle).with_language("eng"),
            StreamRecord::new(3, CodecType::Audio).with_language("fre"),
        ]);

        let audio = inventory.positions(CodecType::Audio);
        assert_eq!(audio.len(), 2);
        assert_eq!(audio[0].position, 0);
        assert_eq!(audio[0].stream.index, 1);
        assert_eq!(audio[1].position, 1);
        assert_eq!(audio[1].stream.index, 3);

        let subs = inventory.positions(CodecType::Subtitle);
        assert_eq!(subs[0].position, 0);
        assert_eq!(subs[0].stream.index, 2);
    }

    #[test]
    fn test_empty_language_is_none() {
        let stream = StreamRecord::new(1, CodecType::Audio).with_language("  ");
        assert!(stream.language.is_none());
        assert!(stream.has_tags);
    }

    #[test]
    fn test_format_tag_case_insensitive() {
        let mut format = FormatInfo::default();
        format
            .tags
            .insert("major_brand".to_string(), "isom".to_string());
        assert_eq!(format.tag("MAJOR_BRAND"), Some("isom"));
        assert_eq!(format.tag("movflags"), None);
    }
}
