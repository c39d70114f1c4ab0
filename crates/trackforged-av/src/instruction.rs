//! Remux instruction building.
//!
//! An [`Instruction`] is the flat argument list handed to the transcode
//! engine. Streams are addressed by per-type position (`0:a:1` is the second
//! audio stream), never by absolute index.

use serde::{Deserialize, Serialize};
use std::fmt;
use trackforged_common::CodecType;

/// A flat list of transcode engine arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instruction {
    args: Vec<String>,
}

impl Instruction {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Number of `-map` directives.
    pub fn map_count(&self) -> usize {
        self.args.iter().filter(|a| *a == "-map").count()
    }

    /// Stream specifiers that follow each `-map`, in order.
    pub fn mapped(&self) -> Vec<&str> {
        self.args
            .windows(2)
            .filter(|w| w[0] == "-map")
            .map(|w| w[1].as_str())
            .collect()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Builder for [`Instruction`].
///
/// ```
/// use trackforged_av::InstructionBuilder;
/// use trackforged_common::CodecType;
///
/// let instruction = InstructionBuilder::new()
///     .map_all_of(CodecType::Video)
///     .map_stream(CodecType::Audio, 0)
///     .map_optional(CodecType::Subtitle, 1)
///     .copy_codecs()
///     .build();
/// assert_eq!(instruction.to_string(), "-map 0:v -map 0:a:0 -map 0:s:1? -c copy");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstructionBuilder {
    args: Vec<String>,
}

impl InstructionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every stream of the input.
    pub fn map_all(self) -> Self {
        self.map("0".to_string())
    }

    /// Map every stream of one kind (`-map 0:v`).
    pub fn map_all_of(self, codec_type: CodecType) -> Self {
        match codec_type.specifier() {
            Some(spec) => self.map(format!("0:{}", spec)),
            None => self,
        }
    }

    /// Map every stream of one kind, tolerating none being present (`-map 0:s?`).
    pub fn map_all_optional(self, codec_type: CodecType) -> Self {
        match codec_type.specifier() {
            Some(spec) => self.map(format!("0:{}?", spec)),
            None => self,
        }
    }

    /// Map one stream by per-type position (`-map 0:a:2`).
    pub fn map_stream(self, codec_type: CodecType, position: u32) -> Self {
        match codec_type.specifier() {
            Some(spec) => self.map(format!("0:{}:{}", spec, position)),
            None => self,
        }
    }

    /// Map one stream by per-type position, optional (`-map 0:s:2?`).
    pub fn map_optional(self, codec_type: CodecType, position: u32) -> Self {
        match codec_type.specifier() {
            Some(spec) => self.map(format!("0:{}:{}?", spec, position)),
            None => self,
        }
    }

    /// Stream copy for everything mapped (`-c copy`).
    pub fn copy_codecs(self) -> Self {
        self.args(["-c", "copy"])
    }

    /// Append a single raw argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append raw arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Instruction {
        Instruction { args: self.args }
    }

    fn map(mut self, spec: String) -> Self {
        self.args.push("-map".to_string());
        self.args.push(spec);
        self
    }
}
