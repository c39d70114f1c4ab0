//! Turning classifications into a host-facing decision.
//!
//! A [`Decision`] is built once per invocation through [`DecisionBuilder`]
//! and is immutable afterwards. [`HostResponse`] is the JSON envelope the
//! transcode host expects back from a plugin.

mod assembler;
mod gates;
mod rationale;

pub use assembler::{assemble, check_audio_invariant, AssemblyOptions};
pub use gates::{check_gates, is_cache_file, Gates, CACHE_MARKER};
pub use rationale::Rationale;

use serde::{Deserialize, Serialize};
use trackforged_av::Instruction;

/// What the host should do with one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    should_process: bool,
    instruction: Instruction,
    output_container: String,
    requeue_after: bool,
    rationale: Vec<String>,
}

impl Decision {
    pub fn should_process(&self) -> bool {
        self.should_process
    }

    /// Remux arguments. Empty when the file is left alone.
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// Output container without a leading dot.
    pub fn output_container(&self) -> &str {
        &self.output_container
    }

    /// Ask the host to run the file through the plugin stack again.
    pub fn requeue_after(&self) -> bool {
        self.requeue_after
    }

    pub fn rationale(&self) -> &[String] {
        &self.rationale
    }

    pub fn to_host_response(&self) -> HostResponse {
        HostResponse::from(self)
    }
}

/// Collects the parts of a [`Decision`].
#[derive(Debug, Default)]
pub struct DecisionBuilder {
    container: String,
    requeue_after: bool,
    rationale: Rationale,
}

impl DecisionBuilder {
    /// Start a decision for a file in `container` (leading dot optional).
    pub fn new(container: impl AsRef<str>) -> Self {
        Self {
            container: container.as_ref().trim_start_matches('.').to_lowercase(),
            ..Default::default()
        }
    }

    pub fn requeue_after(mut self, requeue: bool) -> Self {
        self.requeue_after = requeue;
        self
    }

    pub fn rationale(&mut self) -> &mut Rationale {
        &mut self.rationale
    }

    /// Leave the file untouched.
    pub fn skip(self) -> Decision {
        Decision {
            should_process: false,
            instruction: Instruction::default(),
            output_container: self.container,
            requeue_after: false,
            rationale: self.rationale.into_lines(),
        }
    }

    /// Rewrite the file with `instruction`. An empty instruction is a skip.
    pub fn process(self, instruction: Instruction) -> Decision {
        if instruction.is_empty() {
            return self.skip();
        }
        Decision {
            should_process: true,
            instruction,
            output_container: self.container,
            requeue_after: self.requeue_after,
            rationale: self.rationale.into_lines(),
        }
    }
}

/// Response envelope understood by the transcode host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostResponse {
    #[serde(rename = "processFile")]
    pub process_file: bool,
    /// Arguments prefixed with `", "`, or empty when not processing.
    pub preset: String,
    /// Output container with a leading dot.
    pub container: String,
    #[serde(rename = "handBrakeMode")]
    pub hand_brake_mode: bool,
    #[serde(rename = "FFmpegMode")]
    pub ffmpeg_mode: bool,
    #[serde(rename = "reQueueAfter")]
    pub requeue_after: bool,
    #[serde(rename = "infoLog")]
    pub info_log: String,
}

impl From<&Decision> for HostResponse {
    fn from(decision: &Decision) -> Self {
        let preset = if decision.should_process {
            format!(", {}", decision.instruction)
        } else {
            String::new()
        };

        let mut info_log = decision.rationale.join("\n");
        if !info_log.is_empty() {
            info_log.push('\n');
        }

        Self {
            process_file: decision.should_process,
            preset,
            container: format!(".{}", decision.output_container),
            hand_brake_mode: false,
            ffmpeg_mode: true,
            requeue_after: decision.requeue_after,
            info_log,
        }
    }
}
