//! Move MP4 metadata to the front of the file.

use tracing::debug;
use trackforged_common::Error;
use trackforged_av::probe::MP4_FAMILY;
use trackforged_av::{detect, FaststartStatus, InstructionBuilder};

use super::PluginInput;
use crate::config::{Config, FaststartConfig, LimitsConfig};
use crate::decision::{check_gates, Decision, DecisionBuilder, Gates};

/// Appended after `-c copy`.
pub const FASTSTART_ARGS: &[&str] = &["-movflags", "+faststart", "-avoid_negative_ts", "make_zero"];

pub struct FaststartPlugin {
    config: FaststartConfig,
    limits: LimitsConfig,
    containers: Vec<String>,
}

impl FaststartPlugin {
    pub fn new(config: FaststartConfig, limits: LimitsConfig) -> Self {
        Self {
            config,
            limits,
            containers: MP4_FAMILY.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.faststart.clone(), config.limits.clone())
    }

    pub fn decide(&self, input: &PluginInput) -> Decision {
        let mut builder = DecisionBuilder::new(&input.container);
        builder.rationale().note(format!(
            "=== MP4 Faststart Analysis for: {} ===",
            input.display_name
        ));

        let gates = Gates {
            containers: &self.containers,
            max_file_size_gb: self
                .limits
                .skip_large_files
                .then_some(self.limits.max_file_size_gb),
            container_note: Some("Faststart only supports MP4/MOV files."),
        };
        if let Err(e) = check_gates(input, &gates, builder.rationale()) {
            debug!(path = %input.path, "Gate rejected file: {}", e);
            return builder.skip();
        }

        let detection = detect(&input.structure);
        for note in &detection.notes {
            builder.rationale().note(note.as_str());
        }
        debug!(status = %detection.status, signal = %detection.signal, "Faststart detection");

        match detection.status {
            FaststartStatus::Unknown => {
                let err = Error::probe_ambiguous(detection.signal.to_string());
                debug!(path = %input.path, "Not processing: {}", err);
                builder
                    .rationale()
                    .fail("Unable to determine faststart status. Skipping file for safety.");
                return builder.skip();
            }
            FaststartStatus::Optimized => {
                builder
                    .rationale()
                    .ok(format!("Faststart detected via {}", detection.signal));
                if !self.config.force_reprocess {
                    builder
                        .rationale()
                        .ok("File already has faststart enabled. No processing needed.");
                    return builder.skip();
                }
                builder
                    .rationale()
                    .ok("File has faststart but force_reprocess enabled. Processing anyway.");
            }
            FaststartStatus::NeedsOptimization => {
                builder
                    .rationale()
                    .fail(format!("Faststart needed ({})", detection.signal));
            }
        }

        builder.rationale().ok("Setting up faststart processing...");
        let instruction = InstructionBuilder::new()
            .map_all()
            .copy_codecs()
            .args(FASTSTART_ARGS.iter().copied())
            .build();
        builder.process(instruction)
    }
}
