//! Keep a fixed native language, no lookups.

use std::collections::BTreeSet;

use tracing::debug;
use trackforged_common::CodecType;

use super::PluginInput;
use crate::classify::{classify_keep_native, classify_subtitles};
use crate::config::{Config, LimitsConfig};
use crate::decision::{assemble, check_gates, AssemblyOptions, Decision, DecisionBuilder, Gates};

pub struct KeepNativePlugin {
    native_language: String,
    limits: LimitsConfig,
}

impl KeepNativePlugin {
    pub fn new(native_language: impl Into<String>, limits: LimitsConfig) -> Self {
        Self {
            native_language: native_language.into().trim().to_lowercase(),
            limits,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.languages.native_language, config.limits.clone())
    }

    pub fn decide(&self, input: &PluginInput) -> Decision {
        let mut builder = DecisionBuilder::new(&input.container);
        let native = self.native_language.as_str();

        let gates = Gates {
            containers: &self.limits.containers,
            max_file_size_gb: self
                .limits
                .skip_large_files
                .then_some(self.limits.max_file_size_gb),
            container_note: None,
        };
        if let Err(e) = check_gates(input, &gates, builder.rationale()) {
            debug!(path = %input.path, "Gate rejected file: {}", e);
            return builder.skip();
        }

        builder
            .rationale()
            .ok(format!("Native language set to: {}", native));

        if !input.streams.has_video() {
            builder.rationale().fail("No video stream found in file");
            return builder.skip();
        }

        let audio = classify_keep_native(&input.streams, native, builder.rationale());
        let wanted = BTreeSet::from([native.to_string()]);
        let subtitles = classify_subtitles(&input.streams, &wanted, None, builder.rationale());

        builder.rationale().ok(format!(
            "Stream analysis: {} audio tracks ({} kept), {} subtitle tracks ({} kept)",
            input.streams.count(CodecType::Audio),
            audio.keep.len(),
            input.streams.count(CodecType::Subtitle),
            subtitles.keep.len()
        ));

        if !audio.has_other_languages && !subtitles.has_other_languages {
            builder
                .rationale()
                .ok("No non-native language tracks detected, file already clean");
            return builder.skip();
        }

        if audio.remove.is_empty() && subtitles.remove.is_empty() {
            builder
                .rationale()
                .ok("All tracks are already in native language, no processing needed");
            return builder.skip();
        }

        builder.rationale().fail(format!(
            "File needs processing to keep only native language ({}) tracks",
            native
        ));
        builder.rationale().ok(format!(
            "Will keep {} audio track(s) and {} subtitle track(s)",
            audio.keep.len(),
            subtitles.keep.len()
        ));

        assemble(
            builder.requeue_after(true),
            &audio,
            &AssemblyOptions {
                subtitles: Some(&subtitles),
                extra_args: &[],
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackforged_av::{StreamInventory, StreamRecord};

    fn plugin() -> KeepNativePlugin {
        KeepNativePlugin::new("eng", LimitsConfig::default())
    }

    fn input(streams: Vec<StreamRecord>) -> PluginInput {
        PluginInput {
            container: "mkv".into(),
            path: "/media/film.mkv".into(),
            streams: StreamInventory::new(streams),
            ..Default::default()
        }
    }

    #[test]
    fn removes_foreign_tracks_and_requeues() {
        let decision = plugin().decide(&input(vec![
            StreamRecord::new(0, CodecType::Video),
            StreamRecord::new(1, CodecType::Audio).with_language("eng"),
            StreamRecord::new(2, CodecType::Audio).with_language("ger"),
            StreamRecord::new(3, CodecType::Subtitle).with_language("ger"),
            StreamRecord::new(4, CodecType::Subtitle).with_language("eng"),
        ]));

        assert!(decision.should_process());
        assert!(decision.requeue_after());
        assert_eq!(
            decision.instruction().to_string(),
            "-map 0:v -map 0:a:0 -map 0:s:1? -map 0:t? -map 0:d? -c copy"
        );
    }

    #[test]
    fn requires_video() {
        let decision = plugin().decide(&input(vec![
            StreamRecord::new(0, CodecType::Audio).with_language("ger"),
        ]));
        assert!(!decision.should_process());
        assert!(decision
            .rationale()
            .iter()
            .any(|l| l.contains("No video stream found in file")));
    }

    #[test]
    fn clean_file_is_skipped() {
        let decision = plugin().decide(&input(vec![
            StreamRecord::new(0, CodecType::Video),
            StreamRecord::new(1, CodecType::Audio).with_language("eng"),
            StreamRecord::new(2, CodecType::Audio).tagged(),
        ]));
        assert!(!decision.should_process());
        assert!(decision
            .rationale()
            .iter()
            .any(|l| l.contains("No non-native language tracks detected")));
    }

    #[test]
    fn single_foreign_track_is_kept() {
        let decision = plugin().decide(&input(vec![
            StreamRecord::new(0, CodecType::Video),
            StreamRecord::new(1, CodecType::Audio).with_language("fre"),
        ]));
        assert!(!decision.should_process());
        assert!(decision
            .rationale()
            .iter()
            .any(|l| l.contains("All tracks are already in native language")));
    }

    #[test]
    fn fallback_keeps_first_audio() {
        let decision = plugin().decide(&input(vec![
            StreamRecord::new(0, CodecType::Video),
            StreamRecord::new(1, CodecType::Audio).with_language("fre"),
            StreamRecord::new(2, CodecType::Audio).with_language("ger"),
        ]));
        assert!(decision.should_process());
        assert_eq!(decision.instruction().mapped(), vec!["0:v", "0:a:0", "0:t?", "0:d?"]);
    }
}
