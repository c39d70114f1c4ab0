//! Keep the title's original language plus a user list.
//!
//! The original language comes from the library and metadata services via
//! [`Resolver`]. When no service can name it the plugin falls back to
//! English plus the user languages.

use tracing::{debug, info};
use trackforged_common::CodecType;

use super::PluginInput;
use crate::classify::{classify_audio, classify_subtitles, LanguagePolicy};
use crate::config::{Config, LanguagesConfig, LimitsConfig};
use crate::decision::{assemble, check_gates, AssemblyOptions, Decision, DecisionBuilder, Gates};
use crate::resolver::{Resolver, FALLBACK_LANGUAGE};

/// Appended after `-c copy`.
pub const EXTRA_ARGS: &[&str] = &["-max_muxing_queue_size", "9999"];

pub struct NativeLanguagePlugin {
    resolver: Resolver,
    languages: LanguagesConfig,
    limits: LimitsConfig,
}

impl NativeLanguagePlugin {
    pub fn new(resolver: Resolver, languages: LanguagesConfig, limits: LimitsConfig) -> Self {
        Self {
            resolver,
            languages,
            limits,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Resolver::from_config(config),
            config.languages.clone(),
            config.limits.clone(),
        )
    }

    pub async fn decide(&self, input: &PluginInput) -> Decision {
        let mut builder = DecisionBuilder::new(&input.container);

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

        if input.streams.count(CodecType::Audio) == 0 {
            builder.rationale().fail("No audio tracks found in file.");
            return builder.skip();
        }

        let identity = self
            .resolver
            .resolve(&input.display_name, builder.rationale())
            .await;

        let native_language = if identity.is_fallback() {
            builder
                .rationale()
                .fail("No metadata found. Falling back to keeping English only.");
            FALLBACK_LANGUAGE.to_string()
        } else {
            let native = identity.native_language();
            builder
                .rationale()
                .note(format!("Original language tag: {}", native));
            native
        };

        // Without metadata only English is kept; user languages do not apply.
        let user_languages: &[String] = if identity.is_fallback() {
            &[]
        } else {
            &self.languages.user_languages
        };
        let policy = LanguagePolicy::new(
            native_language,
            user_languages,
            self.languages.drop_commentary,
        );
        if identity.is_fallback() {
            let kept: Vec<String> = policy.wanted().into_iter().collect();
            builder
                .rationale()
                .note(format!("Fallback languages: {}", kept.join(", ")));
        }
        info!(
            file = %input.display_name,
            native = %policy.native_language,
            fallback = identity.is_fallback(),
            "Classifying streams"
        );

        let audio = classify_audio(
            &input.streams,
            &policy,
            &policy.user_languages,
            identity.provider,
            builder.rationale(),
        );
        let subtitles = self.languages.filter_subtitles.then(|| {
            classify_subtitles(
                &input.streams,
                &policy.wanted(),
                Some(identity.provider),
                builder.rationale(),
            )
        });

        let nothing_removed = audio.remove.is_empty()
            && subtitles.as_ref().map_or(true, |s| s.remove.is_empty());
        if identity.is_fallback()
            && nothing_removed
            && audio.keep.len() == 1
            && audio.keep.contains(&0)
        {
            builder.rationale().ok("Keeping first audio track as fallback.");
            return builder.skip();
        }

        assemble(
            builder,
            &audio,
            &AssemblyOptions {
                subtitles: subtitles.as_ref(),
                extra_args: EXTRA_ARGS,
            },
        )
    }
}
