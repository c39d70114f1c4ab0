//! Audio stream classification.

use std::collections::BTreeSet;

use trackforged_av::StreamInventory;
use trackforged_common::language::{display_name, same_language};
use trackforged_common::{CodecType, ServiceKind};

use super::{is_commentary, language_matches, ClassificationResult, LanguagePolicy};
use crate::decision::Rationale;

/// Split audio streams into keep and remove sets.
///
/// A stream is kept when its language is in `target` or is the policy's
/// native language. Untagged streams and streams tagged without a language
/// are removed. Commentary streams are removed only when the policy drops
/// commentary; otherwise they are kept whatever their language.
///
/// The first audio stream is reported as `first_examined` but only lands in
/// `keep` if it matched on its own.
pub fn classify_audio(
    streams: &StreamInventory,
    policy: &LanguagePolicy,
    target: &BTreeSet<String>,
    provider: ServiceKind,
    rationale: &mut Rationale,
) -> ClassificationResult {
    let mut wanted = target.clone();
    wanted.insert(policy.native_language.clone());

    let mut result = ClassificationResult::default();

    for stream in streams.iter().filter(|s| s.codec_type.is_none()) {
        tracing::warn!(index = stream.index, "Skipping stream without a codec type");
    }

    for entry in streams.positions(CodecType::Audio) {
        let position = entry.position;
        let stream = entry.stream;

        if result.first_examined.is_none() {
            result.first_examined = Some(position);
        }

        if !stream.has_tags {
            rationale.fail(format!(
                "No tags found on audio track {}. Removing it.",
                position
            ));
            result.remove(position, None);
            continue;
        }

        let language_name = stream
            .language
            .as_deref()
            .map(display_name)
            .unwrap_or_else(|| "Unknown".to_string());

        if is_commentary(stream.title.as_deref()) {
            let title = stream.title.as_deref().unwrap_or_default();
            if policy.drop_commentary {
                rationale.fail(format!(
                    "Removing commentary audio track: {} (commentary) - {}",
                    language_name, title
                ));
                result.remove(position, Some(format!("{} (commentary)", language_name)));
            } else {
                rationale.ok(format!(
                    "Keeping commentary audio track: {} - {}",
                    language_name, title
                ));
                result.keep(position);
            }
            continue;
        }

        match stream.language.as_deref() {
            Some(tag) if language_matches(tag, Some(provider), &wanted) => {
                rationale.ok(format!("Keeping audio track with language: {}", language_name));
                result.keep(position);
            }
            Some(_) => {
                rationale.fail(format!(
                    "Removing audio track with language: {}",
                    language_name
                ));
                result.has_other_languages = true;
                result.remove(position, Some(language_name));
            }
            None => {
                rationale.fail(format!(
                    "No language tag found on audio track {}. Removing it.",
                    position
                ));
                result.remove(position, None);
            }
        }
    }

    result
}

/// Audio rule for the offline keep-native plugin.
///
/// Streams in `native` are kept. Streams in another language are removed
/// and flag `has_other_languages`; untagged streams are removed without
/// counting as another language. When no stream is native the first audio
/// stream is kept so the output is never silent.
pub fn classify_keep_native(
    streams: &StreamInventory,
    native: &str,
    rationale: &mut Rationale,
) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for entry in streams.positions(CodecType::Audio) {
        let position = entry.position;
        if result.first_examined.is_none() {
            result.first_examined = Some(position);
        }

        match entry.stream.language.as_deref() {
            Some(tag) if same_language(tag, native) => {
                rationale.ok(format!("Found native audio track ({}): {}", position, tag));
                result.keep(position);
            }
            Some(tag) => {
                rationale.fail(format!(
                    "Found non-native audio track ({}): {}",
                    position, tag
                ));
                result.has_other_languages = true;
                result.remove(position, Some(display_name(tag)));
            }
            None => {
                rationale.note(format!(
                    "Found audio track with no language tag ({})",
                    position
                ));
                result.remove(position, None);
            }
        }
    }

    if result.keep.is_empty() {
        if let Some(first) = result.first_examined {
            rationale.fail(format!(
                "No native language ({}) audio tracks found, using first audio track as fallback",
                native
            ));
            result.keep(first);
        }
    }

    result
}
