//! Decision assembly for the track-selection plugins.

use tracing::debug;
use trackforged_av::InstructionBuilder;
use trackforged_common::{CodecType, Error, Result};

use super::{Decision, DecisionBuilder};
use crate::classify::ClassificationResult;

/// How to turn classifications into an instruction.
#[derive(Debug, Clone, Default)]
pub struct AssemblyOptions<'a> {
    /// Subtitle classification. `None` maps every subtitle (`-map 0:s?`).
    pub subtitles: Option<&'a ClassificationResult>,
    /// Arguments appended after `-c copy`.
    pub extra_args: &'a [&'a str],
}

/// Fails when a classification would leave the file without audio.
pub fn check_audio_invariant(audio: &ClassificationResult) -> Result<()> {
    if audio.keep.is_empty() && !audio.remove.is_empty() {
        return Err(Error::invariant(format!(
            "all {} audio tracks would be removed",
            audio.remove.len()
        )));
    }
    Ok(())
}

/// Build the final decision from audio and subtitle classifications.
///
/// Skips when every audio track would go or when there is nothing to remove.
/// Otherwise maps all video, each kept audio stream, the kept (or all)
/// subtitles, every attachment and data stream, then `-c copy` and the
/// extra arguments.
pub fn assemble(
    mut builder: DecisionBuilder,
    audio: &ClassificationResult,
    options: &AssemblyOptions<'_>,
) -> Decision {
    if let Err(err) = check_audio_invariant(audio) {
        debug!(error = %err, "Refusing to build instruction");
        builder
            .rationale()
            .fail("Cancelling plugin otherwise all audio tracks would be removed.");
        return builder.skip();
    }

    let subtitle_removals = options.subtitles.is_some_and(|s| !s.remove.is_empty());
    if audio.remove.is_empty() && !subtitle_removals {
        builder.rationale().fail("No audio tracks to be removed.");
        return builder.skip();
    }

    let mut names: Vec<&str> = audio
        .removed_language_names
        .iter()
        .map(String::as_str)
        .collect();
    if let Some(subtitles) = options.subtitles {
        names.extend(subtitles.removed_language_names.iter().map(String::as_str));
    }
    if names.is_empty() {
        builder.rationale().ok("Removing untagged tracks.");
    } else {
        builder
            .rationale()
            .ok(format!("Removing tracks with languages: {}.", names.join(", ")));
    }

    let mut instruction = InstructionBuilder::new().map_all_of(CodecType::Video);
    for &position in &audio.keep {
        instruction = instruction.map_stream(CodecType::Audio, position);
    }
    instruction = match options.subtitles {
        Some(subtitles) => subtitles
            .keep
            .iter()
            .fold(instruction, |i, &position| {
                i.map_optional(CodecType::Subtitle, position)
            }),
        None => instruction.map_all_optional(CodecType::Subtitle),
    };
    let instruction = instruction
        .map_all_optional(CodecType::Attachment)
        .map_all_optional(CodecType::Data)
        .copy_codecs()
        .args(options.extra_args.iter().copied())
        .build();

    builder.process(instruction)
}
