use std::collections::BTreeSet;

use trackforged_av::StreamInventory;
use trackforged_common::language::display_name;
use trackforged_common::{CodecType, ServiceKind};

use super::{language_matches, ClassificationResult};
use crate::decision::Rationale;

/// Split subtitle streams into keep and remove sets.
///
/// Subtitles without a language tag are kept, since they may well be in the
/// native language. There is no commentary handling for subtitles.
/// `provider` selects the language override table, if any.
pub fn classify_subtitles(
    streams: &StreamInventory,
    wanted: &BTreeSet<String>,
    provider: Option<ServiceKind>,
    rationale: &mut Rationale,
) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for entry in streams.positions(CodecType::Subtitle) {
        let position = entry.position;
        if result.first_examined.is_none() {
            result.first_examined = Some(position);
        }

        match entry.stream.language.as_deref() {
            None => {
                rationale.note(format!(
                    "Keeping subtitle track {} with no language tag",
                    position
                ));
                result.keep(position);
            }
            Some(tag) if language_matches(tag, provider, wanted) => {
                result.keep(position);
            }
            Some(tag) => {
                let name = display_name(tag);
                rationale.fail(format!("Removing subtitle track with language: {}", name));
                result.has_other_languages = true;
                result.remove(position, Some(name));
            }
        }
    }

    result
}
