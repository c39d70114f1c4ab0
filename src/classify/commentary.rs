//! Commentary track detection.

/// Title fragments that mark a track as commentary or narration.
const COMMENTARY_KEYWORDS: &[&str] = &["commentary", "description", "sdh"];

/// Whether a track title marks a commentary, audio description, or SDH track.
///
/// Matching is a case-insensitive substring test. No title means no.
pub fn is_commentary(title: Option<&str>) -> bool {
    let Some(title) = title else {
        return false;
    };
    let title = title.to_lowercase();
    COMMENTARY_KEYWORDS.iter().any(|k| title.contains(k))
}
