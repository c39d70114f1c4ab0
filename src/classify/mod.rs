//! Stream classification against a language policy.
//!
//! Classifiers walk one codec type in container order and split its streams
//! into keep and remove sets. Both sets hold per-type positions (the `N` in
//! `0:a:N`), not absolute stream indices.

mod audio;
pub mod commentary;
mod subtitle;

pub use audio::{classify_audio, classify_keep_native};
pub use commentary::is_commentary;
pub use subtitle::classify_subtitles;

use serde::Serialize;
use std::collections::BTreeSet;
use trackforged_common::language::{map_provider_language, same_language};
use trackforged_common::ServiceKind;

/// Which languages a file should end up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePolicy {
    /// Three-letter code of the title's original language.
    pub native_language: String,
    /// Extra languages to keep (three-letter codes).
    pub user_languages: BTreeSet<String>,
    /// Remove commentary, description, and SDH tracks.
    pub drop_commentary: bool,
}

impl LanguagePolicy {
    pub fn new(
        native_language: impl Into<String>,
        user_languages: impl IntoIterator<Item = impl AsRef<str>>,
        drop_commentary: bool,
    ) -> Self {
        Self {
            native_language: native_language.into().trim().to_lowercase(),
            user_languages: parse_language_list(user_languages),
            drop_commentary,
        }
    }

    /// `user_languages` plus the native language.
    pub fn wanted(&self) -> BTreeSet<String> {
        let mut wanted = self.user_languages.clone();
        wanted.insert(self.native_language.clone());
        wanted
    }
}

/// Normalize a list of language codes: trimmed, lower-cased, no empties.
pub fn parse_language_list(codes: impl IntoIterator<Item = impl AsRef<str>>) -> BTreeSet<String> {
    codes
        .into_iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Whether a track tag is one of the `wanted` languages.
///
/// Both the raw tag and its provider-mapped form are tried, and codes are
/// compared across ISO 639 variants (`fre` matches `fra` and `fr`). Without a
/// provider only the raw tag is compared.
pub fn language_matches(
    tag: &str,
    provider: Option<ServiceKind>,
    wanted: &BTreeSet<String>,
) -> bool {
    let tag = tag.trim().to_lowercase();
    let mapped = provider.map(|p| map_provider_language(&tag, p));
    wanted.iter().any(|w| {
        same_language(w, &tag) || mapped.as_deref().is_some_and(|m| same_language(w, m))
    })
}

/// Outcome of classifying one codec type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Per-type positions to keep.
    pub keep: BTreeSet<u32>,
    /// Per-type positions to drop.
    pub remove: BTreeSet<u32>,
    /// Display names of removed tracks, in stream order.
    pub removed_language_names: Vec<String>,
    /// Position of the first stream examined, the tentative safety keep.
    pub first_examined: Option<u32>,
    /// At least one stream carries a language outside the wanted set.
    pub has_other_languages: bool,
}

impl ClassificationResult {
    /// Number of streams looked at.
    pub fn examined(&self) -> usize {
        self.keep.len() + self.remove.len()
    }

    fn keep(&mut self, position: u32) {
        self.remove.remove(&position);
        self.keep.insert(position);
    }

    fn remove(&mut self, position: u32, name: Option<String>) {
        self.keep.remove(&position);
        self.remove.insert(position);
        if let Some(name) = name {
            self.removed_language_names.push(name);
        }
    }
}
