//! End-to-end plugin scenarios.
//!
//! Each test runs a full plugin against an in-memory inventory with stubbed
//! library and metadata services.

mod common;

use common::{mkv, native_plugin, StubLibrary, StubMetadata, Streams};
use trackforged::config::{FaststartConfig, LanguagesConfig, LimitsConfig};
use trackforged::plugins::{FaststartPlugin, KeepNativePlugin, PluginInput};
use trackforged_av::{FormatInfo, StructuralMetadata};
use trackforged_common::ServiceKind;

fn languages(user: &[&str], drop_commentary: bool) -> LanguagesConfig {
    LanguagesConfig {
        user_languages: user.iter().map(|l| l.to_string()).collect(),
        drop_commentary,
        ..Default::default()
    }
}

fn mentions(lines: &[String], needle: &str) -> bool {
    lines.iter().any(|l| l.contains(needle))
}

// ---------------------------------------------------------------------------
// Scenario A: native English, French tracks removed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_a_removes_foreign_audio_and_subtitles() {
    let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0111161");
    let metadata = StubMetadata::knowing(&[("tt0111161", "en")]);
    let plugin = native_plugin(library, metadata, languages(&[], false), LimitsConfig::default());

    let input = mkv(
        "The Shawshank Redemption (1994).mkv",
        Streams::new()
            .video()
            .audio("eng")
            .audio("fre")
            .subtitle("eng")
            .subtitle("fre")
            .build(),
    );

    let decision = plugin.decide(&input).await;

    assert!(decision.should_process());
    assert_eq!(
        decision.instruction().to_string(),
        "-map 0:v -map 0:a:0 -map 0:s:0? -map 0:t? -map 0:d? -c copy -max_muxing_queue_size 9999"
    );
    assert_eq!(decision.output_container(), "mkv");
    assert!(mentions(decision.rationale(), "Grabbed ID (tt0111161) from Radarr"));
    assert!(mentions(
        decision.rationale(),
        "Removing tracks with languages: French, French."
    ));
}

#[tokio::test]
async fn attachments_survive_track_removal() {
    let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0111161");
    let metadata = StubMetadata::knowing(&[("tt0111161", "en")]);
    let plugin = native_plugin(library, metadata, languages(&[], false), LimitsConfig::default());

    let input = mkv(
        "Anime Film (2016).mkv",
        Streams::new()
            .video()
            .audio("eng")
            .audio("fre")
            .subtitle("eng")
            .attachment()
            .build(),
    );

    let decision = plugin.decide(&input).await;

    assert!(decision.should_process());
    assert_eq!(
        decision.instruction().mapped(),
        vec!["0:v", "0:a:0", "0:s:0?", "0:t?", "0:d?"]
    );
}

// ---------------------------------------------------------------------------
// Scenario B: only native audio, nothing to remove
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_b_native_only_is_a_no_op() {
    let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0245429");
    let metadata = StubMetadata::knowing(&[("tt0245429", "ja")]);
    let plugin = native_plugin(library, metadata, languages(&[], false), LimitsConfig::default());

    let input = mkv(
        "Spirited Away (2001).mkv",
        Streams::new().video().audio("jpn").build(),
    );

    let decision = plugin.decide(&input).await;

    assert!(!decision.should_process());
    assert!(decision.instruction().is_empty());
    assert!(mentions(decision.rationale(), "Original language tag: jpn"));
    assert!(mentions(decision.rationale(), "No audio tracks to be removed."));
}

// ---------------------------------------------------------------------------
// Scenario C: every lookup fails, nothing matches the fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_c_fallback_never_silences_file() {
    let library = StubLibrary::failing(ServiceKind::Radarr);
    let metadata = StubMetadata::failing();
    let plugin = native_plugin(library, metadata, languages(&[], false), LimitsConfig::default());

    let input = mkv(
        "Unknown Film (2020).mkv",
        Streams::new().video().audio("fre").audio("spa").build(),
    );

    let decision = plugin.decide(&input).await;

    assert!(!decision.should_process());
    assert!(mentions(
        decision.rationale(),
        "No metadata found. Falling back to keeping English only."
    ));
    assert!(mentions(
        decision.rationale(),
        "Cancelling plugin otherwise all audio tracks would be removed."
    ));
}

#[tokio::test]
async fn fallback_single_english_track_is_kept() {
    let library = StubLibrary::failing(ServiceKind::Sonarr);
    let metadata = StubMetadata::failing();
    let plugin = native_plugin(library, metadata, languages(&[], false), LimitsConfig::default());

    let input = mkv("Show.S01E01.mkv", Streams::new().video().audio("eng").build());
    let decision = plugin.decide(&input).await;

    assert!(!decision.should_process());
    assert!(mentions(decision.rationale(), "Keeping first audio track as fallback."));
}

#[tokio::test]
async fn fallback_ignores_user_languages() {
    let library = StubLibrary::failing(ServiceKind::Radarr);
    let metadata = StubMetadata::failing();
    let plugin = native_plugin(
        library,
        metadata,
        languages(&["fre"], false),
        LimitsConfig::default(),
    );

    let input = mkv(
        "Unknown Film (2020).mkv",
        Streams::new().video().audio("eng").audio("fre").subtitle("fre").build(),
    );

    let decision = plugin.decide(&input).await;

    assert!(decision.should_process());
    assert_eq!(decision.instruction().mapped(), vec!["0:v", "0:a:0", "0:t?", "0:d?"]);
    assert!(mentions(decision.rationale(), "Fallback languages: eng"));
    assert!(!mentions(decision.rationale(), "Fallback languages: eng, fre"));
    assert!(mentions(
        decision.rationale(),
        "Removing audio track with language: French"
    ));
}

// ---------------------------------------------------------------------------
// Scenario D: size ceiling rejects before any lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_d_size_gate_makes_no_calls() {
    let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0111161");
    let metadata = StubMetadata::knowing(&[("tt0111161", "en")]);
    let limits = LimitsConfig {
        skip_large_files: true,
        max_file_size_gb: 50,
        ..Default::default()
    };
    let plugin = native_plugin(library.clone(), metadata.clone(), languages(&[], false), limits);

    let mut input = mkv(
        "Huge Remux (2019).mkv",
        Streams::new().video().audio("eng").audio("fre").build(),
    );
    input.file_size = 60 * 1024 * 1024 * 1024;

    let decision = plugin.decide(&input).await;

    assert!(!decision.should_process());
    assert!(mentions(decision.rationale(), "Skipping large file (60.00GB > 50GB limit)"));
    assert_eq!(library.call_count(), 0);
    assert_eq!(metadata.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Scenario E: high probe score reads as optimized
// ---------------------------------------------------------------------------

#[test]
fn scenario_e_high_probe_score_skips_faststart() {
    let input = PluginInput {
        container: "mp4".to_string(),
        file_size: 700 * 1024 * 1024,
        display_name: "clip.mp4".to_string(),
        path: "/media/clips/clip.mp4".to_string(),
        structure: StructuralMetadata {
            format: Some(FormatInfo {
                format_name: Some("mov,mp4,m4a,3gp,3g2,mj2".to_string()),
                probe_score: Some(97),
                ..Default::default()
            }),
            atoms: None,
        },
        ..Default::default()
    };

    let plugin = FaststartPlugin::new(
        FaststartConfig {
            force_reprocess: false,
        },
        LimitsConfig::default(),
    );
    let decision = plugin.decide(&input);

    assert!(!decision.should_process());
    assert!(mentions(
        decision.rationale(),
        "File already has faststart enabled. No processing needed."
    ));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn commentary_precedence() {
    let streams = Streams::new()
        .video()
        .audio("eng")
        .audio_titled("eng", "Commentary with the director")
        .build();

    for (drop_commentary, expected) in [(true, "-map 0:v -map 0:a:0 "), (false, "")] {
        let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0111161");
        let metadata = StubMetadata::knowing(&[("tt0111161", "en")]);
        let plugin = native_plugin(
            library,
            metadata,
            languages(&[], drop_commentary),
            LimitsConfig::default(),
        );

        let decision = plugin.decide(&mkv("Film.mkv", streams.clone())).await;
        assert_eq!(decision.should_process(), drop_commentary);
        assert!(decision.instruction().to_string().starts_with(expected));
    }
}

#[tokio::test]
async fn user_languages_are_kept_alongside_native() {
    let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0245429");
    let metadata = StubMetadata::knowing(&[("tt0245429", "ja")]);
    let plugin = native_plugin(
        library,
        metadata,
        languages(&["eng"], false),
        LimitsConfig::default(),
    );

    let input = mkv(
        "Spirited Away (2001).mkv",
        Streams::new()
            .video()
            .audio("fre")
            .audio("jpn")
            .audio("eng")
            .untagged_subtitle()
            .subtitle("ger")
            .build(),
    );

    let decision = plugin.decide(&input).await;
    assert!(decision.should_process());
    assert_eq!(
        decision.instruction().mapped(),
        vec!["0:v", "0:a:1", "0:a:2", "0:s:0?", "0:t?", "0:d?"]
    );
}

#[tokio::test]
async fn idempotent_on_processed_output() {
    let streams = Streams::new().video().audio("eng").subtitle("eng").build();

    for _ in 0..2 {
        let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0111161");
        let metadata = StubMetadata::knowing(&[("tt0111161", "en")]);
        let plugin = native_plugin(library, metadata, languages(&[], false), LimitsConfig::default());

        let decision = plugin.decide(&mkv("Film.mkv", streams.clone())).await;
        assert!(!decision.should_process());
    }

    let keep_native = KeepNativePlugin::new("eng", LimitsConfig::default());
    for _ in 0..2 {
        let decision = keep_native.decide(&mkv("Film.mkv", streams.clone()));
        assert!(!decision.should_process());
    }
}

#[tokio::test]
async fn cache_files_are_never_looked_up() {
    let library = StubLibrary::with_id(ServiceKind::Radarr, "tt0111161");
    let metadata = StubMetadata::knowing(&[("tt0111161", "en")]);
    let plugin = native_plugin(
        library.clone(),
        metadata,
        languages(&[], false),
        LimitsConfig::default(),
    );

    let mut input = mkv(
        "Film-TdarrCacheFile-a1b2.mkv",
        Streams::new().video().audio("eng").audio("fre").build(),
    );
    input.cache_marker = true;

    let decision = plugin.decide(&input).await;
    assert!(!decision.should_process());
    assert_eq!(library.call_count(), 0);
}
