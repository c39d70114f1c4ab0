//! Shared fixtures for integration tests.
//!
//! Stream inventories, plugin inputs, and in-process stand-ins for the
//! library and metadata services.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use trackforged::arr::{LibraryService, ParsedTitle};
use trackforged::config::{LanguagesConfig, LimitsConfig};
use trackforged::metadata::{MediaType, MetadataService, TitleMatch};
use trackforged::plugins::{NativeLanguagePlugin, PluginInput};
use trackforged::resolver::{AttemptPlan, Resolver};
use trackforged_av::{StreamInventory, StreamRecord};
use trackforged_common::{CodecType, ServiceKind};

/// Builds a stream inventory in container order.
#[derive(Default)]
pub struct Streams {
    records: Vec<StreamRecord>,
}

impl Streams {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, record: StreamRecord) -> Self {
        self.records.push(record);
        self
    }

    fn next_index(&self) -> u32 {
        self.records.len() as u32
    }

    pub fn video(self) -> Self {
        let index = self.next_index();
        self.push(StreamRecord::new(index, CodecType::Video))
    }

    pub fn audio(self, language: &str) -> Self {
        let index = self.next_index();
        self.push(StreamRecord::new(index, CodecType::Audio).with_language(language))
    }

    pub fn audio_titled(self, language: &str, title: &str) -> Self {
        let index = self.next_index();
        self.push(
            StreamRecord::new(index, CodecType::Audio)
                .with_language(language)
                .with_title(title),
        )
    }

    pub fn subtitle(self, language: &str) -> Self {
        let index = self.next_index();
        self.push(StreamRecord::new(index, CodecType::Subtitle).with_language(language))
    }

    pub fn untagged_subtitle(self) -> Self {
        let index = self.next_index();
        self.push(StreamRecord::new(index, CodecType::Subtitle))
    }

    pub fn attachment(self) -> Self {
        let index = self.next_index();
        self.push(StreamRecord::new(index, CodecType::Attachment).with_title("DejaVuSans.ttf"))
    }

    pub fn build(self) -> StreamInventory {
        StreamInventory::new(self.records)
    }
}

/// A plugin input for an MKV with the given streams.
pub fn mkv(name: &str, streams: StreamInventory) -> PluginInput {
    PluginInput {
        container: "mkv".to_string(),
        file_size: 4 * 1024 * 1024 * 1024,
        display_name: name.to_string(),
        path: format!("/media/movies/{}", name),
        streams,
        ..Default::default()
    }
}

/// Library service that always answers the same way and counts calls.
pub struct StubLibrary {
    kind: ServiceKind,
    answer: Result<Option<ParsedTitle>, String>,
    pub calls: AtomicUsize,
}

impl StubLibrary {
    pub fn with_id(kind: ServiceKind, imdb_id: &str) -> Arc<Self> {
        Arc::new(Self {
            kind,
            answer: Ok(Some(ParsedTitle {
                imdb_id: Some(imdb_id.to_string()),
                ..Default::default()
            })),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(kind: ServiceKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            answer: Err("connection refused".to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LibraryService for StubLibrary {
    fn kind(&self) -> ServiceKind {
        self.kind
    }

    async fn parse_title(&self, _name: &str) -> anyhow::Result<Option<ParsedTitle>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

/// Metadata service backed by a fixed id → language table.
pub struct StubMetadata {
    known: Vec<(String, String)>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl StubMetadata {
    pub fn knowing(known: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            known: known
                .iter()
                .map(|(id, lang)| (id.to_string(), lang.to_string()))
                .collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            known: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataService for StubMetadata {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn find_by_imdb(&self, imdb_id: &str) -> anyhow::Result<Option<TitleMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("503 Service Unavailable");
        }
        Ok(self
            .known
            .iter()
            .find(|(id, _)| id == imdb_id)
            .map(|(_, lang)| TitleMatch {
                id: Some(1),
                title: None,
                media_type: MediaType::Movie,
                original_language: lang.clone(),
            }))
    }
}

/// A native-language plugin wired to the given services.
pub fn native_plugin(
    library: Arc<StubLibrary>,
    metadata: Arc<StubMetadata>,
    languages: LanguagesConfig,
    limits: LimitsConfig,
) -> NativeLanguagePlugin {
    let resolver = Resolver::new(AttemptPlan::from_priority(library.kind), metadata)
        .with_library(library);
    NativeLanguagePlugin::new(resolver, languages, limits)
}
