//! Native-language resolution.
//!
//! For each [`Attempt`] in the plan the library service turns the file name
//! into an IMDb id, then the metadata service turns that id into the title's
//! original language. The first attempt that yields a language wins; when
//! none does the result is the English fallback. Service failures never
//! escape this module.

mod plan;

pub use plan::{Attempt, AttemptOutcome, AttemptPlan};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use trackforged_common::language::to_three_letter_or_keep;
use trackforged_common::{Error, ServiceKind};

use crate::arr::{create_client, LibraryService};
use crate::config::Config;
use crate::decision::Rationale;
use crate::metadata::{extract_imdb_id, MetadataService, TmdbProvider};

/// Language assumed when no service can name one.
pub const FALLBACK_LANGUAGE: &str = "eng";

/// Where a resolved language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    MetadataService,
    Fallback,
}

/// The resolved original language of a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentity {
    pub source: IdentitySource,
    /// As reported by the metadata service (`"ja"`), or `"eng"` on fallback.
    pub original_language: String,
    /// Library service whose attempt produced this (the plan's primary on
    /// fallback). Decides which language override table applies.
    pub provider: ServiceKind,
}

impl ResolvedIdentity {
    pub fn fallback(provider: ServiceKind) -> Self {
        Self {
            source: IdentitySource::Fallback,
            original_language: FALLBACK_LANGUAGE.to_string(),
            provider,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == IdentitySource::Fallback
    }

    /// Original language as a three-letter code, or unchanged if unknown.
    pub fn native_language(&self) -> String {
        to_three_letter_or_keep(&self.original_language)
    }
}

fn label(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::Radarr => "Radarr",
        ServiceKind::Sonarr => "Sonarr",
    }
}

/// Runs an [`AttemptPlan`] against library and metadata services.
///
/// Holds no per-file state, so one resolver can serve concurrent calls.
pub struct Resolver {
    plan: AttemptPlan,
    libraries: Vec<Arc<dyn LibraryService>>,
    metadata: Arc<dyn MetadataService>,
}

impl Resolver {
    pub fn new(plan: AttemptPlan, metadata: Arc<dyn MetadataService>) -> Self {
        Self {
            plan,
            libraries: Vec::new(),
            metadata,
        }
    }

    /// Register a library service. A later registration for the same kind
    /// replaces the earlier one.
    pub fn with_library(mut self, library: Arc<dyn LibraryService>) -> Self {
        self.libraries.retain(|l| l.kind() != library.kind());
        self.libraries.push(library);
        self
    }

    /// Build clients for every enabled arr with credentials.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let metadata: Arc<dyn MetadataService> = Arc::new(TmdbProvider::new(&config.tmdb, timeout));

        let mut resolver = Self::new(AttemptPlan::from_priority(config.priority), metadata);
        for kind in [ServiceKind::Radarr, ServiceKind::Sonarr] {
            if let Some(arr) = config.arr(kind).filter(|a| a.has_credentials()) {
                resolver = resolver.with_library(Arc::from(create_client(arr, timeout)));
            }
        }
        resolver
    }

    pub fn plan(&self) -> &AttemptPlan {
        &self.plan
    }

    fn library(&self, service: ServiceKind) -> Option<&dyn LibraryService> {
        self.libraries
            .iter()
            .find(|l| l.kind() == service)
            .map(|l| &**l)
    }

    /// Resolve the original language for `display_name`. Always returns.
    pub async fn resolve(&self, display_name: &str, rationale: &mut Rationale) -> ResolvedIdentity {
        for attempt in self.plan.attempts() {
            let outcome = self.run_attempt(*attempt, display_name, rationale).await;
            debug!(service = %attempt.service, %outcome, "Resolution attempt finished");

            if let AttemptOutcome::Resolved { original_language } = outcome {
                info!(
                    service = %attempt.service,
                    language = %original_language,
                    "Resolved original language"
                );
                return ResolvedIdentity {
                    source: IdentitySource::MetadataService,
                    original_language,
                    provider: attempt.service,
                };
            }
        }

        info!(name = display_name, "No metadata found, using fallback language");
        ResolvedIdentity::fallback(self.plan.primary().unwrap_or_default())
    }

    /// Run a single attempt.
    pub async fn run_attempt(
        &self,
        attempt: Attempt,
        display_name: &str,
        rationale: &mut Rationale,
    ) -> AttemptOutcome {
        let service = label(attempt.service);

        let Some(library) = self.library(attempt.service) else {
            return AttemptOutcome::Skipped(format!("{} is not configured", service));
        };
        if !self.metadata.is_available() {
            return AttemptOutcome::Skipped(format!("{} has no API key", self.metadata.name()));
        }

        let identifier = match library.parse_title(display_name).await {
            Ok(Some(parsed)) => {
                if let Some(language) = &parsed.language_name {
                    rationale.note(format!("Language tag picked up by {}: {}", service, language));
                }
                match parsed.imdb_id {
                    Some(id) => {
                        rationale.note(format!("Grabbed ID ({}) from {}", id, service));
                        id
                    }
                    None => {
                        rationale.note(format!("{} match has no IMDb id", service));
                        display_name.to_string()
                    }
                }
            }
            Ok(None) => {
                rationale.note(format!("Couldn't grab ID from {}", service));
                display_name.to_string()
            }
            Err(e) => {
                let err = Error::lookup(service, format!("{:#}", e));
                warn!("{}", err);
                rationale.fail(format!("{} lookup failed.", service));
                return AttemptOutcome::NotFound(format!("{} lookup failed", service));
            }
        };

        let Some(imdb_id) = extract_imdb_id(&identifier) else {
            rationale.fail("Couldn't find the IMDb id of this file. Skipping.");
            return AttemptOutcome::NotFound("no IMDb id".to_string());
        };

        let provider = self.metadata.name().to_uppercase();
        match self.metadata.find_by_imdb(&imdb_id).await {
            Ok(Some(found)) => {
                rationale.note(format!(
                    "Language tag picked up by {}: {}",
                    provider,
                    to_three_letter_or_keep(&found.original_language)
                ));
                AttemptOutcome::Resolved {
                    original_language: found.original_language,
                }
            }
            Ok(None) => {
                rationale.fail("No IMDb result was found.");
                AttemptOutcome::NotFound(format!("{} has no match for {}", provider, imdb_id))
            }
            Err(e) => {
                let err = Error::lookup(self.metadata.name(), format!("{:#}", e));
                warn!(imdb_id = %imdb_id, "{}", err);
                rationale.fail(format!("Error fetching data from {} API.", provider));
                AttemptOutcome::NotFound(format!("{} lookup failed", provider))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arr::ParsedTitle;
    use crate::metadata::{MediaType, TitleMatch};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubLibrary {
        kind: ServiceKind,
        answer: Result<Option<ParsedTitle>, String>,
        calls: AtomicUsize,
    }

    impl StubLibrary {
        fn new(kind: ServiceKind, answer: Result<Option<ParsedTitle>, String>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                answer,
                calls: AtomicUsize::new(0),
            })
        }

        fn with_id(kind: ServiceKind, id: &str) -> Arc<Self> {
            Self::new(
                kind,
                Ok(Some(ParsedTitle {
                    imdb_id: Some(id.to_string()),
                    ..Default::default()
                })),
            )
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

    struct StubMetadata {
        known: Vec<(&'static str, &'static str)>,
        fail: bool,
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
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self
                .known
                .iter()
                .find(|(id, _)| *id == imdb_id)
                .map(|(_, lang)| TitleMatch {
                    id: Some(1),
                    title: None,
                    media_type: MediaType::Movie,
                    original_language: lang.to_string(),
                }))
        }
    }

    fn metadata(known: Vec<(&'static str, &'static str)>) -> Arc<dyn MetadataService> {
        Arc::new(StubMetadata { known, fail: false })
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let radarr = StubLibrary::with_id(ServiceKind::Radarr, "tt0245429");
        let sonarr = StubLibrary::with_id(ServiceKind::Sonarr, "tt0000001");
        let resolver = Resolver::new(
            AttemptPlan::from_priority(ServiceKind::Radarr),
            metadata(vec![("tt0245429", "ja")]),
        )
        .with_library(radarr.clone())
        .with_library(sonarr.clone());

        let mut rationale = Rationale::new();
        let identity = resolver.resolve("Spirited.Away.mkv", &mut rationale).await;

        assert_eq!(identity.source, IdentitySource::MetadataService);
        assert_eq!(identity.original_language, "ja");
        assert_eq!(identity.native_language(), "jpn");
        assert_eq!(identity.provider, ServiceKind::Radarr);
        assert_eq!(radarr.calls.load(Ordering::SeqCst), 1);
        assert_eq!(sonarr.calls.load(Ordering::SeqCst), 0);
        assert!(rationale.mentions("Grabbed ID (tt0245429) from Radarr"));
    }

    #[tokio::test]
    async fn priority_decides_order() {
        let radarr = StubLibrary::with_id(ServiceKind::Radarr, "tt0245429");
        let sonarr = StubLibrary::with_id(ServiceKind::Sonarr, "tt0903747");
        let resolver = Resolver::new(
            AttemptPlan::from_priority(ServiceKind::Sonarr),
            metadata(vec![("tt0245429", "ja"), ("tt0903747", "en")]),
        )
        .with_library(radarr.clone())
        .with_library(sonarr);

        let identity = resolver.resolve("x", &mut Rationale::new()).await;
        assert_eq!(identity.provider, ServiceKind::Sonarr);
        assert_eq!(identity.original_language, "en");
        assert_eq!(radarr.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_service_falls_through_to_next() {
        let radarr = StubLibrary::new(ServiceKind::Radarr, Err("timed out".into()));
        let sonarr = StubLibrary::with_id(ServiceKind::Sonarr, "tt0903747");
        let resolver = Resolver::new(
            AttemptPlan::from_priority(ServiceKind::Radarr),
            metadata(vec![("tt0903747", "en")]),
        )
        .with_library(radarr)
        .with_library(sonarr);

        let mut rationale = Rationale::new();
        let identity = resolver.resolve("x", &mut rationale).await;
        assert_eq!(identity.provider, ServiceKind::Sonarr);
        assert!(rationale.mentions("Radarr lookup failed."));
    }

    #[tokio::test]
    async fn unrecognised_name_uses_raw_identifier() {
        let radarr = StubLibrary::new(ServiceKind::Radarr, Ok(None));
        let resolver = Resolver::new(
            AttemptPlan::from_priority(ServiceKind::Radarr),
            metadata(vec![("tt0245429", "ja")]),
        )
        .with_library(radarr);

        let identity = resolver
            .resolve("Spirited Away {imdb-tt0245429}.mkv", &mut Rationale::new())
            .await;
        assert_eq!(identity.original_language, "ja");
    }

    #[tokio::test]
    async fn missing_credentials_skip_attempt() {
        let resolver = Resolver::new(
            AttemptPlan::from_priority(ServiceKind::Radarr),
            metadata(vec![("tt0245429", "ja")]),
        );
        let outcome = resolver
            .run_attempt(
                Attempt {
                    service: ServiceKind::Radarr,
                },
                "tt0245429",
                &mut Rationale::new(),
            )
            .await;
        assert!(matches!(outcome, AttemptOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn everything_failing_yields_fallback() {
        let radarr = StubLibrary::new(ServiceKind::Radarr, Err("503".into()));
        let sonarr = StubLibrary::with_id(ServiceKind::Sonarr, "tt0903747");
        let resolver = Resolver::new(
            AttemptPlan::from_priority(ServiceKind::Sonarr),
            Arc::new(StubMetadata {
                known: vec![],
                fail: true,
            }),
        )
        .with_library(radarr)
        .with_library(sonarr);

        let identity = resolver.resolve("x", &mut Rationale::new()).await;
        assert!(identity.is_fallback());
        assert_eq!(identity.original_language, FALLBACK_LANGUAGE);
        assert_eq!(identity.native_language(), "eng");
        assert_eq!(identity.provider, ServiceKind::Sonarr);
    }

    #[test]
    fn from_config_skips_arrs_without_credentials() {
        let mut config = Config::default();
        config.arrs.push(crate::config::ArrConfig {
            name: "movies".into(),
            arr_type: ServiceKind::Radarr,
            url: "localhost:7878".into(),
            api_key: String::new(),
            enabled: true,
        });
        let resolver = Resolver::from_config(&config);
        assert!(resolver.library(ServiceKind::Radarr).is_none());
        assert_eq!(resolver.plan().primary(), Some(ServiceKind::Radarr));
    }
}
