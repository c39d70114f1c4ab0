//! Metadata service lookups.
//!
//! A [`MetadataService`] answers one question: given an external catalog id,
//! what is the title's original language.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition, shared types, and id extraction.
//! - [`providers`] -- Concrete implementations (TMDB).

pub mod provider;
pub mod providers;

pub use provider::{extract_imdb_id, MediaType, MetadataService, TitleMatch};
pub use providers::TmdbProvider;
