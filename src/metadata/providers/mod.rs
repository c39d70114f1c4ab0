//! Concrete metadata service implementations.
//!
//! Each submodule wraps a single external API and implements the
//! [`MetadataService`](super::MetadataService) trait.

pub mod tmdb;

pub use tmdb::TmdbProvider;
