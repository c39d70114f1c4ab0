//! Trackforged - language-aware track selection for transcode pipelines
//!
//! This library crate exposes the decision plugins and their building blocks
//! for the CLI and for integration testing.

pub mod arr;
pub mod classify;
pub mod config;
pub mod decision;
pub mod metadata;
pub mod plugins;
pub mod resolver;
