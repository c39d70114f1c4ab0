//! Trackforged-Common: Shared types, language tables, and error types.
//!
//! This crate provides the pieces every trackforged plugin agrees on:
//!
//! - **Error Handling**: the decision error taxonomy and a result alias
//! - **Core Types**: codec types and library service kinds
//! - **Languages**: ISO 639 conversion and provider-specific overrides
//!
//! # Examples
//!
//! ```
//! use trackforged_common::language::{map_provider_language, to_three_letter};
//! use trackforged_common::ServiceKind;
//!
//! assert_eq!(to_three_letter("fr").unwrap(), "fre");
//! assert_eq!(map_provider_language("chi", ServiceKind::Radarr), "cn");
//!
//! // Unknown codes are an error the caller recovers from.
//! let lang = to_three_letter("xx").unwrap_or_else(|_| "xx".to_string());
//! assert_eq!(lang, "xx");
//! ```

pub mod error;
pub mod language;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
