//! Decision plugins.
//!
//! Each plugin takes a [`PluginInput`] and returns a [`Decision`]. Plugins
//! never fail: anything that goes wrong becomes a skipped decision with a
//! rationale line.

mod faststart;
mod input;
mod keep_native;
mod native_lang;

pub use faststart::{FaststartPlugin, FASTSTART_ARGS};
pub use input::PluginInput;
pub use keep_native::KeepNativePlugin;
pub use native_lang::{NativeLanguagePlugin, EXTRA_ARGS};

use std::fmt;
use std::str::FromStr;

use crate::config::Config;
use crate::decision::Decision;

/// The available plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    /// Original language (looked up) plus user languages.
    NativeLang,
    /// Fixed native language, no lookups.
    KeepNative,
    /// MP4 faststart.
    Faststart,
}

impl PluginKind {
    pub const ALL: [PluginKind; 3] = [Self::NativeLang, Self::KeepNative, Self::Faststart];
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NativeLang => write!(f, "native-lang"),
            Self::KeepNative => write!(f, "keep-native"),
            Self::Faststart => write!(f, "faststart"),
        }
    }
}

impl FromStr for PluginKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "native-lang" | "native" => Ok(Self::NativeLang),
            "keep-native" => Ok(Self::KeepNative),
            "faststart" => Ok(Self::Faststart),
            _ => Err(format!(
                "Unknown plugin: {} (expected one of: native-lang, keep-native, faststart)",
                s
            )),
        }
    }
}

/// Run one plugin against `input`.
pub async fn decide(kind: PluginKind, config: &Config, input: &PluginInput) -> Decision {
    match kind {
        PluginKind::NativeLang => NativeLanguagePlugin::from_config(config).decide(input).await,
        PluginKind::KeepNative => KeepNativePlugin::from_config(config).decide(input),
        PluginKind::Faststart => FaststartPlugin::from_config(config).decide(input),
    }
}
