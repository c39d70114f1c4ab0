//! Human-readable decision log.
//!
//! One [`Rationale`] is created per invocation and passed by `&mut` through
//! every stage; nothing about it is shared between files.

use serde::Serialize;

const OK: &str = "☑";
const FAIL: &str = "☒";

/// Ordered log lines explaining a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Rationale {
    lines: Vec<String>,
}

impl Rationale {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain informational line.
    pub fn note(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "trackforged::rationale", "{}", line);
        self.lines.push(line);
    }

    /// Something that went the way the plugin wanted.
    pub fn ok(&mut self, line: impl AsRef<str>) {
        self.note(format!("{}{}", OK, line.as_ref()));
    }

    /// A skip, removal, or failure.
    pub fn fail(&mut self, line: impl AsRef<str>) {
        self.note(format!("{}{}", FAIL, line.as_ref()));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when any line contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}
