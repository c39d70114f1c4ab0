//! Ordered lookup attempts.

use serde::{Deserialize, Serialize};
use std::fmt;
use trackforged_common::ServiceKind;

/// One step of the plan: ask this library service, then the metadata
/// service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub service: ServiceKind,
}

/// Library services to try, in order. The first success ends the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptPlan {
    attempts: Vec<Attempt>,
}

impl AttemptPlan {
    /// `primary` first, then the other service.
    pub fn from_priority(primary: ServiceKind) -> Self {
        Self {
            attempts: vec![
                Attempt { service: primary },
                Attempt {
                    service: primary.other(),
                },
            ],
        }
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    /// Service the plan starts with.
    pub fn primary(&self) -> Option<ServiceKind> {
        self.attempts.first().map(|a| a.service)
    }
}

/// How one attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The metadata service reported an original language.
    Resolved { original_language: String },
    /// The attempt could not run (no credentials, no client).
    Skipped(String),
    /// The attempt ran and found nothing usable.
    NotFound(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { original_language } => write!(f, "resolved ({})", original_language),
            Self::Skipped(reason) => write!(f, "skipped: {}", reason),
            Self::NotFound(reason) => write!(f, "not found: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_from_priority() {
        let plan = AttemptPlan::from_priority(ServiceKind::Sonarr);
        let order: Vec<_> = plan.attempts().iter().map(|a| a.service).collect();
        assert_eq!(order, vec![ServiceKind::Sonarr, ServiceKind::Radarr]);
        assert_eq!(plan.primary(), Some(ServiceKind::Sonarr));
    }
}
