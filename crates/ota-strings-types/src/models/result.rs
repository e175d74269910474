//! Outcome of one sync cycle.

use std::collections::BTreeSet;

/// Host-facing result of `check_for_updates`.
///
/// Failure messages are deliberately generic; the underlying error detail is
/// logged instead so this type stays stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// Nothing changed on the server, or every locale was already current
    NoChange,
    /// At least one locale received new content
    Updated(BTreeSet<String>),
    /// The cycle failed without updating any locale
    Failed(String),
}

impl UpdateResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Locales updated by this cycle, `None` unless `Updated`.
    pub fn updated_locales(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Updated(locales) => Some(locales),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}
