//! Registration status of a tracked domain.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a domain in the progress file.
///
/// Serialized as `"NotStarted"`, `"Success"` and `"Failed"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainStatus {
    /// Tracked but never attempted.
    #[default]
    NotStarted,
    /// Registration confirmed on chain.
    Success,
    /// Last attempt failed; eligible for retry.
    Failed,
}

impl DomainStatus {
    /// Returns true if the domain must not be attempted again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if the batch driver should attempt the domain.
    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
