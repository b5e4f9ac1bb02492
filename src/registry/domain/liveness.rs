//! Service liveness states.

use super::ParseLivenessError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Liveness of a registered service as last observed by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    /// The service has not been probed yet.
    Unknown,
    /// The last probe succeeded.
    Alive,
    /// The last probe or lookup call failed.
    Dead,
}

impl Liveness {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Alive => "alive",
            Self::Dead => "dead",
        }
    }

    /// Returns whether lookups may be dispatched to the service.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Liveness {
    type Error = ParseLivenessError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unknown" => Ok(Self::Unknown),
            "alive" => Ok(Self::Alive),
            "dead" => Ok(Self::Dead),
            _ => Err(ParseLivenessError(value.to_owned())),
        }
    }
}
