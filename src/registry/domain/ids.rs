//! Identifier and validated-name types for registered services.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a service name.
const MAX_SERVICE_NAME_LENGTH: usize = 100;

/// Identifier assigned to a service record by the backing store.
///
/// Identifiers are handed out in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(u64);

impl ServiceId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated, unique service name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// The input is trimmed. Names keep their case because the identity probe
    /// compares them against what the service reports about itself.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let normalized = value.into().trim().to_owned();

        if normalized.is_empty() {
            return Err(RegistryDomainError::EmptyServiceName);
        }

        let has_invalid = normalized
            .chars()
            .any(|character| character == ',' || character.is_control());
        if has_invalid {
            return Err(RegistryDomainError::InvalidServiceName(normalized));
        }

        if normalized.chars().count() > MAX_SERVICE_NAME_LENGTH {
            return Err(RegistryDomainError::ServiceNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the marker a genuine service includes in its liveness response.
    #[must_use]
    pub fn identity_marker(&self) -> String {
        format!("{} Aries API", self.0)
    }

    /// Returns the service name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Virgo", "Virgo")]
    #[case("  ArchivesSpace ", "ArchivesSpace")]
    #[case("Special Collections", "Special Collections")]
    fn valid_names_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        let name = ServiceName::new(input).expect("name should be valid");
        assert_eq!(name.as_str(), expected);
    }

    #[rstest]
    #[case("", RegistryDomainError::EmptyServiceName)]
    #[case("   ", RegistryDomainError::EmptyServiceName)]
    #[case("a,b", RegistryDomainError::InvalidServiceName("a,b".to_owned()))]
    #[case("tab\there", RegistryDomainError::InvalidServiceName("tab\there".to_owned()))]
    fn invalid_names_are_rejected(#[case] input: &str, #[case] expected: RegistryDomainError) {
        assert_eq!(ServiceName::new(input), Err(expected));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let long = "x".repeat(MAX_SERVICE_NAME_LENGTH + 1);
        assert!(matches!(
            ServiceName::new(long),
            Err(RegistryDomainError::ServiceNameTooLong(_))
        ));
    }

    #[test]
    fn identity_marker_embeds_the_name() {
        let name = ServiceName::new("Virgo").expect("name should be valid");
        assert_eq!(name.identity_marker(), "Virgo Aries API");
    }
}
