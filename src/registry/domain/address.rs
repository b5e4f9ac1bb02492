//! Base address value object for downstream services.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated base address of a downstream service.
///
/// Trailing slashes are stripped so that path suffixes can be appended with a
/// single separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseAddress(String);

impl BaseAddress {
    /// Creates a validated base address.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError`] when `value` is empty or does not start
    /// with `http://` or `https://`.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let trimmed = value.into().trim().trim_end_matches('/').to_owned();
        if trimmed.is_empty() {
            return Err(RegistryDomainError::EmptyBaseAddress);
        }

        let has_valid_prefix = trimmed.starts_with("http://") || trimmed.starts_with("https://");
        let has_host = trimmed
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.is_empty());
        if !has_valid_prefix || !has_host {
            return Err(RegistryDomainError::InvalidBaseAddress(trimmed));
        }

        Ok(Self(trimmed))
    }

    /// Returns the address with `suffix` appended as a path.
    #[must_use]
    pub fn join(&self, suffix: &str) -> String {
        let segment = suffix.trim_matches('/');
        if segment.is_empty() {
            return self.0.clone();
        }
        format!("{}/{segment}", self.0)
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BaseAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BaseAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://virgo.lib.example.edu", "http://virgo.lib.example.edu")]
    #[case("https://as.example.edu/api/", "https://as.example.edu/api")]
    #[case(" http://127.0.0.1:8085// ", "http://127.0.0.1:8085")]
    fn addresses_are_normalized(#[case] input: &str, #[case] expected: &str) {
        let address = BaseAddress::new(input).expect("address should be valid");
        assert_eq!(address.as_str(), expected);
    }

    #[rstest]
    #[case("", RegistryDomainError::EmptyBaseAddress)]
    #[case("/", RegistryDomainError::EmptyBaseAddress)]
    #[case("ftp://files", RegistryDomainError::InvalidBaseAddress("ftp://files".to_owned()))]
    #[case("virgo.example.edu", RegistryDomainError::InvalidBaseAddress("virgo.example.edu".to_owned()))]
    #[case("http://", RegistryDomainError::InvalidBaseAddress("http:".to_owned()))]
    fn invalid_addresses_are_rejected(#[case] input: &str, #[case] expected: RegistryDomainError) {
        assert_eq!(BaseAddress::new(input), Err(expected));
    }

    #[test]
    fn join_appends_a_single_separator() {
        let address = BaseAddress::new("http://svc.example.edu/").expect("valid address");
        assert_eq!(address.join("/aries"), "http://svc.example.edu/aries");
        assert_eq!(address.join(""), "http://svc.example.edu");
    }
}
