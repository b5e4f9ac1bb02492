//! Merged report for one aggregated lookup.

use super::LookupResult;
use super::result::millis;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Every service's result for one identifier, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    #[serde(rename = "systems_searched")]
    services_searched: usize,
    hits: usize,
    #[serde(rename = "total_response_time_ms")]
    total_elapsed_ms: u64,
    #[serde(rename = "responses")]
    results: Vec<LookupResult>,
}

impl AggregateReport {
    /// Starts an empty report covering `services_searched` services.
    #[must_use]
    pub fn new(services_searched: usize) -> Self {
        Self {
            services_searched,
            hits: 0,
            total_elapsed_ms: 0,
            results: Vec::with_capacity(services_searched),
        }
    }

    /// Appends a result, counting it as a hit when its status is 2xx.
    pub fn push(&mut self, result: LookupResult) {
        if result.is_hit() {
            self.hits += 1;
        }
        self.results.push(result);
    }

    /// Stamps the end-to-end duration and returns the finished report.
    #[must_use]
    pub fn finish(mut self, elapsed: Duration) -> Self {
        self.total_elapsed_ms = millis(elapsed);
        self
    }

    /// Returns how many services the lookup covered.
    #[must_use]
    pub const fn services_searched(&self) -> usize {
        self.services_searched
    }

    /// Returns how many services answered with a 2xx status.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the end-to-end duration in milliseconds.
    #[must_use]
    pub const fn total_elapsed_ms(&self) -> u64 {
        self.total_elapsed_ms
    }

    /// Returns the results in arrival order.
    #[must_use]
    pub fn results(&self) -> &[LookupResult] {
        &self.results
    }

    /// Returns the result reported by `service_name`, if any.
    #[must_use]
    pub fn result_for(&self, service_name: &str) -> Option<&LookupResult> {
        self.results
            .iter()
            .find(|result| result.service_name() == service_name)
    }
}
