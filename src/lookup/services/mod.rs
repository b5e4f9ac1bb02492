//! Lookup orchestration services.

mod aggregator;

pub use aggregator::{AggregatorSettings, LookupAggregator};
