//! Step definitions for resource lookup scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
