//! Unit tests for lookup fan-out.
