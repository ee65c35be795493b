//! Property-based tests for discovery and manifest invariants

mod manifest;
