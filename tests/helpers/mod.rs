//! Shared fixtures for integration tests.

pub mod fixtures;
pub mod template_assertions;
