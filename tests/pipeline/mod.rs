//! End-to-end pipeline tests
//!
//! Source trees are written to temporary directories, scanned, evaluated
//! statically and built:
//! - Resource ordering and determinism
//! - Cycle reporting
//! - Transitive attribute references
//! - Discovery validation and the build policy
//! - Document encodings

mod tests_attr_refs;
mod tests_build_order;
mod tests_cycles;
mod tests_encoding;
mod tests_sections;
mod tests_source_forms;
mod tests_validation;
mod tests_workspace;
