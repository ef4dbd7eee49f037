//! Project layer: injected configuration and source-tree loading.

mod config;
pub mod file_loader;
pub mod workspace_loader;

pub use config::{ConfigError, ReservedNames, ScanConfig, ShapeRegistry, TransformRule};
pub use workspace_loader::{RootScan, SourceRoot, WorkspaceLoader};
