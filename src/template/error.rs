use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

use super::extract::ExtractionError;
use crate::base::Location;

/// A participant of a dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleMember {
    pub name: SmolStr,
    pub location: Location,
}

impl fmt::Display for CycleMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// Fatal errors of one build. No partial document accompanies them.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{location}: {name}: unknown resource type {shape}")]
    UnknownResourceType {
        name: SmolStr,
        shape: String,
        location: Location,
    },

    /// The first member is repeated at the end to close the cycle.
    #[error("dependency cycle detected: {}", format_cycle(cycle))]
    Cycle { cycle: Vec<CycleMember> },

    #[error("{location}: {name}: field {field} must be {expected}")]
    InvalidField {
        name: SmolStr,
        field: &'static str,
        expected: &'static str,
        location: Location,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("discovery reported {count} error(s); first: {first}")]
    Validation { count: usize, first: String },
}

impl BuildError {
    /// Names of the cycle participants, without the closing repeat.
    pub fn cycle_names(&self) -> Vec<&str> {
        match self {
            BuildError::Cycle { cycle } => {
                let open = cycle.len().saturating_sub(1);
                cycle[..open].iter().map(|m| m.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn format_cycle(cycle: &[CycleMember]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
