//! Template assembly: value extraction, resource ordering and encoding.
//!
//! ```text
//! Discovery ──► build policy (no diagnostics / scan errors)
//!     │
//!     ▼
//! ValueExtractor::extract(ExtractionRequest) ──► ValueMap
//!     │
//!     ▼
//! TemplateBuilder::build
//!     ├── Parameters / Mappings / Conditions   (sorted by name)
//!     ├── Resources   (Kahn order, cycle → BuildError::Cycle)
//!     ├── Outputs     (sorted by name)
//!     └── Transform   (shape-registry rule)
//!     │
//!     ▼
//! Template ──► to_json / to_yaml
//! ```

mod builder;
mod document;
mod error;
mod extract;
mod order;
mod values;

pub use builder::TemplateBuilder;
pub use document::{
    EncodeError, ExportEntry, OutputEntry, ParameterEntry, ResourceEntry, Template,
};
pub use error::{BuildError, CycleMember};
pub use extract::{
    EvalError, ExtractionError, ExtractionRequest, FixedValues, RequestedDeclaration,
    StaticEvaluator, ValueExtractor, ValueMap,
};
pub use order::resource_order;
pub use values::{is_intrinsic, transform_value};

use tracing::debug;

use crate::hir::Discovery;

/// Run the tail of the pipeline on a finished discovery.
///
/// Refuses to build while discovery reported any diagnostic or scan error.
pub fn build_template(
    discovery: &Discovery,
    extractor: &dyn ValueExtractor,
    builder: &TemplateBuilder,
) -> Result<Template, BuildError> {
    if discovery.has_errors() {
        let first = discovery
            .scan_errors()
            .first()
            .map(ToString::to_string)
            .or_else(|| discovery.diagnostics().first().map(ToString::to_string))
            .unwrap_or_default();
        return Err(BuildError::Validation {
            count: discovery.scan_errors().len() + discovery.diagnostics().len(),
            first,
        });
    }

    let request = ExtractionRequest::from_discovery(discovery);
    debug!("extracting values for {} declarations", request.declarations.len());
    let values = extractor.extract(&request)?;
    builder.build(discovery.declarations(), &values)
}
