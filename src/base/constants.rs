//! Fixed literals shared by the scanner and the template builder.

/// Extension of declaration source files.
pub const SOURCE_EXT: &str = "go";

/// Suffix of test files that are never scanned.
pub const TEST_FILE_SUFFIX: &str = "_test.go";

/// Directory names skipped during recursive scans.
pub const SKIPPED_DIRS: &[&str] = &["vendor", "testdata"];

/// Separator marking a nested property-type shape (`s3.Bucket_Rule`).
pub const PROPERTY_TYPE_SEPARATOR: char = '_';

/// Value of the document's format-version marker.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Parameter type used when a parameter does not declare one.
pub const DEFAULT_PARAMETER_TYPE: &str = "String";

// ============================================================================
// SHAPE NAMES
// ============================================================================

pub const PARAMETER_SHAPE: &str = "Parameter";
pub const OUTPUT_SHAPE: &str = "Output";
pub const MAPPING_SHAPE: &str = "Mapping";

/// Boolean-combinator shapes that declare a condition.
pub const CONDITION_SHAPES: &[&str] = &["Equals", "And", "Or", "Not", "Condition"];
