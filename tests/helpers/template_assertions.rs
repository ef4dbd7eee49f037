//! Assertions over built templates.

use stackform::hir::Discovery;
use stackform::template::Template;

pub fn resource_names(template: &Template) -> Vec<String> {
    template.resource_names().map(str::to_string).collect()
}

/// Every resource appears after all of its resource dependencies.
pub fn assert_topological(template: &Template, discovery: &Discovery) {
    let order = resource_names(template);
    let position = |name: &str| order.iter().position(|n| n == name);

    for resource in discovery.resources() {
        let Some(at) = position(&resource.name) else {
            panic!("resource {} missing from template", resource.name);
        };
        for dep in &resource.dependencies {
            if discovery.is_resource(dep) {
                let dep_at = position(dep).unwrap_or(usize::MAX);
                assert!(
                    dep_at < at,
                    "{} (#{at}) must come after its dependency {dep} (#{dep_at})",
                    resource.name
                );
            }
        }
    }
}
