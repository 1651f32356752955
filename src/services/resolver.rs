use crate::domain::{EnableError, ServiceDefinition};
use crate::services::ServiceCatalog;

/// Resolve shortnames against the catalog. The first unknown name aborts
/// the whole batch before any engine interaction happens.
pub fn resolve(
    catalog: &ServiceCatalog,
    names: &[String],
) -> Result<Vec<ServiceDefinition>, EnableError> {
    names
        .iter()
        .map(|name| {
            catalog
                .get(name)
                .cloned()
                .ok_or_else(|| EnableError::InvalidServiceShortname(name.clone()))
        })
        .collect()
}
