//! CLI command handlers for `CreditChecker`.
//!
//! Each command is implemented in its own submodule.

pub mod catalog;
pub mod check;
pub mod config;
pub mod session;

use credit_checker::core::loader::{CatalogRepository, CatalogSource};
use credit_checker::core::models::Catalog;
use credit_checker::{error, info, verbose, warn};
use std::sync::Arc;

/// Fetch the catalog through the repository, reporting failures on stderr
///
/// # Returns
/// `None` when the catalog could not be loaded
pub fn load_catalog<S: CatalogSource>(repository: &mut CatalogRepository<S>) -> Option<Arc<Catalog>> {
    match repository.catalog() {
        Ok(catalog) => {
            report_diagnostics(&catalog);
            Some(catalog)
        }
        Err(e) => {
            error!("Catalog load failed: {e}");
            eprintln!("✗ Failed to load catalog: {e}");
            None
        }
    }
}

/// Log data-quality findings of a freshly loaded catalog
pub fn report_diagnostics(catalog: &Catalog) {
    if catalog.diagnostics.is_empty() {
        info!(
            "Catalog loaded: {} faculties, {} majors, {} courses",
            catalog.faculties.len(),
            catalog.majors.len(),
            catalog.courses().len()
        );
        return;
    }
    warn!("Catalog loaded with {}", catalog.diagnostics.summary_line());
    for diagnostic in catalog.diagnostics.iter() {
        verbose!("  {diagnostic}");
    }
}
