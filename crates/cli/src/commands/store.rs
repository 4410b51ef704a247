//! Storage maintenance commands.

use omnicart_storefront::state::AppState;
use omnicart_storefront::store::{MigrationReport, StoreError};
use tracing::info;

/// Rewrite every stored document in the current envelope version.
///
/// # Errors
///
/// Returns `StoreError` if the backend fails.
pub fn migrate(state: &AppState) -> Result<MigrationReport, StoreError> {
    let report = state.docs().migrate_all()?;
    info!(
        rewritten = report.rewritten.len(),
        current = report.current.len(),
        skipped = report.skipped.len(),
        "Migrated stored documents"
    );
    Ok(report)
}

/// List every stored key.
///
/// # Errors
///
/// Returns `StoreError` if the backend fails.
pub fn keys(state: &AppState) -> Result<Vec<String>, StoreError> {
    state.docs().store().keys()
}
