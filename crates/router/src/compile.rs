//! `scan/compile` dispatch: a thin pass-through to the scan compiler.

use model::{messages::CompileScanDataRequest, ItemUpdate};
use store::{InventoryStore, PartialStore};

/// Compiles the partials named by `request` and returns the resulting
/// change log, publishable on `inventory/updates`.
pub async fn handle_scan_compile(request: &CompileScanDataRequest, partial_store: &dyn PartialStore, inventory_store: &dyn InventoryStore) -> Vec<ItemUpdate> {
    compiler::compile_scan_data(request, partial_store, inventory_store).await
}
