//! `inventory/render` dispatch: gathers the items a render generator needs
//! and hands them off. The rasterizer itself is an out-of-scope
//! collaborator this crate only defines the trait boundary for.

use model::messages::RenderScanRequest;
use store::InventoryStore;

use crate::{collaborators::RenderGenerator, Error};

/// Gathers the `box`/`empty` items composing `request.scan_id`'s aisle/side
/// and hands them to `render_generator`.
pub async fn dispatch_render_request(request: &RenderScanRequest, inventory: &dyn InventoryStore, render_generator: &dyn RenderGenerator) -> Result<(), Error> {
    let items = inventory.find_renderable(request.aisle_index, request.side).await;

    tracing::info!(scan_id = %request.scan_id, aisle_index = request.aisle_index, items = items.len(), "dispatching render request");

    render_generator.render(request, items).await?;
    Ok(())
}
