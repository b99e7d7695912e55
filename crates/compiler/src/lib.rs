#![deny(
    trivial_numeric_casts,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    unused_results
)]
#![warn(rust_2021_compatibility, unreachable_pub)]

//! Clusters the noisy partial detections ingested from scan images into a
//! coherent set of canonical items and barcodes, computes stacking, and
//! attaches barcodes to their enclosing item.

mod assign;
mod barcode_merge;
mod cluster;
mod item_merge;
mod stack;

use std::collections::HashMap;

use model::{messages::CompileScanDataRequest, Item, ItemUpdate, Side};
use store::{InventoryStore, PartialItemFilter, PartialStore};

pub use stack::compute_stacks;

/// All the errors that can occur while compiling a scan.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A cluster of partial items disagreed on `aligned_axis`, `aisle_index`,
    /// `item_type`, or `scan_id`. That one cluster is skipped; compilation
    /// continues for every other cluster in the request.
    #[error("non-uniform cluster (aisle_index: {aisle_index}, scan_id: {scan_id})")]
    NonUniformCluster {
        /// Aisle of the offending cluster's first member.
        aisle_index: i64,
        /// Scan the offending cluster belongs to.
        scan_id: String,
    },
}

/// Compiles the partials collected for `request.scan_id` into canonical
/// items and barcodes, persisting them and returning the resulting change
/// log. A single cluster failing `NonUniformCluster` is logged and skipped;
/// it does not abort compilation of the rest of the scan.
pub async fn compile_scan_data(
    request: &CompileScanDataRequest,
    partial_store: &dyn PartialStore,
    inventory_store: &dyn InventoryStore,
) -> Vec<ItemUpdate> {
    if request.overwrite {
        inventory_store.delete_all_non_conveyor_items().await;
    }

    let filter = PartialItemFilter {
        scan_id: request.scan_id.clone(),
        aisle_index: request.aisle_index,
        side: request.side,
        item_type: request.item_type,
        confidence_threshold: request.confidence_threshold,
    };

    let partial_items = partial_store.find_partial_items(&filter).await;
    let partial_barcodes = partial_store.find_partial_barcodes(&request.scan_id, request.aisle_index).await;

    // Clustering runs per (aisle, side, item_type) triple, but stacking and
    // barcode assignment operate over every canonical item sharing just an
    // (aisle, side) — regardless of item_type — so the two groupings differ
    // and clustered items are re-bucketed before the second pass.
    let mut cluster_groups: HashMap<(i64, Side, model::ItemType), Vec<model::partial::PartialItem>> = HashMap::new();
    for partial in partial_items {
        cluster_groups
            .entry((partial.meta.aisle_index, partial.relative.side, partial.meta.item_type))
            .or_default()
            .push(partial);
    }

    let mut per_aisle_side: HashMap<(i64, Side), Vec<Item>> = HashMap::new();
    for ((aisle_index, side, _item_type), members) in cluster_groups {
        for result in item_merge::merge_partial_items(members) {
            match result {
                Ok(item) => per_aisle_side.entry((aisle_index, side)).or_default().push(item),
                Err(err) => tracing::error!(%aisle_index, error = %err, "skipping non-uniform partial item cluster"),
            }
        }
    }

    let mut updates = Vec::new();

    for ((aisle_index, side), mut items) in per_aisle_side {
        stack::compute_stacks(&mut items);

        let barcodes_for_group = partial_barcodes
            .iter()
            .filter(|b| b.meta.aisle_index == aisle_index && b.relative.side == side)
            .cloned()
            .collect::<Vec<_>>();
        let merged_barcodes = barcode_merge::merge_partial_barcodes(barcodes_for_group);
        let dropped = assign::assign_barcodes(&mut items, merged_barcodes);
        if dropped > 0 {
            tracing::warn!(%aisle_index, dropped, "barcodes merged with no enclosing item in this aisle/side");
        }

        for item in items {
            updates.push(inventory_store.create_item(item).await);
        }
    }

    updates
}
