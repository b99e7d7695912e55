//! Barcode assignment: attaches each canonical
//! barcode to the first canonical item whose bounding box fully contains it.

use geometry::contains_point;
use model::{Barcode, BarcodeAbsolute, BarcodeMeta, BarcodeRelative, Header, Item, Side, Vector3};

use crate::barcode_merge::UnassignedBarcode;

/// Assigns every barcode in `barcodes` to the first item (in `items`'
/// iteration order) whose bounding box contains both corners of the
/// barcode's bounding box. Barcodes matching no item are dropped (logged by
/// the caller). Sets each item's `primary_barcode` to its first attached
/// primary-type barcode, if any.
pub fn assign_barcodes(items: &mut [Item], barcodes: Vec<UnassignedBarcode>) -> usize {
    let mut dropped = 0;

    for barcode in barcodes {
        let bbox = geometry::bounding_box(barcode.position, barcode.dimension.x, barcode.dimension.y, barcode.aligned_axis);

        let target = items
            .iter_mut()
            .find(|item| contains_point(&item.bounding_box(), bbox.bottom_left.x, bbox.bottom_left.y) && contains_point(&item.bounding_box(), bbox.top_right.x, bbox.top_right.y));

        match target {
            Some(item) => {
                let relative_position = Vector3::new(
                    barcode.position.x - item.absolute.position.x,
                    barcode.position.y - item.absolute.position.y,
                    barcode.position.z - item.absolute.position.z,
                );

                let attached = Barcode {
                    meta: BarcodeMeta {
                        barcode_type: barcode.barcode_type,
                        data: barcode.data,
                        aisle_index: barcode.aisle_index,
                    },
                    absolute: BarcodeAbsolute {
                        position: barcode.position,
                        dimension: barcode.dimension,
                        aligned_axis: barcode.aligned_axis,
                    },
                    relative: BarcodeRelative {
                        header: Header { frame_id: "parent_item".into() },
                        position: relative_position,
                        dimension: barcode.dimension,
                        side: barcode.side,
                    },
                    item_uuid: item.uuid,
                };

                item.barcodes.push(attached.clone());
                if item.primary_barcode.is_none() && attached.is_primary() {
                    item.primary_barcode = Some(attached);
                }
            }
            None => {
                tracing::warn!(data = %barcode.data, "partial barcode merged but no enclosing item found, dropping");
                dropped += 1;
            }
        }
    }

    dropped
}
