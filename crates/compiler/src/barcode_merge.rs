//! Partial barcode clustering:
//! groups same-`(data, barcode_type)` detections within `merge_distance` of
//! each other into one canonical barcode, not yet attached to an item.

use geometry::{bottom_center, union, Axis, Vector3};
use model::{partial::PartialBarcode, Side};
use std::collections::HashMap;

use crate::cluster::{connected_components, EdgeProbe};

/// Euclidean distance under which two same-key partial barcodes merge.
const MERGE_DISTANCE: f64 = 0.1;

/// A canonical barcode before it has been assigned to an owning item: all
/// the fields of `model::Barcode` except `item_uuid`.
#[derive(Debug, Clone)]
pub struct UnassignedBarcode {
    /// Barcode symbology.
    pub barcode_type: String,
    /// Decoded barcode payload.
    pub data: String,
    /// Aisle this barcode was read in.
    pub aisle_index: i64,
    /// World-frame bounding box position and size.
    pub position: Vector3,
    /// `(width, height, depth)`.
    pub dimension: Vector3,
    /// World axis the owning shelf face runs along.
    pub aligned_axis: Axis,
    /// Shelf face the barcode was read from.
    pub side: Side,
}

/// Clusters `partials` (already restricted to one scan) by `(data,
/// barcode_type)` and 3D proximity.
pub fn merge_partial_barcodes(partials: Vec<PartialBarcode>) -> Vec<UnassignedBarcode> {
    let mut groups: HashMap<(String, String), Vec<PartialBarcode>> = HashMap::new();
    for partial in partials {
        groups.entry((partial.meta.data.clone(), partial.meta.barcode_type.clone())).or_default().push(partial);
    }

    groups.into_values().flat_map(merge_one_group).collect()
}

fn merge_one_group(partials: Vec<PartialBarcode>) -> Vec<UnassignedBarcode> {
    let components = connected_components(partials.len(), |i, j| {
        if partials[i].absolute.position.distance(&partials[j].absolute.position) < MERGE_DISTANCE {
            EdgeProbe::Merge
        } else {
            EdgeProbe::Skip
        }
    });

    components
        .into_iter()
        .map(|indices| {
            let first = &partials[indices[0]];
            // Barcodes carry no aligned axis of their own at the partial
            // stage; the shelf side determines which world axis the sticker
            // runs along, same convention as items.
            let aligned_axis = match first.relative.side {
                Side::Left => Axis::X,
                Side::Right => Axis::Z,
            };

            let bbox = |p: &PartialBarcode| geometry::bounding_box(p.absolute.position, p.relative.dimension.x, p.relative.dimension.y, aligned_axis);

            let union_bbox = indices.iter().skip(1).fold(bbox(first), |acc, &i| union(&acc, &bbox(&partials[i])));
            let center = bottom_center(&union_bbox);

            UnassignedBarcode {
                barcode_type: first.meta.barcode_type.clone(),
                data: first.meta.data.clone(),
                aisle_index: first.meta.aisle_index,
                position: Vector3::new(center.x, center.y, first.absolute.position.z),
                dimension: Vector3::new(union_bbox.width(), union_bbox.height(), 0.0),
                aligned_axis,
                side: first.relative.side,
            }
        })
        .collect()
}
