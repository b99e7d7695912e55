//! Partial item clustering: groups
//! partial detections of the same physical box/empty/conveyor and builds
//! one canonical `Item` per cluster.

use geometry::{area, bounding_box, overlap_area, union};
use model::{partial::PartialItem, Axis, Item, ItemAbsolute, ItemMeta, ItemRelative, ItemType, Location, Vector3};
use uuid::Uuid;

use crate::{
    cluster::{connected_components, EdgeProbe},
    Error,
};

/// Partials farther apart than this (on `absolute.position.x`) never merge;
/// the input is pre-sorted so once this gap appears, no later candidate
/// can close it either.
const DISTANCE_THRESHOLD: f64 = 1.5;

/// Minimum bounding-box overlap fraction (strict) for two partials to merge.
const MERGE_THRESHOLD: f64 = 0.4;

/// Minimum `absolute.dimension.x` for a partial item to be considered at all.
const MIN_WIDTH: f64 = 0.08;

/// Clusters `partials` (already filtered to one `(aisle_index, side,
/// item_type)` triple and one scan) into canonical items. A cluster whose
/// members disagree on `aligned_axis`/`aisle_index`/`item_type`/`scan_id`
/// is reported as an `Err` alongside the otherwise-successful items, so the
/// caller can continue compiling the remaining clusters.
pub fn merge_partial_items(mut partials: Vec<PartialItem>) -> Vec<Result<Item, Error>> {
    partials.retain(|p| p.absolute.dimension.x >= MIN_WIDTH);
    partials.sort_by(|a, b| a.absolute.position.x.partial_cmp(&b.absolute.position.x).unwrap());

    let bboxes: Vec<_> = partials
        .iter()
        .map(|p| bounding_box(p.absolute.position, p.relative.dimension.x, p.relative.dimension.y, p.absolute.aligned_axis))
        .collect();

    let components = connected_components(partials.len(), |i, j| {
        if (partials[j].absolute.position.x - partials[i].absolute.position.x).abs() > DISTANCE_THRESHOLD {
            return EdgeProbe::StopScanning;
        }
        let overlap = overlap_area(&bboxes[i], &bboxes[j]);
        if overlap > MERGE_THRESHOLD * area(&bboxes[i]) || overlap > MERGE_THRESHOLD * area(&bboxes[j]) {
            EdgeProbe::Merge
        } else {
            EdgeProbe::Skip
        }
    });

    components
        .into_iter()
        .map(|indices| build_canonical_item(&partials, &bboxes, &indices))
        .collect()
}

fn build_canonical_item(partials: &[PartialItem], bboxes: &[geometry::Rectangle], indices: &[usize]) -> Result<Item, Error> {
    let first = &partials[indices[0]];

    for &i in indices {
        let member = &partials[i];
        if member.absolute.aligned_axis != first.absolute.aligned_axis
            || member.meta.aisle_index != first.meta.aisle_index
            || member.meta.item_type != first.meta.item_type
            || member.meta.scan_id != first.meta.scan_id
        {
            return Err(Error::NonUniformCluster {
                aisle_index: first.meta.aisle_index,
                scan_id: first.meta.scan_id.clone(),
            });
        }
    }

    let union_bbox = indices.iter().skip(1).fold(bboxes[indices[0]], |acc, &i| union(&acc, &bboxes[i]));

    let ideal = indices
        .iter()
        .map(|&i| (i, area(&bboxes[i])))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|(i, _)| &partials[i])
        .unwrap_or(first);

    let center = geometry::bottom_center(&union_bbox);
    let position = match first.absolute.aligned_axis {
        Axis::Z => Vector3::new(ideal.absolute.position.x, center.y, center.x),
        Axis::X | Axis::Y => Vector3::new(center.x, center.y, ideal.absolute.position.z),
    };

    Ok(Item {
        uuid: Uuid::new_v4(),
        meta: ItemMeta {
            item_type: first.meta.item_type,
            location: Location::Inventory,
            destination: None,
            available: true,
            aisle_index: first.meta.aisle_index,
            scan_id: first.meta.scan_id.clone(),
            stack: Vec::new(),
        },
        absolute: ItemAbsolute {
            position,
            dimension: Vector3::new(union_bbox.width(), union_bbox.height(), 0.0),
            aligned_axis: first.absolute.aligned_axis,
            waypoint: None,
            depth_index: None,
            stack_index: None,
        },
        relative: ItemRelative {
            dimension: ideal.relative.dimension,
            side: ideal.relative.side,
        },
        barcodes: Vec::new(),
        primary_barcode: None,
    })
}
