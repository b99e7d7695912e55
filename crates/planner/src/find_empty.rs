//! `find_empty_for_store`: locates the best-fit empty for a
//! `STORE_INVENTORY` target with no explicit destination, and narrows it
//! against a flush side when one is implied by neighboring boxes.

use model::{Item, ItemType, Side};
use store::InventoryStore;

use crate::Error;

/// Margin added to the target's own footprint before searching for an
/// empty large enough to hold it.
const STORE_MARGIN: f64 = 0.03;

/// How close an edge has to align with an empty's own edge to count as
/// "flush against it".
const ALIGNMENT_MARGIN: f64 = 0.1;

/// The `find_nearby` search window around an empty's own position.
const NEARBY_DX: f64 = 2.0;
const NEARBY_DY: f64 = 1.0;

/// Finds the smallest empty big enough for `target` and, where neighboring
/// boxes imply a side preference, narrows it flush against that side.
pub async fn find_empty_for_store(target: &Item, inventory: &dyn InventoryStore) -> Result<Item, Error> {
    let width = target.relative.dimension.x + 2.0 * STORE_MARGIN;
    let height = target.relative.dimension.y + STORE_MARGIN;

    let empty = inventory
        .find_best_empty(target.meta.aisle_index, target.relative.side, width, height)
        .await
        .ok_or(Error::NoEmptyAvailable { uuid: target.uuid })?;

    let empty_bbox = empty.bounding_box();
    let nearby = inventory
        .find_nearby(empty.meta.aisle_index, empty.relative.side, empty.absolute.position.x, empty.absolute.position.y, NEARBY_DX, NEARBY_DY)
        .await;

    let has_box_directly_below = nearby.iter().any(|item| {
        item.meta.item_type == ItemType::Box
            && (item.bounding_box().top_right.y - empty.absolute.position.y).abs() < ALIGNMENT_MARGIN
            && item.bounding_box().top_right.x > empty_bbox.bottom_left.x
            && item.bounding_box().bottom_left.x < empty_bbox.top_right.x
    });

    if has_box_directly_below {
        return Ok(empty);
    }

    let Some(side) = choose_side(&empty, &nearby) else {
        return Ok(empty);
    };

    Ok(construct_narrowed_empty(&empty, side, target.relative.dimension.x + 2.0 * STORE_MARGIN))
}

fn left_edge(empty: &Item, nearby: &[Item]) -> Option<&Item> {
    let empty_bbox = empty.bounding_box();
    nearby.iter().find(|item| {
        (item.absolute.position.y - empty.absolute.position.y).abs() < ALIGNMENT_MARGIN
            && (item.bounding_box().top_right.x - empty_bbox.bottom_left.x).abs() < ALIGNMENT_MARGIN
    })
}

fn right_edge(empty: &Item, nearby: &[Item]) -> Option<&Item> {
    let empty_bbox = empty.bounding_box();
    nearby.iter().find(|item| {
        (item.absolute.position.y - empty.absolute.position.y).abs() < ALIGNMENT_MARGIN
            && (item.bounding_box().bottom_left.x - empty_bbox.top_right.x).abs() < ALIGNMENT_MARGIN
    })
}

fn choose_side(empty: &Item, nearby: &[Item]) -> Option<Side> {
    let empty_bbox = empty.bounding_box();

    let left = left_edge(empty, nearby);
    let right = right_edge(empty, nearby);

    let left_distance = match left {
        Some(item) if item.meta.item_type == ItemType::Box => (empty_bbox.bottom_left.x - item.bounding_box().top_right.x).abs(),
        _ => f64::INFINITY,
    };
    let right_distance = match right {
        Some(item) if item.meta.item_type == ItemType::Box => (empty_bbox.top_right.x - item.bounding_box().bottom_left.x).abs(),
        _ => f64::INFINITY,
    };

    if left_distance.is_infinite() && right_distance.is_infinite() {
        return None;
    }

    if left_distance < right_distance {
        Some(Side::Left)
    } else {
        Some(Side::Right)
    }
}

fn construct_narrowed_empty(empty: &Item, side: Side, width: f64) -> Item {
    let empty_bbox = empty.bounding_box();

    let (left_limit, right_limit) = match side {
        Side::Left => (empty_bbox.bottom_left.x, empty_bbox.bottom_left.x + width),
        Side::Right => (empty_bbox.top_right.x - width, empty_bbox.top_right.x),
    };

    let center_x = (left_limit + right_limit) / 2.0;
    let mut narrowed = empty.clone();
    narrowed.absolute.position.x = center_x;
    narrowed.relative.dimension.x = (right_limit - left_limit).abs();
    narrowed
}
