//! Empty merge: grows a freshly vacated empty to absorb immediately
//! adjacent empties and clamp flush against adjacent boxes, run whenever a
//! fetch left no client-reserved `future_uuid` behind. A construction path
//! deliberately independent of the planner's `find_empty_for_store`: the two
//! run at different points in a job's lifecycle with different invariants
//! available, so they are not unified.

use model::{Item, ItemType, ItemUpdate};
use store::InventoryStore;

use crate::Error;

const ALIGNMENT_MARGIN: f64 = 0.1;
const NEARBY_DX: f64 = 2.0;
const NEARBY_DY: f64 = 1.0;

/// Grows `empty` to its final footprint, deleting any side or above empty
/// it absorbs. Returns the grown (not yet persisted) empty plus the
/// deletions the merge performed along the way.
pub async fn merge_empty(empty: Item, inventory: &dyn InventoryStore) -> Result<(Item, Vec<ItemUpdate>), Error> {
    let nearby = inventory
        .find_nearby(empty.meta.aisle_index, empty.relative.side, empty.absolute.position.x, empty.absolute.position.y, NEARBY_DX, NEARBY_DY)
        .await;

    let empty_bbox = empty.bounding_box();
    let below: Vec<&Item> = nearby
        .iter()
        .filter(|item| {
            item.meta.item_type == ItemType::Box
                && (item.bounding_box().top_right.y - empty.absolute.position.y).abs() < ALIGNMENT_MARGIN
                && item.bounding_box().top_right.x > empty_bbox.bottom_left.x
                && item.bounding_box().bottom_left.x < empty_bbox.top_right.x
        })
        .collect();

    let mut updates = Vec::new();

    let widened = if !below.is_empty() {
        expand_on_item(&empty, &below, &nearby)
    } else {
        let (expanded, deletions) = expand(empty, &nearby, inventory).await?;
        updates.extend(deletions);
        expanded
    };

    let (grown, above_deletions) = merge_above(widened, &nearby, inventory).await?;
    updates.extend(above_deletions);

    Ok((grown, updates))
}

fn horizontal_overlap(a: &geometry::Rectangle, b: &geometry::Rectangle) -> f64 {
    a.top_right.x.min(b.top_right.x) - a.bottom_left.x.max(b.bottom_left.x)
}

fn left_edge<'a>(empty: &Item, nearby: &'a [Item]) -> Option<&'a Item> {
    let empty_bbox = empty.bounding_box();
    nearby.iter().find(|item| {
        (item.absolute.position.y - empty.absolute.position.y).abs() < ALIGNMENT_MARGIN
            && (item.bounding_box().top_right.x - empty_bbox.bottom_left.x).abs() < ALIGNMENT_MARGIN
    })
}

fn right_edge<'a>(empty: &Item, nearby: &'a [Item]) -> Option<&'a Item> {
    let empty_bbox = empty.bounding_box();
    nearby.iter().find(|item| {
        (item.absolute.position.y - empty.absolute.position.y).abs() < ALIGNMENT_MARGIN
            && (item.bounding_box().bottom_left.x - empty_bbox.top_right.x).abs() < ALIGNMENT_MARGIN
    })
}

fn construct_empty(empty: &Item, left_limit: f64, right_limit: f64) -> Item {
    let mut constructed = empty.clone();
    constructed.absolute.position.x = (left_limit + right_limit) / 2.0;
    constructed.relative.dimension.x = (right_limit - left_limit).abs();
    constructed
}

fn expand_on_item(empty: &Item, below: &[&Item], nearby: &[Item]) -> Item {
    let empty_bbox = empty.bounding_box();
    let below_item = below.iter().max_by(|a, b| horizontal_overlap(&a.bounding_box(), &empty_bbox).partial_cmp(&horizontal_overlap(&b.bounding_box(), &empty_bbox)).unwrap()).unwrap();
    let below_bbox = below_item.bounding_box();

    let mut left_limit = below_bbox.bottom_left.x;
    if let Some(edge) = left_edge(empty, nearby) {
        if edge.meta.item_type == ItemType::Box {
            left_limit = left_limit.max(edge.bounding_box().top_right.x);
        }
    }

    let mut right_limit = below_bbox.top_right.x;
    if let Some(edge) = right_edge(empty, nearby) {
        if edge.meta.item_type == ItemType::Box {
            right_limit = right_limit.min(edge.bounding_box().bottom_left.x);
        }
    }

    construct_empty(empty, left_limit, right_limit)
}

async fn expand(empty: Item, nearby: &[Item], inventory: &dyn InventoryStore) -> Result<(Item, Vec<ItemUpdate>), Error> {
    let mut updates = Vec::new();
    let mut current = empty;

    if let Some(edge) = left_edge(&current, nearby) {
        let edge_bbox = edge.bounding_box();
        if edge.meta.item_type == ItemType::Box {
            current = construct_empty(&current, edge_bbox.top_right.x, current.bounding_box().top_right.x);
        } else if edge.meta.item_type == ItemType::Empty {
            let side_empty = edge.clone();
            current = merge_side(&current, &side_empty);
            updates.push(inventory.delete_item(side_empty.uuid).await?);
        }
    }

    if let Some(edge) = right_edge(&current, nearby) {
        let edge_bbox = edge.bounding_box();
        if edge.meta.item_type == ItemType::Box {
            current = construct_empty(&current, current.bounding_box().bottom_left.x, edge_bbox.bottom_left.x);
        } else if edge.meta.item_type == ItemType::Empty {
            let side_empty = edge.clone();
            current = merge_side(&current, &side_empty);
            updates.push(inventory.delete_item(side_empty.uuid).await?);
        }
    }

    Ok((current, updates))
}

fn merge_side(empty: &Item, side_empty: &Item) -> Item {
    let empty_bbox = empty.bounding_box();
    let side_bbox = side_empty.bounding_box();
    let left_limit = empty_bbox.bottom_left.x.min(side_bbox.bottom_left.x);
    let right_limit = empty_bbox.top_right.x.max(side_bbox.top_right.x);
    construct_empty(empty, left_limit, right_limit)
}

async fn merge_above(empty: Item, nearby: &[Item], inventory: &dyn InventoryStore) -> Result<(Item, Vec<ItemUpdate>), Error> {
    let empty_bbox = empty.bounding_box();
    let candidates: Vec<&Item> = nearby
        .iter()
        .filter(|item| {
            item.meta.item_type == ItemType::Empty
                && (item.absolute.position.y - empty_bbox.top_right.y).abs() < ALIGNMENT_MARGIN
                && item.bounding_box().top_right.x > empty_bbox.bottom_left.x
                && item.bounding_box().bottom_left.x < empty_bbox.top_right.x
        })
        .collect();

    let Some(above) = candidates.into_iter().max_by(|a, b| horizontal_overlap(&a.bounding_box(), &empty_bbox).partial_cmp(&horizontal_overlap(&b.bounding_box(), &empty_bbox)).unwrap()) else {
        return Ok((empty, Vec::new()));
    };

    let additional_height = above.bounding_box().top_right.y - empty_bbox.top_right.y;
    let mut grown = empty;
    grown.relative.dimension.y += additional_height;

    let deletion = inventory.delete_item(above.uuid).await?;
    Ok((grown, vec![deletion]))
}
