//! Stack computation: for every unordered pair of canonical items sharing an
//! `(aisle_index, side)`, record which item rests on which.
//!
//! `stack` lists the uuids of items whose bottom edge rests on *this* item's
//! top edge, i.e. an item's `stack` names what's sitting on top of it and
//! therefore has to be cleared before it can be fetched.

use geometry::is_stacked_on;
use model::Item;

/// Mutates `items` in place, appending stack membership. Items are ordered
/// by `(bbox.bottom_left.x, bbox.bottom_left.y)` before the pairwise test so
/// the resulting `stack` lists are in a deterministic order.
pub fn compute_stacks(items: &mut [Item]) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        let ba = items[a].bounding_box();
        let bb = items[b].bounding_box();
        (ba.bottom_left.x, ba.bottom_left.y)
            .partial_cmp(&(bb.bottom_left.x, bb.bottom_left.y))
            .unwrap()
    });

    let bboxes: Vec<_> = order.iter().map(|&i| items[i].bounding_box()).collect();

    for (oi, &i) in order.iter().enumerate() {
        for (oj, &j) in order.iter().enumerate() {
            if oi == oj {
                continue;
            }
            if is_stacked_on(&bboxes[oi], &bboxes[oj]) {
                // i rests on j: j is the bottom item, so j's stack records i.
                let top_uuid = items[i].uuid;
                if !items[j].meta.stack.contains(&top_uuid) {
                    items[j].meta.stack.push(top_uuid);
                }
            }
        }
    }
}
