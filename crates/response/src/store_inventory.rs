//! `STORE_INVENTORY` reconciliation: places the held item into its
//! destination slot, slices the destination's leftover footprint into fresh
//! empties, and folds the newly placed box into any stack relationship with
//! the boxes around it.

use geometry::{slice_rectangle, Axis, Rectangle};
use model::{job::RobotJob, Item, ItemAbsolute, ItemMeta, ItemRelative, ItemType, ItemUpdate, Location, Uuid, Vector3};
use store::InventoryStore;

use crate::Error;

const NEARBY_DX: f64 = 2.0;
const NEARBY_DY: f64 = 1.0;

/// Reconciles one successful `STORE_INVENTORY` job.
pub async fn reconcile(job: &RobotJob, inventory: &dyn InventoryStore) -> Result<Vec<ItemUpdate>, Error> {
    let requested_destination = job.destination.as_ref().ok_or(Error::MissingDestination { job_id: job.job_id })?;
    let destination = inventory.find_item_by_uuid(requested_destination.uuid).await?;

    let mut updates = Vec::new();

    // The item takes on the destination's placement and aisle (it now
    // physically sits there) but keeps its own size, barcodes, and identity.
    let mut stored = job.item.clone();
    stored.meta.item_type = ItemType::Box;
    stored.meta.location = Location::Inventory;
    stored.meta.destination = None;
    stored.meta.available = true;
    stored.meta.aisle_index = destination.meta.aisle_index;
    stored.absolute.position = destination.absolute.position;
    stored.absolute.aligned_axis = destination.absolute.aligned_axis;
    stored.absolute.waypoint = destination.absolute.waypoint;
    stored.absolute.depth_index = destination.absolute.depth_index;
    stored.absolute.stack_index = destination.absolute.stack_index;
    stored.relative.side = destination.relative.side;
    for barcode in &mut stored.barcodes {
        barcode.meta.aisle_index = stored.meta.aisle_index;
    }
    stored.primary_barcode = stored.barcodes.iter().find(|b| b.is_primary()).cloned();

    updates.push(inventory.update_item(stored.clone()).await);

    let destination_bbox = destination.bounding_box();
    let stored_bbox = stored.bounding_box();

    if let Ok(strips) = slice_rectangle(&destination_bbox, &stored_bbox) {
        for strip in strips {
            updates.push(inventory.create_item(strip_empty(&destination, strip)).await);
        }
    }

    updates.push(inventory.delete_item(destination.uuid).await?);

    let nearby = inventory
        .find_nearby(stored.meta.aisle_index, stored.relative.side, stored.absolute.position.x, stored.absolute.position.y, NEARBY_DX, NEARBY_DY)
        .await;

    for mut candidate in nearby {
        if candidate.uuid == stored.uuid || candidate.meta.item_type != ItemType::Box || !candidate.meta.available {
            continue;
        }
        if geometry::is_stacked_on(&stored_bbox, &candidate.bounding_box()) && !candidate.meta.stack.contains(&stored.uuid) {
            candidate.meta.stack.push(stored.uuid);
            updates.push(inventory.update_item(candidate).await);
        }
    }

    Ok(updates)
}

/// Builds one of the leftover empties the destination's footprint is sliced
/// into, inheriting everything about the destination except its area.
fn strip_empty(destination: &Item, strip: Rectangle) -> Item {
    let bottom_center = geometry::bottom_center(&strip);
    let width = strip.width();
    let height = strip.height();

    let position = match destination.absolute.aligned_axis {
        Axis::Z => Vector3::new(destination.absolute.position.x, bottom_center.y, bottom_center.x),
        Axis::X | Axis::Y => Vector3::new(bottom_center.x, bottom_center.y, destination.absolute.position.z),
    };

    Item {
        uuid: Uuid::new_v4(),
        meta: ItemMeta {
            item_type: ItemType::Empty,
            location: Location::Inventory,
            destination: None,
            available: true,
            aisle_index: destination.meta.aisle_index,
            scan_id: destination.meta.scan_id.clone(),
            stack: Vec::new(),
        },
        absolute: ItemAbsolute {
            position,
            dimension: Vector3::new(width, height, 0.0),
            aligned_axis: destination.absolute.aligned_axis,
            waypoint: destination.absolute.waypoint,
            depth_index: destination.absolute.depth_index,
            stack_index: destination.absolute.stack_index,
        },
        relative: ItemRelative { dimension: Vector3::new(width, height, 0.0), side: destination.relative.side },
        barcodes: Vec::new(),
        primary_barcode: None,
    }
}
