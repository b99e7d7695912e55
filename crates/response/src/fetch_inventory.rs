//! `FETCH_INVENTORY` reconciliation: moves the fetched item to the
//! robot and leaves a known-unoccupied empty in its place, growing that
//! empty to absorb its neighbors when the planner reserved no destination
//! for it.

use model::{job::RobotJob, synthetic_empty, ItemUpdate, Location, Uuid};
use store::InventoryStore;

use crate::{empty_merge, Error};

/// Reconciles one successful `FETCH_INVENTORY` job.
pub async fn reconcile(job: &RobotJob, inventory: &dyn InventoryStore) -> Result<Vec<ItemUpdate>, Error> {
    let mut updates = Vec::new();

    let mut item = inventory.find_item_by_uuid(job.item.uuid).await.map_err(|_| Error::NotInInventory { uuid: job.item.uuid })?;
    if item.meta.location != Location::Inventory {
        return Err(Error::NotInInventory { uuid: job.item.uuid });
    }

    item.meta.available = false;
    item.meta.location = Location::Robot;
    updates.push(inventory.update_item(item.clone()).await);

    let candidate = match job.future_uuid {
        Some(future_uuid) => synthetic_empty(future_uuid, &item),
        None => synthetic_empty(Uuid::new_v4(), &item),
    };

    let empty = if job.future_uuid.is_some() {
        candidate
    } else {
        let (grown, merge_updates) = empty_merge::merge_empty(candidate, inventory).await?;
        updates.extend(merge_updates);
        grown
    };
    updates.push(inventory.create_item(empty).await);

    for mut affected in inventory.find_items_containing_uuid_in_stack(item.uuid).await {
        affected.meta.stack.retain(|uuid| *uuid != item.uuid);
        updates.push(inventory.update_item(affected).await);
    }

    Ok(updates)
}

#[cfg(test)]
mod test {
    use model::{job::GenericJobType, Axis, ItemAbsolute, ItemMeta, ItemRelative, ItemType, Side, Uuid, Vector3};
    use store::memory::InMemoryInventoryStore;

    use super::*;

    fn box_item(uuid: Uuid) -> model::Item {
        model::Item {
            uuid,
            meta: ItemMeta { item_type: ItemType::Box, location: Location::Inventory, destination: None, available: true, aisle_index: 1, scan_id: "scan-1".into(), stack: Vec::new() },
            absolute: ItemAbsolute { position: Vector3::new(0.0, 0.0, 0.0), dimension: Vector3::new(0.3, 0.3, 0.2), aligned_axis: Axis::X, waypoint: None, depth_index: None, stack_index: None },
            relative: ItemRelative { dimension: Vector3::new(0.3, 0.3, 0.2), side: Side::Left },
            barcodes: Vec::new(),
            primary_barcode: None,
        }
    }

    fn job(item: model::Item, future_uuid: Option<Uuid>) -> RobotJob {
        RobotJob { job_id: Uuid::new_v4(), job_type: GenericJobType::FetchInventory, item, destination: None, future_uuid, success: Some(true), error_code: None, error_message: None }
    }

    #[tokio::test]
    async fn reserved_future_uuid_becomes_the_new_empty() {
        let inventory = InMemoryInventoryStore::new();
        let uuid = Uuid::new_v4();
        let _ = inventory.create_item(box_item(uuid)).await;

        let future_uuid = Uuid::new_v4();
        let job = job(box_item(uuid), Some(future_uuid));

        let updates = reconcile(&job, &inventory).await.unwrap();
        assert_eq!(updates.len(), 2);

        let empty = inventory.find_item_by_uuid(future_uuid).await.unwrap();
        assert_eq!(empty.meta.item_type, ItemType::Empty);
    }

    #[tokio::test]
    async fn missing_inventory_item_is_an_error() {
        let inventory = InMemoryInventoryStore::new();
        let uuid = Uuid::new_v4();
        let job = job(box_item(uuid), None);

        let err = reconcile(&job, &inventory).await.unwrap_err();
        assert!(matches!(err, Error::NotInInventory { .. }));
    }
}
