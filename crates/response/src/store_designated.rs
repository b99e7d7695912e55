//! `STORE_DESIGNATED` reconciliation: removes an item placed onto the
//! conveyor. Barcodes live embedded in the item, so deleting it removes
//! them too.

use model::{job::RobotJob, ItemUpdate};
use store::InventoryStore;

use crate::Error;

/// Reconciles one successful `STORE_DESIGNATED` job.
pub async fn reconcile(job: &RobotJob, inventory: &dyn InventoryStore) -> Result<Vec<ItemUpdate>, Error> {
    Ok(vec![inventory.delete_item(job.item.uuid).await?])
}

#[cfg(test)]
mod test {
    use model::{job::GenericJobType, Axis, Item, ItemAbsolute, ItemMeta, ItemRelative, ItemType, Location, Side, Uuid, Vector3};
    use store::memory::InMemoryInventoryStore;

    use super::*;

    fn conveyor_item(uuid: Uuid) -> Item {
        Item {
            uuid,
            meta: ItemMeta { item_type: ItemType::Conveyor, location: Location::Robot, destination: None, available: false, aisle_index: 0, scan_id: "scan-1".into(), stack: Vec::new() },
            absolute: ItemAbsolute { position: Vector3::new(0.0, 0.0, 0.0), dimension: Vector3::new(0.3, 0.3, 0.2), aligned_axis: Axis::X, waypoint: None, depth_index: None, stack_index: None },
            relative: ItemRelative { dimension: Vector3::new(0.3, 0.3, 0.2), side: Side::Left },
            barcodes: Vec::new(),
            primary_barcode: None,
        }
    }

    fn job(item: Item) -> RobotJob {
        RobotJob { job_id: Uuid::new_v4(), job_type: GenericJobType::StoreDesignated, item, destination: None, future_uuid: None, success: Some(true), error_code: None, error_message: None }
    }

    #[tokio::test]
    async fn deletes_the_item() {
        let inventory = InMemoryInventoryStore::new();
        let uuid = Uuid::new_v4();
        let _ = inventory.create_item(conveyor_item(uuid)).await;

        let updates = reconcile(&job(conveyor_item(uuid)), &inventory).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert!(inventory.find_item_by_uuid(uuid).await.is_err());
    }

    #[tokio::test]
    async fn missing_item_is_an_error() {
        let inventory = InMemoryInventoryStore::new();
        let err = reconcile(&job(conveyor_item(Uuid::new_v4())), &inventory).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}
