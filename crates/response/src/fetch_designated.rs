//! `FETCH_DESIGNATED` reconciliation: admits a freshly scanned
//! conveyor item into inventory, held by the robot and staged for a
//! subsequent `STORE_INVENTORY`/`STORE_DESIGNATED` job.

use model::{job::RobotJob, Location, Uuid};
use store::{Error as StoreError, InventoryStore};

use crate::Error;

/// Reconciles one successful `FETCH_DESIGNATED` job.
pub async fn reconcile(job: &RobotJob, inventory: &dyn InventoryStore) -> Result<Vec<model::ItemUpdate>, Error> {
    let mut item = job.item.clone();
    if item.uuid.is_nil() {
        item.uuid = Uuid::new_v4();
    }
    item.meta.location = Location::Robot;
    item.meta.destination = None;
    item.meta.available = false;

    for barcode in &item.barcodes {
        match inventory.find_item_by_barcode(&barcode.meta.data).await {
            Ok(_) => return Err(Error::DuplicateItem { data: barcode.meta.data.clone() }),
            Err(StoreError::Ambiguous { data, .. }) => return Err(Error::DuplicateItem { data }),
            Err(StoreError::MissingEntity { .. }) => continue,
            Err(err) => return Err(Error::Store(err)),
        }
    }

    for barcode in &mut item.barcodes {
        barcode.item_uuid = item.uuid;
    }
    item.primary_barcode = item.barcodes.iter().find(|b| b.is_primary()).cloned();

    Ok(vec![inventory.update_item(item).await])
}

#[cfg(test)]
mod test {
    use model::{job::GenericJobType, Axis, Barcode, BarcodeAbsolute, BarcodeMeta, BarcodeRelative, Header, Item, ItemAbsolute, ItemMeta, ItemRelative, ItemType, Side, Vector3};
    use store::memory::InMemoryInventoryStore;

    use super::*;

    fn conveyor_item(uuid: Uuid, data: &str) -> Item {
        let barcode = Barcode {
            meta: BarcodeMeta { barcode_type: "GS1-128".into(), data: data.into(), aisle_index: 0 },
            absolute: BarcodeAbsolute { position: Vector3::new(0.0, 0.1, 0.0), dimension: Vector3::new(0.05, 0.05, 0.0), aligned_axis: Axis::X },
            relative: BarcodeRelative { header: Header { frame_id: "parent_item".into() }, position: Vector3::new(0.0, 0.1, 0.0), dimension: Vector3::new(0.05, 0.05, 0.0), side: Side::Left },
            item_uuid: uuid,
        };
        Item {
            uuid,
            meta: ItemMeta { item_type: ItemType::Conveyor, location: Location::Inventory, destination: None, available: true, aisle_index: 0, scan_id: "scan-1".into(), stack: Vec::new() },
            absolute: ItemAbsolute { position: Vector3::new(0.0, 0.0, 0.0), dimension: Vector3::new(0.3, 0.3, 0.2), aligned_axis: Axis::X, waypoint: None, depth_index: None, stack_index: None },
            relative: ItemRelative { dimension: Vector3::new(0.3, 0.3, 0.2), side: Side::Left },
            barcodes: vec![barcode.clone()],
            primary_barcode: Some(barcode),
        }
    }

    fn job(item: Item) -> RobotJob {
        RobotJob { job_id: Uuid::new_v4(), job_type: GenericJobType::FetchDesignated, item, destination: None, future_uuid: None, success: Some(true), error_code: None, error_message: None }
    }

    #[tokio::test]
    async fn admits_a_fresh_conveyor_item_held_by_the_robot() {
        let inventory = InMemoryInventoryStore::new();
        let item = conveyor_item(Uuid::new_v4(), "new-item-barcode");

        let updates = reconcile(&job(item.clone()), &inventory).await.unwrap();
        assert_eq!(updates.len(), 1);

        let stored = inventory.find_item_by_uuid(item.uuid).await.unwrap();
        assert_eq!(stored.meta.location, Location::Robot);
        assert!(!stored.meta.available);
    }

    #[tokio::test]
    async fn colliding_barcode_data_is_rejected() {
        let inventory = InMemoryInventoryStore::new();
        let existing = conveyor_item(Uuid::new_v4(), "dup-barcode");
        let _ = inventory.create_item(existing).await;

        let incoming = conveyor_item(Uuid::new_v4(), "dup-barcode");
        let err = reconcile(&job(incoming), &inventory).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateItem { .. }));
    }

    #[tokio::test]
    async fn nil_uuid_is_assigned_a_fresh_one() {
        let inventory = InMemoryInventoryStore::new();
        let mut item = conveyor_item(Uuid::nil(), "another-barcode");
        item.uuid = Uuid::nil();

        let updates = reconcile(&job(item), &inventory).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert!(!updates[0].item.uuid.is_nil());
    }
}
