//! End-to-end scenarios from the testable-properties table: plans a batch
//! against a seeded inventory, then feeds a synthesized robot response back
//! through the response processor, checking the inventory lands where the
//! table says it should.

use ouroboros_core::model::job::{GenericJobType, JobType};
use ouroboros_core::model::messages::JobRequest;
use ouroboros_core::model::{
    Axis, Barcode, BarcodeAbsolute, BarcodeMeta, BarcodeRelative, Header, Item, ItemAbsolute, ItemMeta, ItemRelative, ItemType, Location, Side, Uuid, Vector3,
};
use ouroboros_core::planner::plan_batch;
use ouroboros_core::response::process_job;
use ouroboros_core::store::memory::{InMemoryBatchStore, InMemoryInventoryStore, InMemoryJobTypeCatalog};
use ouroboros_core::store::InventoryStore;

fn box_item(uuid: Uuid, barcode_data: &str, item_type: ItemType, location: Location, available: bool, aisle_index: i64, side: Side, x: f64, y: f64) -> Item {
    let mut item = Item {
        uuid,
        meta: ItemMeta { item_type, location, destination: None, available, aisle_index, scan_id: "scan-1".into(), stack: Vec::new() },
        absolute: ItemAbsolute { position: Vector3::new(x, y, 0.0), dimension: Vector3::new(0.3, 0.3, 0.2), aligned_axis: Axis::X, waypoint: None, depth_index: None, stack_index: None },
        relative: ItemRelative { dimension: Vector3::new(0.3, 0.3, 0.2), side },
        barcodes: Vec::new(),
        primary_barcode: None,
    };
    let barcode = Barcode {
        meta: BarcodeMeta { barcode_type: "GS1-128".into(), data: barcode_data.into(), aisle_index },
        absolute: BarcodeAbsolute { position: Vector3::new(x, y + 0.1, 0.0), dimension: Vector3::new(0.05, 0.05, 0.0), aligned_axis: Axis::X },
        relative: BarcodeRelative { header: Header { frame_id: "parent_item".into() }, position: Vector3::new(0.0, 0.1, 0.0), dimension: Vector3::new(0.05, 0.05, 0.0), side },
        item_uuid: uuid,
    };
    item.barcodes.push(barcode.clone());
    item.primary_barcode = Some(barcode);
    item
}

fn empty_item(uuid: Uuid, aisle_index: i64, side: Side, x: f64, y: f64, w: f64, h: f64) -> Item {
    Item {
        uuid,
        meta: ItemMeta { item_type: ItemType::Empty, location: Location::Inventory, destination: None, available: true, aisle_index, scan_id: "scan-1".into(), stack: Vec::new() },
        absolute: ItemAbsolute { position: Vector3::new(x, y, 0.0), dimension: Vector3::new(w, h, 0.0), aligned_axis: Axis::X, waypoint: None, depth_index: None, stack_index: None },
        relative: ItemRelative { dimension: Vector3::new(w, h, 0.0), side },
        barcodes: Vec::new(),
        primary_barcode: None,
    }
}

/// Scenario 3: a `FETCH_DESIGNATED` job type resolves its item uuid from the
/// job-type row itself, bypassing barcode lookup.
#[tokio::test]
async fn fetch_designated_resolves_item_from_job_type_row() {
    let inventory = InMemoryInventoryStore::new();
    let item_uuid = Uuid::new_v4();
    let conveyor_item = box_item(item_uuid, "conveyor-slot-1", ItemType::Conveyor, Location::Inventory, true, 1, Side::Left, 0.0, 0.0);
    let _ = inventory.create_item(conveyor_item).await;

    let catalog = InMemoryJobTypeCatalog::new(vec![JobType {
        job_type: "INT1".into(),
        generic_type: GenericJobType::FetchDesignated,
        vendor: "NLS".into(),
        predetermined: true,
        item_uuid: Some(item_uuid),
    }]);
    let batch_store = InMemoryBatchStore::new();

    let requests = vec![JobRequest { job_type: "INT1".into(), vendor: "NLS".into(), uid: None, destination_uuid: None }];

    let batch = plan_batch(&requests, &inventory, &catalog, &batch_store).await.unwrap();
    assert_eq!(batch.jobs.len(), 1);
    assert_eq!(batch.jobs[0].job_type, GenericJobType::FetchDesignated);
    assert_eq!(batch.jobs[0].item.uuid, item_uuid);
    assert_eq!(batch.jobs[0].item.meta.item_type, ItemType::Conveyor);
}

/// Scenario 4: a client-supplied `destination_uuid` overrides the planner's
/// own `find_empty_for_store` search.
#[tokio::test]
async fn store_inventory_honors_explicit_destination() {
    let inventory = InMemoryInventoryStore::new();

    let held_uuid = Uuid::new_v4();
    let mut held = box_item(held_uuid, "00100897774116019667", ItemType::Box, Location::Robot, false, 1, Side::Left, 0.0, 0.0);
    held.meta.destination = None;
    let _ = inventory.create_item(held.clone()).await;

    let destination_uuid = Uuid::new_v4();
    let destination = empty_item(destination_uuid, 1, Side::Left, 5.0, 5.0, 0.5, 0.5);
    let _ = inventory.create_item(destination).await;

    let catalog = InMemoryJobTypeCatalog::new(vec![JobType {
        job_type: "STORE_INVENTORY".into(),
        generic_type: GenericJobType::StoreInventory,
        vendor: "RUBIC".into(),
        predetermined: false,
        item_uuid: None,
    }]);
    let batch_store = InMemoryBatchStore::new();

    let requests = vec![JobRequest {
        job_type: "STORE_INVENTORY".into(),
        vendor: "RUBIC".into(),
        uid: Some("00100897774116019667".into()),
        destination_uuid: Some(destination_uuid),
    }];

    let batch = plan_batch(&requests, &inventory, &catalog, &batch_store).await.unwrap();
    assert_eq!(batch.jobs.len(), 1);
    assert_eq!(batch.jobs[0].job_type, GenericJobType::StoreInventory);
    assert_eq!(batch.jobs[0].destination.as_ref().unwrap().uuid, destination_uuid);
    assert_eq!(batch.jobs[0].item.uuid, held_uuid);
}

/// Round-trip idempotence: a `FETCH_INVENTORY` followed by a `STORE_INVENTORY`
/// into the empty the fetch reserved restores `location=inventory,
/// available=true` for the item, with the reserved empty gone.
#[tokio::test]
async fn fetch_then_store_into_reserved_empty_restores_inventory_state() {
    let inventory = InMemoryInventoryStore::new();
    let item_uuid = Uuid::new_v4();
    let item = box_item(item_uuid, "00100897774117552794", ItemType::Box, Location::Inventory, true, 1, Side::Left, 0.0, 0.0);
    let _ = inventory.create_item(item.clone()).await;

    let catalog = InMemoryJobTypeCatalog::new(vec![
        JobType { job_type: "FETCH_INVENTORY".into(), generic_type: GenericJobType::FetchInventory, vendor: "RUBIC".into(), predetermined: false, item_uuid: None },
        JobType { job_type: "STORE_INVENTORY".into(), generic_type: GenericJobType::StoreInventory, vendor: "RUBIC".into(), predetermined: false, item_uuid: None },
    ]);
    let batch_store = InMemoryBatchStore::new();

    let fetch_requests = vec![JobRequest { job_type: "FETCH_INVENTORY".into(), vendor: "RUBIC".into(), uid: Some("00100897774117552794".into()), destination_uuid: None }];
    let fetch_batch = plan_batch(&fetch_requests, &inventory, &catalog, &batch_store).await.unwrap();
    assert_eq!(fetch_batch.jobs.len(), 1);

    let mut fetch_job = fetch_batch.jobs[0].clone();
    fetch_job.success = Some(true);
    let fetch_updates = process_job(&fetch_job, &inventory).await.unwrap();
    assert_eq!(fetch_updates.len(), 2);

    let future_uuid = fetch_job.future_uuid.expect("planner reserves a future_uuid for a simple fetch");
    let reserved_empty = inventory.find_item_by_uuid(future_uuid).await.unwrap();
    assert_eq!(reserved_empty.meta.item_type, ItemType::Empty);

    let moved = inventory.find_item_by_uuid(item_uuid).await.unwrap();
    assert_eq!(moved.meta.location, Location::Robot);
    assert!(!moved.meta.available);

    let store_requests =
        vec![JobRequest { job_type: "STORE_INVENTORY".into(), vendor: "RUBIC".into(), uid: Some("00100897774117552794".into()), destination_uuid: Some(future_uuid) }];
    let store_batch = plan_batch(&store_requests, &inventory, &catalog, &batch_store).await.unwrap();
    assert_eq!(store_batch.jobs.len(), 1);
    assert_eq!(store_batch.jobs[0].destination.as_ref().unwrap().uuid, future_uuid);

    let mut store_job = store_batch.jobs[0].clone();
    store_job.success = Some(true);
    let store_updates = process_job(&store_job, &inventory).await.unwrap();
    assert!(!store_updates.is_empty());

    let restored = inventory.find_item_by_uuid(item_uuid).await.unwrap();
    assert_eq!(restored.meta.location, Location::Inventory);
    assert!(restored.meta.available);
    assert!(inventory.find_item_by_uuid(future_uuid).await.is_err());
}
