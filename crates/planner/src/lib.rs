#![deny(
    trivial_numeric_casts,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    unused_results
)]
#![warn(rust_2021_compatibility, unreachable_pub)]

//! Translates a client `BatchRequest` into an ordered `RobotBatch`: one of
//! four builders per `JobRequest`, sharing a `fetched_items` map across the
//! whole batch so a store can target a slot a fetch earlier in the same
//! batch is about to empty.

mod fetch_designated;
mod fetch_inventory;
mod find_empty;
mod store_designated;
mod store_inventory;

use std::collections::HashMap;

use model::{
    job::{GenericJobType, RobotBatch, RobotJob},
    messages::JobRequest,
    Uuid,
};
use store::{BatchStore, InventoryStore, JobTypeCatalog};

/// All the errors that can occur while planning a batch. A single failure
/// aborts the whole batch.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A lookup against the inventory store failed.
    #[error("inventory lookup failed: {0}")]
    Store(#[from] store::Error),

    /// `(vendor, job_type)` resolved to nothing in the job-type catalog.
    #[error("job type not found (vendor: {vendor}, job_type: {job_type})")]
    JobTypeNotFound {
        /// Requested vendor.
        vendor: String,
        /// Requested job-type key.
        job_type: String,
    },

    /// A `FETCH_INVENTORY` target has more than one item directly stacked
    /// on it.
    #[error("multiple items stacked on item with uuid {uuid}")]
    MultipleStacked {
        /// The offending target item.
        uuid: Uuid,
    },

    /// An item above a `FETCH_INVENTORY` target itself has a non-empty
    /// stack.
    #[error("double stacked item with uuid {uuid}")]
    DoubleStacked {
        /// The offending stacked item.
        uuid: Uuid,
    },

    /// A stacked item above a fetch target was already fetched earlier in
    /// this batch and still carries a stack of its own.
    #[error("item with uuid {uuid} was already fetched in this batch but still has a stack")]
    AlreadyFetchedWithStack {
        /// The offending item.
        uuid: Uuid,
    },

    /// A `JobRequest` requires a `uid` (barcode data) that was not supplied.
    #[error("job request is missing a required uid")]
    MissingUid,

    /// A `FETCH_DESIGNATED`/`STORE_DESIGNATED` job type has no configured
    /// `item_uuid`.
    #[error("job type {job_type} has no configured item_uuid")]
    MissingItemUuid {
        /// The job-type key missing its predetermined item.
        job_type: String,
    },

    /// A resolved destination item fails the store-target validity check.
    #[error("destination item with uuid {uuid} is not available, not in inventory, or not empty")]
    InvalidDestination {
        /// The offending destination item.
        uuid: Uuid,
    },

    /// A `STORE_INVENTORY` target item is neither held by the robot nor one
    /// of this batch's already-fetched items.
    #[error("item with uid {uid} is not available or not held by the robot")]
    InvalidStoreTarget {
        /// The barcode data that resolved to the invalid target.
        uid: String,
    },

    /// No empty large enough for a store was found (`find_empty_for_store`).
    #[error("no empty large enough to store item with uuid {uuid}")]
    NoEmptyAvailable {
        /// The item that needed a destination.
        uuid: Uuid,
    },
}

/// Barcode data of an item fetched earlier in this batch, mapped to the
/// future uuid reserved for the empty slot it will leave behind. Threaded
/// through every builder invocation for one `BatchRequest`; never shared
/// across batches.
pub type FetchedItems = HashMap<String, Uuid>;

/// Plans `requests` into an ordered `RobotBatch`, persisting the batch and
/// its jobs via `batch_store` before returning it.
/// Fails the whole batch on the first builder error.
pub async fn plan_batch(
    requests: &[JobRequest],
    inventory: &dyn InventoryStore,
    catalog: &dyn JobTypeCatalog,
    batch_store: &dyn BatchStore,
) -> Result<RobotBatch, Error> {
    let mut fetched_items = FetchedItems::new();
    let mut jobs = Vec::new();

    for request in requests {
        let job_type = catalog
            .find(&request.vendor, &request.job_type)
            .await
            .ok_or_else(|| Error::JobTypeNotFound { vendor: request.vendor.clone(), job_type: request.job_type.clone() })?;

        let mut built = match job_type.generic_type {
            GenericJobType::FetchInventory => fetch_inventory::build(request, inventory, &mut fetched_items).await?,
            GenericJobType::StoreInventory => store_inventory::build(request, inventory, &fetched_items).await?,
            GenericJobType::FetchDesignated => fetch_designated::build(request, &job_type, inventory).await?,
            GenericJobType::StoreDesignated => store_designated::build(request, &job_type, inventory).await?,
        };

        jobs.append(&mut built);
    }

    for job in &mut jobs {
        job.job_id = Uuid::new_v4();
    }

    let batch = RobotBatch { batch_id: Uuid::new_v4(), jobs };
    batch_store.insert_batch(batch.clone()).await;

    Ok(batch)
}

fn new_job(job_type: GenericJobType, item: model::Item, destination: Option<model::Item>, future_uuid: Option<Uuid>) -> RobotJob {
    RobotJob {
        job_id: Uuid::nil(),
        job_type,
        item,
        destination,
        future_uuid,
        success: None,
        error_code: None,
        error_message: None,
    }
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;
    use model::{job::JobType, Item, ItemType, Location, Side};
    use store::{memory::InMemoryBatchStore, memory::InMemoryInventoryStore, InventoryStore};

    use super::*;

    struct FixedCatalog(Vec<JobType>);

    #[async_trait]
    impl JobTypeCatalog for FixedCatalog {
        async fn find(&self, vendor: &str, job_type: &str) -> Option<JobType> {
            self.0.iter().find(|r| r.vendor == vendor && r.job_type == job_type).cloned()
        }
    }

    fn box_item(uuid: Uuid, barcode_data: &str, aisle_index: i64, side: Side, x: f64, y: f64) -> Item {
        let mut item = Item {
            uuid,
            meta: model::ItemMeta {
                item_type: ItemType::Box,
                location: Location::Inventory,
                destination: None,
                available: true,
                aisle_index,
                scan_id: "scan-1".into(),
                stack: Vec::new(),
            },
            absolute: model::ItemAbsolute {
                position: model::Vector3::new(x, y, 0.0),
                dimension: model::Vector3::new(0.3, 0.3, 0.2),
                aligned_axis: model::Axis::X,
                waypoint: None,
                depth_index: None,
                stack_index: None,
            },
            relative: model::ItemRelative { dimension: model::Vector3::new(0.3, 0.3, 0.2), side },
            barcodes: Vec::new(),
            primary_barcode: None,
        };
        let barcode = model::Barcode {
            meta: model::BarcodeMeta { barcode_type: "GS1-128".into(), data: barcode_data.into(), aisle_index },
            absolute: model::BarcodeAbsolute { position: model::Vector3::new(x, y + 0.1, 0.0), dimension: model::Vector3::new(0.05, 0.05, 0.0), aligned_axis: model::Axis::X },
            relative: model::BarcodeRelative {
                header: model::Header { frame_id: "parent_item".into() },
                position: model::Vector3::new(0.0, 0.1, 0.0),
                dimension: model::Vector3::new(0.05, 0.05, 0.0),
                side,
            },
            item_uuid: uuid,
        };
        item.barcodes.push(barcode.clone());
        item.primary_barcode = Some(barcode);
        item
    }

    #[tokio::test]
    async fn simple_fetch_emits_one_job() {
        let inventory = InMemoryInventoryStore::new();
        let uuid = Uuid::new_v4();
        let item = box_item(uuid, "00100897774117552794", 1, Side::Left, 0.0, 0.0);
        let _ = inventory.create_item(item).await;

        let catalog = FixedCatalog(vec![JobType {
            job_type: "FETCH_INVENTORY".into(),
            generic_type: GenericJobType::FetchInventory,
            vendor: "RUBIC".into(),
            predetermined: false,
            item_uuid: None,
        }]);
        let batch_store = InMemoryBatchStore::new();

        let requests = vec![JobRequest {
            job_type: "FETCH_INVENTORY".into(),
            vendor: "RUBIC".into(),
            uid: Some("00100897774117552794".into()),
            destination_uuid: None,
        }];

        let batch = plan_batch(&requests, &inventory, &catalog, &batch_store).await.unwrap();
        assert_eq!(batch.jobs.len(), 1);
        assert_eq!(batch.jobs[0].job_type, GenericJobType::FetchInventory);
        assert_eq!(batch.jobs[0].item.uuid, uuid);
    }

    #[tokio::test]
    async fn stacked_fetch_emits_three_jobs_in_order() {
        let inventory = InMemoryInventoryStore::new();
        let bottom_uuid = Uuid::new_v4();
        let top_uuid = Uuid::new_v4();
        let mut bottom = box_item(bottom_uuid, "00100897774116019311", 1, Side::Left, 0.0, 0.0);
        bottom.meta.stack = vec![top_uuid];
        let top = box_item(top_uuid, "00100897774116019312", 1, Side::Left, 0.0, 0.0);
        let _ = inventory.create_item(bottom).await;
        let _ = inventory.create_item(top).await;

        let catalog = FixedCatalog(vec![JobType {
            job_type: "FETCH_INVENTORY".into(),
            generic_type: GenericJobType::FetchInventory,
            vendor: "RUBIC".into(),
            predetermined: false,
            item_uuid: None,
        }]);
        let batch_store = InMemoryBatchStore::new();

        let requests = vec![JobRequest {
            job_type: "FETCH_INVENTORY".into(),
            vendor: "RUBIC".into(),
            uid: Some("00100897774116019311".into()),
            destination_uuid: None,
        }];

        let batch = plan_batch(&requests, &inventory, &catalog, &batch_store).await.unwrap();
        assert_eq!(batch.jobs.len(), 3);
        assert_eq!(batch.jobs[0].item.uuid, top_uuid);
        assert_eq!(batch.jobs[1].item.uuid, bottom_uuid);
        assert!(batch.jobs[1].future_uuid.is_some());
        assert_eq!(batch.jobs[2].item.uuid, top_uuid);
        assert_eq!(batch.jobs[2].destination.as_ref().unwrap().uuid, batch.jobs[1].future_uuid.unwrap());
    }
}
