//! An in-memory `InventoryStore`/`JobTypeCatalog` pair, standing in for the
//! document-store collections described in the external interfaces: all
//! mutation is guarded by a single `tokio::sync::RwLock` per collection,
//! matching the "single shared mutable state, no cross-document
//! transactions" concurrency model.

use std::collections::HashMap;

use async_trait::async_trait;
use geometry::area;
use model::{
    job::{JobType, RobotBatch, RobotJob},
    Item, ItemType, ItemUpdate, Location, Side, Uuid,
};
use tokio::sync::RwLock;

use model::partial::{PartialBarcode, PartialItem};

use crate::{BatchStore, Error, InventoryStore, JobTypeCatalog, PartialItemFilter, PartialStore};

/// An in-memory inventory store. Construct one per process; share it behind
/// an `Arc` across every handler task.
#[derive(Default)]
pub struct InMemoryInventoryStore {
    items: RwLock<HashMap<Uuid, Item>>,
}

impl InMemoryInventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn find_item_by_barcode(&self, data: &str) -> Result<Item, Error> {
        let items = self.items.read().await;
        let mut matches: Vec<&Item> = Vec::new();
        for item in items.values() {
            if item.barcodes.iter().any(|b| b.meta.data == data) {
                matches.push(item);
            }
        }

        match matches.len() {
            0 => Err(Error::MissingEntity {
                what: "barcode".into(),
                key: data.to_string(),
            }),
            1 => {
                let mut item = matches[0].clone();
                item.primary_barcode = item.barcodes.iter().find(|b| b.is_primary()).cloned();
                Ok(item)
            }
            matches => Err(Error::Ambiguous { data: data.to_string(), matches }),
        }
    }

    async fn find_item_by_uuid(&self, uuid: Uuid) -> Result<Item, Error> {
        self.items.read().await.get(&uuid).cloned().ok_or_else(|| Error::MissingEntity {
            what: "item".into(),
            key: uuid.to_string(),
        })
    }

    async fn find_primary_barcode(&self, item_uuid: Uuid) -> Option<model::Barcode> {
        self.items
            .read()
            .await
            .get(&item_uuid)
            .and_then(|item| item.barcodes.iter().find(|b| b.is_primary()).cloned())
    }

    async fn find_nearby(&self, aisle_index: i64, side: Side, cx: f64, cy: f64, dx: f64, dy: f64) -> Vec<Item> {
        self.items
            .read()
            .await
            .values()
            .filter(|item| {
                item.meta.location == Location::Inventory
                    && item.meta.aisle_index == aisle_index
                    && item.relative.side == side
                    && (item.absolute.position.x - cx).abs() < dx
                    && (item.absolute.position.y - cy).abs() < dy
            })
            .cloned()
            .collect()
    }

    async fn find_best_empty(&self, aisle_index: i64, side: Side, min_w: f64, min_h: f64) -> Option<Item> {
        self.items
            .read()
            .await
            .values()
            .filter(|item| {
                item.meta.item_type == ItemType::Empty
                    && item.meta.aisle_index == aisle_index
                    && item.relative.side == side
                    && item.relative.dimension.x > min_w
                    && item.relative.dimension.y > min_h
            })
            .min_by(|a, b| area(&a.bounding_box()).partial_cmp(&area(&b.bounding_box())).unwrap_or(std::cmp::Ordering::Equal))
            .cloned()
    }

    async fn find_items_containing_uuid_in_stack(&self, uuid: Uuid) -> Vec<Item> {
        self.items
            .read()
            .await
            .values()
            .filter(|item| item.meta.stack.contains(&uuid))
            .cloned()
            .collect()
    }

    async fn find_renderable(&self, aisle_index: i64, side: Option<Side>) -> Vec<Item> {
        self.items
            .read()
            .await
            .values()
            .filter(|item| {
                matches!(item.meta.item_type, ItemType::Box | ItemType::Empty)
                    && item.meta.location == Location::Inventory
                    && item.meta.available
                    && item.meta.aisle_index == aisle_index
                    && side.map_or(true, |s| item.relative.side == s)
            })
            .cloned()
            .collect()
    }

    async fn create_item(&self, item: Item) -> ItemUpdate {
        let _ = self.items.write().await.insert(item.uuid, item.clone());
        ItemUpdate::created(item)
    }

    async fn update_item(&self, item: Item) -> ItemUpdate {
        let _ = self.items.write().await.insert(item.uuid, item.clone());
        ItemUpdate::updated(item)
    }

    async fn delete_item(&self, uuid: Uuid) -> Result<ItemUpdate, Error> {
        let removed = self.items.write().await.remove(&uuid).ok_or_else(|| Error::MissingEntity {
            what: "item".into(),
            key: uuid.to_string(),
        })?;
        Ok(ItemUpdate::deleted(removed))
    }

    async fn delete_all_non_conveyor_items(&self) {
        self.items.write().await.retain(|_, item| item.meta.item_type == ItemType::Conveyor);
    }
}

/// An in-memory `(vendor, job_type)` catalog, loaded once at startup from
/// the read-only `FOS_Translate.job_type` collection.
#[derive(Default)]
pub struct InMemoryJobTypeCatalog {
    rows: HashMap<(String, String), JobType>,
}

impl InMemoryJobTypeCatalog {
    /// Builds a catalog from a pre-loaded set of rows.
    pub fn new(rows: Vec<JobType>) -> Self {
        let rows = rows.into_iter().map(|row| ((row.vendor.clone(), row.job_type.clone()), row)).collect();
        Self { rows }
    }
}

#[async_trait]
impl JobTypeCatalog for InMemoryJobTypeCatalog {
    async fn find(&self, vendor: &str, job_type: &str) -> Option<JobType> {
        self.rows.get(&(vendor.to_string(), job_type.to_string())).cloned()
    }
}

/// An in-memory pair of partial collections, standing in for
/// `partial_item_collection`/`partial_barcode_collection`.
#[derive(Default)]
pub struct InMemoryPartialStore {
    items: RwLock<Vec<PartialItem>>,
    barcodes: RwLock<Vec<PartialBarcode>>,
}

impl InMemoryPartialStore {
    /// Creates an empty partial store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PartialStore for InMemoryPartialStore {
    async fn insert_partials(&self, items: Vec<PartialItem>, barcodes: Vec<PartialBarcode>) {
        self.items.write().await.extend(items);
        self.barcodes.write().await.extend(barcodes);
    }

    async fn find_partial_items(&self, filter: &PartialItemFilter) -> Vec<PartialItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|p| {
                p.meta.scan_id == filter.scan_id
                    && p.meta.confidence >= filter.confidence_threshold
                    && filter.aisle_index.map_or(true, |a| p.meta.aisle_index == a)
                    && filter.side.map_or(true, |s| p.relative.side == s)
                    && filter.item_type.map_or(true, |t| p.meta.item_type == t)
            })
            .cloned()
            .collect()
    }

    async fn find_partial_barcodes(&self, scan_id: &str, aisle_index: Option<i64>) -> Vec<PartialBarcode> {
        self.barcodes
            .read()
            .await
            .iter()
            .filter(|p| p.meta.scan_id == scan_id && aisle_index.map_or(true, |a| p.meta.aisle_index == a))
            .cloned()
            .collect()
    }
}

/// An in-memory pair of collections standing in for
/// `robot_batch_collection`/`robot_job_collection`, keyed the way
/// `replace_one`-by-id reconciliation needs: jobs indexed by `job_id`
/// directly, independent of which batch they belong to.
#[derive(Default)]
pub struct InMemoryBatchStore {
    batches: RwLock<HashMap<Uuid, RobotBatch>>,
    jobs: RwLock<HashMap<Uuid, Uuid>>,
}

impl InMemoryBatchStore {
    /// Creates an empty batch store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BatchStore for InMemoryBatchStore {
    async fn insert_batch(&self, batch: RobotBatch) {
        let mut jobs = self.jobs.write().await;
        for job in &batch.jobs {
            let _ = jobs.insert(job.job_id, batch.batch_id);
        }
        drop(jobs);
        let _ = self.batches.write().await.insert(batch.batch_id, batch);
    }

    async fn replace_job(&self, job: RobotJob) -> Result<(), Error> {
        let batch_id = self.jobs.read().await.get(&job.job_id).copied().ok_or_else(|| Error::MissingEntity {
            what: "job".into(),
            key: job.job_id.to_string(),
        })?;

        let mut batches = self.batches.write().await;
        let batch = batches.get_mut(&batch_id).ok_or_else(|| Error::MissingEntity {
            what: "batch".into(),
            key: batch_id.to_string(),
        })?;
        match batch.jobs.iter_mut().find(|j| j.job_id == job.job_id) {
            Some(slot) => {
                *slot = job;
                Ok(())
            }
            None => Err(Error::MissingEntity { what: "job".into(), key: job.job_id.to_string() }),
        }
    }

    async fn find_job(&self, job_id: Uuid) -> Option<RobotJob> {
        let batch_id = *self.jobs.read().await.get(&job_id)?;
        self.batches.read().await.get(&batch_id)?.jobs.iter().find(|j| j.job_id == job_id).cloned()
    }
}
