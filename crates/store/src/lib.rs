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

//! The inventory store: CRUD over items and barcodes plus the domain
//! queries the batch planner and response processor need. `Item` is the
//! unit of storage; barcodes live embedded in their owning item, as in the
//! data model, so no separate barcode-CRUD surface is exposed beyond what's
//! needed to attach/detach them during compilation and fetch-designated.

pub mod memory;

use async_trait::async_trait;
use model::{Item, ItemUpdate, Side, Uuid};

/// All the errors that can occur while querying or mutating the inventory.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A lookup by barcode, uuid, or job-type key found nothing.
    #[error("missing entity (what: {what}, key: {key})")]
    MissingEntity {
        /// What kind of entity was being looked up.
        what: String,
        /// The key it was looked up by.
        key: String,
    },

    /// More than one barcode shares the same `data`.
    #[error("ambiguous barcode data (data: {data}, matches: {matches})")]
    Ambiguous {
        /// The barcode data that matched more than once.
        data: String,
        /// How many barcodes matched.
        matches: usize,
    },

    /// A fetch-designated item's barcode collides with an existing one.
    #[error("duplicate item (barcode data: {data})")]
    DuplicateItem {
        /// The colliding barcode data.
        data: String,
    },
}

/// CRUD and domain queries over the canonical inventory.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Finds the item owning the one barcode with `meta.data == data`, with
    /// `primary_barcode` populated. Fails with [`Error::MissingEntity`] if
    /// no barcode matches and [`Error::Ambiguous`] if more than one does.
    async fn find_item_by_barcode(&self, data: &str) -> Result<Item, Error>;

    /// Finds an item by its uuid.
    async fn find_item_by_uuid(&self, uuid: Uuid) -> Result<Item, Error>;

    /// Finds a barcode of a primary type attached to `item_uuid`.
    async fn find_primary_barcode(&self, item_uuid: Uuid) -> Option<model::Barcode>;

    /// Items at `location=inventory` within `dx`/`dy` of `(cx, cy)` in the
    /// given aisle/side.
    async fn find_nearby(&self, aisle_index: i64, side: Side, cx: f64, cy: f64, dx: f64, dy: f64) -> Vec<Item>;

    /// The smallest-area empty in `(aisle_index, side)` whose relative
    /// width/height strictly exceed `(min_w, min_h)`.
    async fn find_best_empty(&self, aisle_index: i64, side: Side, min_w: f64, min_h: f64) -> Option<Item>;

    /// Every item whose `meta.stack` contains `uuid`.
    async fn find_items_containing_uuid_in_stack(&self, uuid: Uuid) -> Vec<Item>;

    /// `box`/`empty` items at `location=inventory, available=true` in
    /// `aisle_index`, optionally restricted to one shelf side. Used by
    /// `inventory/render` to gather the set a render generator draws.
    async fn find_renderable(&self, aisle_index: i64, side: Option<Side>) -> Vec<Item>;

    /// Inserts a new item. Emits `Change::Created`.
    async fn create_item(&self, item: Item) -> ItemUpdate;

    /// Replaces an existing item by uuid, inserting it if absent. Emits
    /// `Change::Updated`.
    async fn update_item(&self, item: Item) -> ItemUpdate;

    /// Removes an item by uuid. Emits `Change::Deleted` with the item as it
    /// stood immediately before removal. Fails with [`Error::MissingEntity`]
    /// if no such item exists.
    async fn delete_item(&self, uuid: Uuid) -> Result<ItemUpdate, Error>;

    /// Deletes every `box`/`empty` item (keeping `conveyor` items) and every
    /// barcode, used by `CompileScanDataRequest{overwrite: true}`.
    async fn delete_all_non_conveyor_items(&self);
}

/// Read-only lookup of job-type configuration rows, mirroring the
/// `FOS_Translate.job_type` collection: separate storage, `(vendor,
/// job_type)` keyed, small enough to memoize for the life of a process.
#[async_trait]
pub trait JobTypeCatalog: Send + Sync {
    /// Looks up the configuration row for `(vendor, job_type)`.
    async fn find(&self, vendor: &str, job_type: &str) -> Option<model::job::JobType>;
}

/// Filters applied when fetching partials for compilation: a single
/// `(aisle_index, side, item_type)` triple, restricted to one scan.
#[derive(Debug, Clone)]
pub struct PartialItemFilter {
    /// Scan the partials must belong to.
    pub scan_id: String,
    /// Restrict to this aisle, when set.
    pub aisle_index: Option<i64>,
    /// Restrict to this shelf side, when set.
    pub side: Option<Side>,
    /// Restrict to this item type, when set.
    pub item_type: Option<model::ItemType>,
    /// Minimum detector confidence, inclusive.
    pub confidence_threshold: f64,
}

/// The two partial collections ingested from `scan/data`, consumed by the
/// scan compiler and never mutated by anything else.
#[async_trait]
pub trait PartialStore: Send + Sync {
    /// Persists the partial items and barcodes of one scanned image.
    async fn insert_partials(&self, items: Vec<model::partial::PartialItem>, barcodes: Vec<model::partial::PartialBarcode>);

    /// Partial items matching `filter`, in no particular order (the
    /// compiler sorts them itself).
    async fn find_partial_items(&self, filter: &PartialItemFilter) -> Vec<model::partial::PartialItem>;

    /// Partial barcodes belonging to `scan_id`, optionally restricted to one
    /// aisle.
    async fn find_partial_barcodes(&self, scan_id: &str, aisle_index: Option<i64>) -> Vec<model::partial::PartialBarcode>;
}

/// Persistence for `robot_batch_collection`/`robot_job_collection`: the
/// planner inserts a batch and its jobs on emission so
/// the response processor can later replace a job by id as the robot
/// reports outcomes.
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Inserts a newly planned batch and all of its jobs.
    async fn insert_batch(&self, batch: model::job::RobotBatch);

    /// Replaces a previously inserted job by `job_id`, as reported by the
    /// robot in a `RobotBatchResponse`. Fails with [`Error::MissingEntity`]
    /// if no job with that id was ever inserted.
    async fn replace_job(&self, job: model::job::RobotJob) -> Result<(), Error>;

    /// The job previously inserted under `job_id`, if any.
    async fn find_job(&self, job_id: model::Uuid) -> Option<model::job::RobotJob>;
}
