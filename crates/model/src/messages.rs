//! Wire bodies for the queues listed in the external interface table: a
//! client-facing request/response shape per queue, all JSON, all with
//! unknown fields ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::{
    partial::{PartialBarcode, PartialItem},
    ItemType, RobotJob, Side, Uuid,
};

/// One entry of a `batch/request` body: a high-level instruction the
/// planner resolves into one or more `RobotJob`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobRequest {
    /// The job-type key to resolve against `(vendor, job_type)`.
    pub job_type: String,
    /// The robot vendor this request targets.
    pub vendor: String,
    /// Primary barcode data identifying the item, for inventory job kinds.
    pub uid: Option<String>,
    /// Client-chosen destination, when the client wants to override the
    /// planner's own destination selection.
    pub destination_uuid: Option<Uuid>,
}

/// Body of the `batch/request` queue: a client's ordered wishlist of jobs.
pub type BatchRequest = Vec<JobRequest>;

/// Body of the `robot/batch_request` queue: the planner's resolved, ordered
/// instruction sequence for the robot to execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RobotBatchRequest {
    /// Identity of the batch.
    pub batch_id: Uuid,
    /// Jobs in execution order.
    pub jobs: Vec<RobotJob>,
}

/// Body of the `batch/response` queue: the robot's outcome for each job of
/// a batch, in the same order it was dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RobotBatchResponse {
    /// Identity of the batch this response belongs to.
    pub batch_id: Uuid,
    /// Jobs with `success`/`error_code`/`error_message` filled in by the robot.
    pub jobs: Vec<RobotJob>,
}

/// Body of the `scan/compile` queue: asks the compiler to cluster the
/// partials collected for one scan into canonical items and barcodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompileScanDataRequest {
    /// Scan whose partials should be compiled.
    pub scan_id: String,
    /// Minimum detector confidence for a partial item to be considered.
    pub confidence_threshold: f64,
    /// Restrict compilation to one item type, when set.
    pub item_type: Option<ItemType>,
    /// Restrict compilation to one shelf side, when set.
    pub side: Option<Side>,
    /// Restrict compilation to one aisle, when set.
    pub aisle_index: Option<i64>,
    /// When true, delete all existing non-conveyor items and barcodes
    /// before inserting the newly compiled ones.
    pub overwrite: bool,
}

/// Body of the `scan/request` queue: a client asking for a fresh scan of an
/// aisle. Relayed as-is to `robot/scan_request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScanRequest {
    /// Scan being requested.
    pub scan_id: String,
    /// Aisle to scan.
    pub aisle_index: i64,
    /// Shelf side to scan, when restricted to one.
    pub side: Option<Side>,
}

/// Body of the `robot/scan_request` queue: the relayed form of a `ScanRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RobotScanRequest {
    /// Scan being requested.
    pub scan_id: String,
    /// Aisle to scan.
    pub aisle_index: i64,
    /// Shelf side to scan, when restricted to one.
    pub side: Option<Side>,
}

/// Body of the `scan/response` queue: the robot's acknowledgement that a
/// scan request has started or finished sending `scan/data` messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RobotScanResponse {
    /// Scan this acknowledgement belongs to.
    pub scan_id: String,
    /// Whether the robot accepted the scan request.
    pub success: bool,
    /// Failure detail, when `success` is false.
    pub error_message: Option<String>,
}

/// Body of the `scan/data` queue: one image's worth of raw detections plus
/// the raw image payload for blob storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScanData {
    /// Scan this image belongs to.
    pub scan_id: String,
    /// Identity of the source image.
    pub image_id: String,
    /// Aisle the image was taken in.
    pub aisle_index: i64,
    /// Shelf side the image was taken from.
    pub side: Side,
    /// Partial items detected in this image.
    pub partial_items: Vec<PartialItem>,
    /// Partial barcodes detected in this image.
    pub partial_barcodes: Vec<PartialBarcode>,
    /// Base64-encoded raw image payload, handed off to blob storage.
    pub image: String,
}

/// Body of the `inventory/render` queue: a request to rasterize the current
/// inventory state of an aisle. The rasterization itself is performed by an
/// external render generator; the core only gathers the matching items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RenderScanRequest {
    /// Scan whose compiled state should be rendered.
    pub scan_id: String,
    /// Aisle to render.
    pub aisle_index: i64,
    /// Shelf side to render, when restricted to one.
    pub side: Option<Side>,
}
