//! Robot job scheduling types: the four job kinds the batch planner can
//! emit, the configuration row each is resolved from, and the batch
//! envelope that carries them to and from the robot.

use serde::{Deserialize, Serialize};

use crate::{Item, Uuid};

/// The four low-level robot operations the planner can emit. This is a
/// closed set: no plugin registration is required to add a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenericJobType {
    /// Pick an item from a shelf slot identified by its primary barcode.
    FetchInventory,
    /// Place a held item into a shelf slot.
    StoreInventory,
    /// Pick an item identified directly by uuid (e.g. off the conveyor).
    FetchDesignated,
    /// Place a held item at a uuid-identified destination (e.g. the conveyor).
    StoreDesignated,
}

/// A read-only configuration row resolved by `(vendor, job_type)`,
/// determining which builder/handler a `JobRequest` is dispatched to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JobType {
    /// The job-type key as referenced by a `JobRequest`.
    pub job_type: String,
    /// Which of the four closed-set operations this row resolves to.
    pub generic_type: GenericJobType,
    /// The robot vendor this configuration applies to.
    pub vendor: String,
    /// Whether the destination/item for this job type is fixed ahead of time.
    pub predetermined: bool,
    /// The fixed item uuid for `FetchDesignated`/`StoreDesignated` job types.
    pub item_uuid: Option<Uuid>,
}

/// One low-level instruction for the robot, as emitted by the planner and
/// updated in place by the response processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RobotJob {
    /// Identity of this job, stable across the request/response round-trip.
    pub job_id: Uuid,
    /// Which of the four operations this job performs.
    pub job_type: GenericJobType,
    /// The item to fetch or store.
    pub item: Item,
    /// The destination item, for store operations.
    pub destination: Option<Item>,
    /// Uuid reserved for the empty slot a fetch will leave behind.
    pub future_uuid: Option<Uuid>,
    /// Set by the robot once the job completes.
    pub success: Option<bool>,
    /// Set by the robot on failure.
    pub error_code: Option<String>,
    /// Set by the robot on failure.
    pub error_message: Option<String>,
}

impl RobotJob {
    /// Whether the robot reported success for this job. A job the robot has
    /// not yet responded to is treated as not successful.
    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(false)
    }
}

/// An ordered sequence of robot jobs emitted for one client batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RobotBatch {
    /// Identity of this batch.
    pub batch_id: Uuid,
    /// Jobs in the order they must be executed by the robot.
    pub jobs: Vec<RobotJob>,
}
