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

//! Reconciles robot-reported job outcomes back into the inventory: per-job
//! handlers for the four job kinds, dispatched as a closed tagged-variant
//! match rather than a plugin registry.

mod empty_merge;
mod fetch_designated;
mod fetch_inventory;
mod store_designated;
mod store_inventory;

use model::{
    job::{GenericJobType, RobotJob},
    messages::RobotBatchResponse,
    ItemUpdate, Uuid,
};
use store::{BatchStore, InventoryStore};

/// All the errors that can occur while reconciling one job's outcome.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An inventory store lookup or mutation failed.
    #[error("inventory lookup failed: {0}")]
    Store(#[from] store::Error),

    /// A job's item carries no primary barcode; every handler requires one
    /// before it will process a job.
    #[error("job for item {uuid} has no primary barcode")]
    MissingPrimaryBarcode {
        /// The item missing a primary barcode.
        uuid: Uuid,
    },

    /// A `FETCH_INVENTORY` reconciliation found no matching item at
    /// `location=inventory`.
    #[error("no item with uuid {uuid} and location=inventory found")]
    NotInInventory {
        /// The item uuid that was expected to still be in inventory.
        uuid: Uuid,
    },

    /// A `STORE_INVENTORY` job arrived with no destination set.
    #[error("store inventory job {job_id} has no destination")]
    MissingDestination {
        /// The job missing a destination.
        job_id: Uuid,
    },

    /// A `FETCH_DESIGNATED` item's barcode collides with one already in
    /// inventory.
    #[error("duplicate item (barcode data: {data})")]
    DuplicateItem {
        /// The colliding barcode data.
        data: String,
    },
}

/// Reconciles every job in `response`, persisting the robot's reported
/// outcome for each job and returning the aggregate change log across all
/// jobs that succeeded. A failing job is logged and excluded from the
/// aggregate; it does not stop reconciliation of the rest of the batch
///.
pub async fn process_batch_response(response: &RobotBatchResponse, inventory: &dyn InventoryStore, batch_store: &dyn BatchStore) -> Vec<ItemUpdate> {
    let mut updates = Vec::new();

    for job in &response.jobs {
        if let Err(err) = batch_store.replace_job(job.clone()).await {
            tracing::error!(job_id = %job.job_id, error = %err, "failed to persist reported job outcome");
        }

        match process_job(job, inventory).await {
            Ok(mut job_updates) => updates.append(&mut job_updates),
            Err(err) => tracing::error!(job_id = %job.job_id, job_type = ?job.job_type, error = %err, "job reconciliation failed"),
        }
    }

    updates
}

/// Reconciles a single job. Fails with [`Error::MissingPrimaryBarcode`]
/// before dispatch regardless of the job's outcome; on a reported failure
/// (`job.success=false`), logs and returns no updates; on success, invokes
/// the handler for `job.job_type`.
pub async fn process_job(job: &RobotJob, inventory: &dyn InventoryStore) -> Result<Vec<ItemUpdate>, Error> {
    if job.item.primary_barcode.is_none() {
        return Err(Error::MissingPrimaryBarcode { uuid: job.item.uuid });
    }

    if !job.succeeded() {
        tracing::warn!(job_id = %job.job_id, error_code = ?job.error_code, error_message = ?job.error_message, "robot reported job failure, skipping reconciliation");
        return Ok(Vec::new());
    }

    match job.job_type {
        GenericJobType::FetchInventory => fetch_inventory::reconcile(job, inventory).await,
        GenericJobType::StoreInventory => store_inventory::reconcile(job, inventory).await,
        GenericJobType::FetchDesignated => fetch_designated::reconcile(job, inventory).await,
        GenericJobType::StoreDesignated => store_designated::reconcile(job, inventory).await,
    }
}
