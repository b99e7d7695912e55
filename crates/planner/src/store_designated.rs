//! `STORE_DESIGNATED` job building: stores a barcode-identified item
//! at a uuid-predetermined destination, e.g. placing it on the conveyor.

use model::{job::{GenericJobType, JobType}, messages::JobRequest};
use store::InventoryStore;

use crate::{new_job, Error};

/// Builds the single job for one `STORE_DESIGNATED` request.
pub async fn build(request: &JobRequest, job_type: &JobType, inventory: &dyn InventoryStore) -> Result<Vec<model::job::RobotJob>, Error> {
    let uid = request.uid.as_deref().ok_or(Error::MissingUid)?;
    let item = inventory.find_item_by_barcode(uid).await?;

    let destination_uuid = job_type.item_uuid.ok_or_else(|| Error::MissingItemUuid { job_type: job_type.job_type.clone() })?;
    let destination = inventory.find_item_by_uuid(destination_uuid).await?;

    Ok(vec![new_job(GenericJobType::StoreDesignated, item, Some(destination), None)])
}
