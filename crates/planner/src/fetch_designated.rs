//! `FETCH_DESIGNATED` job building: fetches a uuid-predetermined
//! item, e.g. one staged on the conveyor, bypassing barcode lookup entirely.

use model::{job::{GenericJobType, JobType}, messages::JobRequest};
use store::InventoryStore;

use crate::{new_job, Error};

/// Builds the single job for one `FETCH_DESIGNATED` request.
pub async fn build(_request: &JobRequest, job_type: &JobType, inventory: &dyn InventoryStore) -> Result<Vec<model::job::RobotJob>, Error> {
    let pick_up_uuid = job_type.item_uuid.ok_or_else(|| Error::MissingItemUuid { job_type: job_type.job_type.clone() })?;
    let item = inventory.find_item_by_uuid(pick_up_uuid).await?;
    Ok(vec![new_job(GenericJobType::FetchDesignated, item, None, None)])
}
