//! `batch/request`/`batch/response` dispatch: thin pass-throughs to the
//! batch planner and response processor, reshaping between the queue bodies
//! and the domain types those crates operate on.

use model::{
    job::RobotBatch,
    messages::{BatchRequest, RobotBatchRequest, RobotBatchResponse},
    ItemUpdate,
};
use store::{BatchStore, InventoryStore, JobTypeCatalog};

/// Plans `requests` into an ordered `RobotBatchRequest`, ready to publish to
/// `robot/batch_request`.
pub async fn handle_batch_request(
    requests: &BatchRequest,
    inventory: &dyn InventoryStore,
    catalog: &dyn JobTypeCatalog,
    batch_store: &dyn BatchStore,
) -> Result<RobotBatchRequest, planner::Error> {
    let RobotBatch { batch_id, jobs } = planner::plan_batch(requests, inventory, catalog, batch_store).await?;
    Ok(RobotBatchRequest { batch_id, jobs })
}

/// Reconciles a reported `batch/response`, returning the aggregate change
/// log publishable on `inventory/updates`.
pub async fn handle_batch_response(response: &RobotBatchResponse, inventory: &dyn InventoryStore, batch_store: &dyn BatchStore) -> Vec<ItemUpdate> {
    response::process_batch_response(response, inventory, batch_store).await
}
