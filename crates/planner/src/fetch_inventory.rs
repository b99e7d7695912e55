//! `FETCH_INVENTORY` job building: fetches a target item, unstacking
//! at most one item resting on it and restoring that item into a future
//! empty reserved at the target's own footprint.

use model::{job::GenericJobType, messages::JobRequest, synthetic_empty, Item, ItemType, Uuid};
use store::InventoryStore;

use crate::{new_job, Error, FetchedItems};

/// Builds the jobs for one `FETCH_INVENTORY` request, recording the fetched
/// item's future empty uuid into `fetched_items` for later builders in this
/// batch.
pub async fn build(
    request: &JobRequest,
    inventory: &dyn InventoryStore,
    fetched_items: &mut FetchedItems,
) -> Result<Vec<model::job::RobotJob>, Error> {
    let uid = request.uid.as_deref().ok_or(Error::MissingUid)?;
    let target = inventory.find_item_by_barcode(uid).await?;

    if target.meta.stack.len() > 1 {
        return Err(Error::MultipleStacked { uuid: target.uuid });
    }

    let mut items_above = Vec::new();
    for stacked_uuid in &target.meta.stack {
        let mut above = inventory.find_item_by_uuid(*stacked_uuid).await?;

        if !above.meta.stack.is_empty() {
            return Err(Error::DoubleStacked { uuid: *stacked_uuid });
        }

        if above.meta.item_type == ItemType::Empty {
            tracing::info!(uuid = %stacked_uuid, "item above fetch target is empty, skipping");
            continue;
        }

        above.primary_barcode = inventory.find_primary_barcode(*stacked_uuid).await;
        items_above.push(above);
    }

    let future_uuid = request.destination_uuid.unwrap_or_else(Uuid::new_v4);
    let had_items_above = !items_above.is_empty();

    let mut fetch_jobs = Vec::with_capacity(items_above.len());
    let mut store_back_jobs = Vec::with_capacity(items_above.len());

    for item in items_above {
        if let Some(barcode) = &item.primary_barcode {
            if fetched_items.contains_key(&barcode.meta.data) {
                if item.meta.stack.is_empty() {
                    continue;
                }
                return Err(Error::AlreadyFetchedWithStack { uuid: item.uuid });
            }
        }

        let destination = create_future_empty(future_uuid, &target);
        fetch_jobs.push(new_job(GenericJobType::FetchInventory, item.clone(), None, None));
        store_back_jobs.push(new_job(GenericJobType::StoreInventory, item, Some(destination), None));
    }

    let target_future_uuid = if had_items_above { Some(future_uuid) } else { request.destination_uuid };
    let target_job = new_job(GenericJobType::FetchInventory, target.clone(), None, target_future_uuid);

    if let Some(barcode) = &target.primary_barcode {
        let _ = fetched_items.insert(barcode.meta.data.clone(), future_uuid);
    }

    let mut jobs = fetch_jobs;
    jobs.push(target_job);
    jobs.extend(store_back_jobs);
    Ok(jobs)
}

/// Builds the synthetic empty a `FETCH_INVENTORY` target leaves behind,
/// reserved ahead of time under `future_uuid`, occupying `source`'s footprint.
pub fn create_future_empty(future_uuid: Uuid, source: &Item) -> Item {
    synthetic_empty(future_uuid, source)
}
