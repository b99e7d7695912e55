//! `STORE_INVENTORY` job building: resolves a target item held by the
//! robot (or already fetched earlier in this batch) and a destination empty,
//! either explicit, anticipated from this batch's `fetched_items`, or found
//! by `find_empty_for_store`.

use model::{job::GenericJobType, messages::JobRequest, Item, ItemType, Location};
use store::InventoryStore;

use crate::{fetch_inventory::create_future_empty, find_empty::find_empty_for_store, new_job, Error, FetchedItems};

/// Builds the single job for one `STORE_INVENTORY` request.
pub async fn build(request: &JobRequest, inventory: &dyn InventoryStore, fetched_items: &FetchedItems) -> Result<Vec<model::job::RobotJob>, Error> {
    let uid = request.uid.as_deref().ok_or(Error::MissingUid)?;
    let target = inventory.find_item_by_barcode(uid).await?;

    let held_by_robot = target.meta.location == Location::Robot && target.meta.destination.is_none() && !target.meta.available;
    let already_fetched_in_batch = target.primary_barcode.as_ref().is_some_and(|b| fetched_items.contains_key(&b.meta.data));

    if !held_by_robot && !already_fetched_in_batch {
        return Err(Error::InvalidStoreTarget { uid: uid.to_string() });
    }

    let destination = resolve_destination(request, &target, inventory, fetched_items).await?;

    let destination_valid =
        destination.meta.available && destination.meta.location == Location::Inventory && destination.meta.destination.is_none() && destination.meta.item_type == ItemType::Empty;
    if !destination_valid {
        return Err(Error::InvalidDestination { uuid: destination.uuid });
    }

    Ok(vec![new_job(GenericJobType::StoreInventory, target, Some(destination), None)])
}

async fn resolve_destination(request: &JobRequest, target: &Item, inventory: &dyn InventoryStore, fetched_items: &FetchedItems) -> Result<Item, Error> {
    let Some(destination_uuid) = request.destination_uuid else {
        return find_empty_for_store(target, inventory).await;
    };

    // A client may address the future empty a same-batch fetch is about to
    // leave behind by the uuid it was reserved under, rather than loading
    // it by uuid directly (it doesn't exist in the store yet).
    if let Some((barcode_data, future_uuid)) = fetched_items.iter().find(|(_, uuid)| **uuid == destination_uuid) {
        let fetched_item = inventory.find_item_by_barcode(barcode_data).await?;
        return Ok(create_future_empty(*future_uuid, &fetched_item));
    }

    inventory.find_item_by_uuid(destination_uuid).await.map_err(Error::from)
}
