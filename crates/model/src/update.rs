//! The change log broadcast to `inventory/updates` subscribers whenever the
//! inventory store is mutated.

use serde::{Deserialize, Serialize};

use crate::Item;

/// What kind of mutation produced an `ItemUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    /// The item was newly inserted.
    Created,
    /// An existing item was modified in place.
    Updated,
    /// The item was removed from the store.
    Deleted,
}

/// One entry in the change log emitted by every store mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ItemUpdate {
    /// What kind of mutation occurred.
    pub change: Change,
    /// The item as it stood after the mutation (or, for deletes, before it).
    pub item: Item,
}

impl ItemUpdate {
    /// Builds a `Created` update.
    pub fn created(item: Item) -> Self {
        Self { change: Change::Created, item }
    }

    /// Builds an `Updated` update.
    pub fn updated(item: Item) -> Self {
        Self { change: Change::Updated, item }
    }

    /// Builds a `Deleted` update.
    pub fn deleted(item: Item) -> Self {
        Self { change: Change::Deleted, item }
    }
}
