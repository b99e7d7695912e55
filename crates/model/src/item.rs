//! The canonical, store-persisted inventory entity produced by the scan
//! compiler and mutated by the batch planner and response processor.

use geometry::{Axis, Vector3};
use serde::{Deserialize, Serialize};

use crate::{Barcode, Side, Uuid};

/// What kind of physical thing an item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// An occupied shelf slot.
    Box,
    /// A known-unoccupied shelf slot; first-class inventory entity.
    Empty,
    /// An item staged on the conveyor, outside the shelving itself.
    Conveyor,
}

/// Whether an item currently sits in the shelving or is held by the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// The item occupies a shelf slot.
    Inventory,
    /// The robot is currently holding the item.
    Robot,
}

/// Domain metadata for an item: classification, lifecycle state, and the
/// stack of items physically resting on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ItemMeta {
    /// Item kind.
    pub item_type: ItemType,
    /// Whether the item is in the shelving or held by the robot.
    pub location: Location,
    /// Destination this item is currently being moved towards, if any.
    pub destination: Option<Uuid>,
    /// Whether the item may currently be targeted by a new job.
    pub available: bool,
    /// Aisle this item lives in.
    pub aisle_index: i64,
    /// Scan that last produced or confirmed this item.
    pub scan_id: String,
    /// Uuids of items resting directly or transitively on top of this one.
    /// Always empty for `ItemType::Empty`.
    pub stack: Vec<Uuid>,
}

/// World-frame placement and robot routing hints for an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ItemAbsolute {
    /// Bottom-center position on the shelf plane.
    pub position: Vector3,
    /// `(width, height, depth)`.
    pub dimension: Vector3,
    /// World axis the shelf face runs along.
    pub aligned_axis: Axis,
    /// Staging point the robot approaches before manipulating this item.
    pub waypoint: Option<Vector3>,
    /// Shelf depth slot, when the aisle has more than one row of depth.
    pub depth_index: Option<i64>,
    /// Vertical shelf level.
    pub stack_index: Option<i64>,
}

/// Camera/shelf-relative placement of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ItemRelative {
    /// `(width, height, depth)` as measured relative to the shelf image.
    pub dimension: Vector3,
    /// Shelf face this item presents to the robot.
    pub side: Side,
}

/// A canonical item: a box, an empty slot, or a conveyor item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Item {
    /// Identity, assigned once at creation and stable for the item's life.
    pub uuid: Uuid,
    /// Domain metadata.
    pub meta: ItemMeta,
    /// World-frame placement.
    pub absolute: ItemAbsolute,
    /// Shelf-relative placement.
    pub relative: ItemRelative,
    /// Barcodes attached to this item.
    pub barcodes: Vec<Barcode>,
    /// The barcode a client uses to refer to this item, if any is attached.
    pub primary_barcode: Option<Barcode>,
}

impl Item {
    /// The item's bounding box on the shelf plane.
    pub fn bounding_box(&self) -> geometry::Rectangle {
        geometry::bounding_box(
            self.absolute.position,
            self.relative.dimension.x,
            self.relative.dimension.y,
            self.absolute.aligned_axis,
        )
    }
}

/// Builds a fresh, empty-type item occupying `source`'s current footprint.
/// Used wherever a fetch or a slice leaves behind a known-unoccupied region:
/// the planner's `create_future_empty` and the response processor's
/// fetch-inventory and store-inventory reconciliation.
pub fn synthetic_empty(uuid: Uuid, source: &Item) -> Item {
    Item {
        uuid,
        meta: ItemMeta {
            item_type: ItemType::Empty,
            location: Location::Inventory,
            destination: None,
            available: true,
            aisle_index: source.meta.aisle_index,
            scan_id: source.meta.scan_id.clone(),
            stack: Vec::new(),
        },
        absolute: source.absolute.clone(),
        relative: source.relative.clone(),
        barcodes: Vec::new(),
        primary_barcode: None,
    }
}
