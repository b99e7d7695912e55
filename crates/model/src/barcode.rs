//! Canonical barcodes attached to a single item after scan compilation.

use geometry::{Axis, Vector3};
use serde::{Deserialize, Serialize};

use crate::{Side, Uuid};

/// Frame a barcode's relative position is expressed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Header {
    /// `"parent_item"` once the barcode has been assigned to an item.
    pub frame_id: String,
}

/// Domain metadata for a canonical barcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BarcodeMeta {
    /// Barcode symbology (see [`crate::is_primary_barcode_type`]).
    pub barcode_type: String,
    /// Decoded barcode payload.
    pub data: String,
    /// Aisle the barcode lives in; copied from its owning item on store.
    pub aisle_index: i64,
}

/// World-frame placement of a barcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BarcodeAbsolute {
    /// Bottom-center position on the shelf plane.
    pub position: Vector3,
    /// `(width, height, depth)`.
    pub dimension: Vector3,
    /// World axis the shelf face runs along.
    pub aligned_axis: Axis,
}

/// Placement of a barcode relative to its owning item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BarcodeRelative {
    /// Frame the relative position is expressed in.
    pub header: Header,
    /// Position relative to the owning item's position.
    pub position: Vector3,
    /// `(width, height, depth)`.
    pub dimension: Vector3,
    /// Shelf face the barcode is affixed to.
    pub side: Side,
}

/// A canonical barcode, attached to exactly one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Barcode {
    /// Domain metadata.
    pub meta: BarcodeMeta,
    /// World-frame placement.
    pub absolute: BarcodeAbsolute,
    /// Item-relative placement.
    pub relative: BarcodeRelative,
    /// The item this barcode is attached to.
    pub item_uuid: Uuid,
}

impl Barcode {
    /// The barcode's bounding box on the shelf plane.
    pub fn bounding_box(&self) -> geometry::Rectangle {
        geometry::bounding_box(
            self.absolute.position,
            self.absolute.dimension.x,
            self.absolute.dimension.y,
            self.absolute.aligned_axis,
        )
    }

    /// True when `self.meta.barcode_type` is a client-facing identity.
    pub fn is_primary(&self) -> bool {
        crate::is_primary_barcode_type(&self.meta.barcode_type)
    }
}
