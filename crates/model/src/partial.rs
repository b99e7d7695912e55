//! Uncompiled detections ingested from a single scan image. A `PartialItem`
//! or `PartialBarcode` only gains meaning once the scan compiler clusters it
//! together with the other detections of the same physical object.

use geometry::{Axis, Vector3};
use serde::{Deserialize, Serialize};

use crate::{ObjectId, Side};

/// Detection-specific metadata for a partial box/empty/conveyor sighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialItemMeta {
    /// Item kind as classified by the detector.
    pub item_type: crate::ItemType,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
    /// Scan this detection was produced by.
    pub scan_id: String,
    /// Aisle the source image was taken in.
    pub aisle_index: i64,
    /// Image the detection came from.
    pub image_id: String,
}

/// World-frame placement of a partial item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialItemAbsolute {
    /// Bottom-center position on the shelf plane.
    pub position: Vector3,
    /// `(width, height, depth)`.
    pub dimension: Vector3,
    /// World axis the shelf face runs along.
    pub aligned_axis: Axis,
}

/// Camera/shelf-relative placement of a partial item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialItemRelative {
    /// Shelf face this detection was taken from.
    pub side: Side,
    /// `(width, height, depth)` as measured relative to the image.
    pub dimension: Vector3,
    /// Position relative to the image frame.
    pub position: Vector3,
}

/// One uncompiled sighting of a box, empty, or conveyor item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialItem {
    /// Store-assigned identifier, set once persisted.
    pub id: Option<ObjectId>,
    /// Detection metadata.
    pub meta: PartialItemMeta,
    /// World-frame placement.
    pub absolute: PartialItemAbsolute,
    /// Image-relative placement.
    pub relative: PartialItemRelative,
}

/// Detection-specific metadata for a partial barcode sighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialBarcodeMeta {
    /// Barcode symbology.
    pub barcode_type: String,
    /// Decoded barcode payload.
    pub data: String,
    /// Scan this detection was produced by.
    pub scan_id: String,
    /// Aisle the source image was taken in.
    pub aisle_index: i64,
}

/// World-frame placement of a partial barcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialBarcodeAbsolute {
    /// World-frame position of the barcode sticker.
    pub position: Vector3,
}

/// Camera/shelf-relative placement of a partial barcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialBarcodeRelative {
    /// Shelf face this detection was taken from.
    pub side: Side,
    /// `(width, height, depth)` of the decoded sticker.
    pub dimension: Vector3,
}

/// One uncompiled sighting of a barcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartialBarcode {
    /// Store-assigned identifier, set once persisted.
    pub id: Option<ObjectId>,
    /// Detection metadata.
    pub meta: PartialBarcodeMeta,
    /// World-frame placement.
    pub absolute: PartialBarcodeAbsolute,
    /// Image-relative placement.
    pub relative: PartialBarcodeRelative,
}
