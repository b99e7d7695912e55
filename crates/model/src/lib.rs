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

//! The entities and wire message bodies exchanged between the router, the
//! compiler, the planner, the response processor, and the inventory store.
//! Field names follow the JSON bodies described for the queue interfaces:
//! unknown fields are ignored on deserialization and optional fields default
//! as documented on each type.

pub mod job;
pub mod messages;
pub mod partial;
pub mod timestamp;
pub mod update;

mod barcode;
mod item;

pub use barcode::{Barcode, BarcodeAbsolute, BarcodeMeta, BarcodeRelative, Header};
pub use geometry::{Axis, Vector2, Vector3};
pub use item::{synthetic_empty, Item, ItemAbsolute, ItemMeta, ItemRelative, ItemType, Location};
pub use job::RobotJob;
pub use timestamp::Timestamp;
pub use update::ItemUpdate;

/// Store-assigned identifier for partials and job-type configuration rows.
pub type ObjectId = String;

/// RFC 4122 identifier for every canonical, store-persisted entity.
pub type Uuid = uuid::Uuid;

/// The shelf face an item or barcode presents to the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left shelf face.
    Left,
    /// Right shelf face.
    Right,
}

/// Barcode symbologies treated as a client-facing item identity.
pub const PRIMARY_BARCODE_TYPES: [&str; 2] = ["GS1-128", "Code 128"];

/// True when `barcode_type` is one the client may use to address an item.
pub fn is_primary_barcode_type(barcode_type: &str) -> bool {
    PRIMARY_BARCODE_TYPES.contains(&barcode_type)
}
