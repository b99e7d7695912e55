//! ROS-style split timestamp.

/// A point in time split into whole seconds and a nanosecond remainder, as
/// delivered by the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the epoch.
    pub sec: i64,
    /// Nanosecond remainder, `0..1_000_000_000`.
    pub nanosec: u32,
}
