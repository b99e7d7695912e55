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

//! Vector and rectangle arithmetic shared by every other crate in this
//! workspace. All operations are pure and side-effect free.

use serde::{Deserialize, Serialize};

/// Errors that can occur while manipulating rectangles.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// `slice_rectangle` was called with a cutter that does not overlap the
    /// base rectangle.
    #[error("cannot slice a rectangle by a non-overlapping cutter")]
    NoOverlap,
}

/// Stacking tolerance on the vertical axis: a top item's bottom edge must
/// land within this distance of the supporting item's top edge.
pub const VERTICAL_MARGIN: f64 = 0.055;

/// Horizontal shrink applied to both rectangles before testing stacking
/// overlap.
pub const HORIZONTAL_MARGIN: f64 = 0.10;

/// Sub-rectangles narrower or shorter than this are dropped by
/// `slice_rectangle`.
pub const MIN_DIMENSION: f64 = 0.1;

/// A point or displacement in the horizontal/vertical shelf plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Vector2 {
    /// Creates a new `Vector2`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point or displacement in the full world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// Horizontal coordinate, aligned axis when `Axis::X`.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Horizontal coordinate, aligned axis when `Axis::Z`.
    pub z: f64,
}

impl Vector3 {
    /// Creates a new `Vector3`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Vector3) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }
}

/// Which world axis a shelf face is parallel to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The face runs along the world x axis.
    X,
    /// The face runs along the world y axis (vertical, not used for bottom-center).
    Y,
    /// The face runs along the world z axis.
    Z,
}

/// An axis-aligned rectangle in the shelf plane, `bottom_left` and
/// `top_right` given as `(x, y)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Bottom-left corner.
    pub bottom_left: Vector2,
    /// Top-right corner.
    pub top_right: Vector2,
}

impl Rectangle {
    /// Creates a new rectangle from its two opposite corners.
    pub fn new(bottom_left: Vector2, top_right: Vector2) -> Self {
        Self { bottom_left, top_right }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.top_right.x - self.bottom_left.x
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.top_right.y - self.bottom_left.y
    }
}

/// Computes the bottom-center bounding box of an entity positioned at
/// `position`, spanning `width` x `height`, whose shelf face runs along
/// `axis`.
pub fn bounding_box(position: Vector3, width: f64, height: f64, axis: Axis) -> Rectangle {
    let center = match axis {
        Axis::Z => position.z,
        // Axis::Y never appears as an aligned axis in practice; fall back to x.
        Axis::X | Axis::Y => position.x,
    };

    Rectangle::new(
        Vector2::new(center - width / 2.0, position.y),
        Vector2::new(center + width / 2.0, position.y + height),
    )
}

/// Area of a rectangle. Degenerate (zero or negative width/height)
/// rectangles yield a non-positive area.
pub fn area(r: &Rectangle) -> f64 {
    r.width() * r.height()
}

/// Area of the intersection of two rectangles, `0.0` when they don't overlap.
pub fn overlap_area(a: &Rectangle, b: &Rectangle) -> f64 {
    let dx = (a.top_right.x.min(b.top_right.x) - a.bottom_left.x.max(b.bottom_left.x)).max(0.0);
    let dy = (a.top_right.y.min(b.top_right.y) - a.bottom_left.y.max(b.bottom_left.y)).max(0.0);
    dx * dy
}

/// Midpoint of the bottom edge of a rectangle.
pub fn bottom_center(r: &Rectangle) -> Vector2 {
    Vector2::new((r.bottom_left.x + r.top_right.x) / 2.0, r.bottom_left.y)
}

/// Shrinks a rectangle horizontally by `margin` on each side.
fn shrink_horizontal(r: &Rectangle, margin: f64) -> Rectangle {
    Rectangle::new(
        Vector2::new(r.bottom_left.x + margin, r.bottom_left.y),
        Vector2::new(r.top_right.x - margin, r.top_right.y),
    )
}

/// True when `top` rests on top of `bottom`: their horizontal spans overlap
/// after both are shrunk by `HORIZONTAL_MARGIN`, and `top`'s bottom edge
/// lands within `VERTICAL_MARGIN` of `bottom`'s top edge.
pub fn is_stacked_on(top: &Rectangle, bottom: &Rectangle) -> bool {
    let top_shrunk = shrink_horizontal(top, HORIZONTAL_MARGIN);
    let bottom_shrunk = shrink_horizontal(bottom, HORIZONTAL_MARGIN);

    let horizontal_overlap = top_shrunk.bottom_left.x < bottom_shrunk.top_right.x && bottom_shrunk.bottom_left.x < top_shrunk.top_right.x;

    horizontal_overlap && (top.bottom_left.y - bottom.top_right.y).abs() < VERTICAL_MARGIN
}

/// True when `(x, y)` lies within `r`, inclusive on both axes.
pub fn contains_point(r: &Rectangle, x: f64, y: f64) -> bool {
    x >= r.bottom_left.x && x <= r.top_right.x && y >= r.bottom_left.y && y <= r.top_right.y
}

/// Smallest rectangle containing both `a` and `b`.
pub fn union(a: &Rectangle, b: &Rectangle) -> Rectangle {
    Rectangle::new(
        Vector2::new(a.bottom_left.x.min(b.bottom_left.x), a.bottom_left.y.min(b.bottom_left.y)),
        Vector2::new(a.top_right.x.max(b.top_right.x), a.top_right.y.max(b.top_right.y)),
    )
}

/// Splits `base` around the footprint of `cutter`, returning up to three
/// leftover strips (left, top-middle, right). Strips narrower or shorter
/// than `MIN_DIMENSION` are dropped. Fails when `base` and `cutter` don't
/// overlap at all.
pub fn slice_rectangle(base: &Rectangle, cutter: &Rectangle) -> Result<Vec<Rectangle>, Error> {
    if overlap_area(base, cutter) <= 0.0 {
        return Err(Error::NoOverlap);
    }

    let mut strips = Vec::with_capacity(3);

    let left = Rectangle::new(base.bottom_left, Vector2::new(base.bottom_left.x.max(cutter.bottom_left.x), base.top_right.y));
    push_if_large_enough(&mut strips, left);

    let middle = Rectangle::new(
        Vector2::new(base.bottom_left.x.max(cutter.bottom_left.x), base.top_right.y.min(cutter.top_right.y)),
        Vector2::new(base.top_right.x.min(cutter.top_right.x), base.top_right.y),
    );
    push_if_large_enough(&mut strips, middle);

    let right = Rectangle::new(Vector2::new(base.top_right.x.min(cutter.top_right.x), base.bottom_left.y), base.top_right);
    push_if_large_enough(&mut strips, right);

    Ok(strips)
}

fn push_if_large_enough(strips: &mut Vec<Rectangle>, r: Rectangle) {
    if r.width() > MIN_DIMENSION && r.height() > MIN_DIMENSION {
        strips.push(r);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rect(bl: (f64, f64), tr: (f64, f64)) -> Rectangle {
        Rectangle::new(Vector2::new(bl.0, bl.1), Vector2::new(tr.0, tr.1))
    }

    #[test]
    fn area_of_unit_square() {
        let r = rect((0.0, 0.0), (1.0, 1.0));
        assert_eq!(area(&r), 1.0);
    }

    #[test]
    fn overlap_area_of_disjoint_rectangles_is_zero() {
        let a = rect((0.0, 0.0), (1.0, 1.0));
        let b = rect((2.0, 2.0), (3.0, 3.0));
        assert_eq!(overlap_area(&a, &b), 0.0);
    }

    #[test]
    fn overlap_area_exactly_at_threshold_is_not_mergeable() {
        // merge_threshold comparisons live in the compiler crate; this just
        // pins the overlap computation the compiler relies on.
        let a = rect((0.0, 0.0), (1.0, 1.0));
        let b = rect((0.5, 0.0), (1.5, 1.0));
        assert_eq!(overlap_area(&a, &b), 0.5);
    }

    #[test]
    fn bottom_center_is_midpoint_of_bottom_edge() {
        let r = rect((0.0, 0.0), (2.0, 1.0));
        assert_eq!(bottom_center(&r), Vector2::new(1.0, 0.0));
    }

    #[test]
    fn stacked_within_margins() {
        let bottom = rect((0.0, 0.0), (1.0, 1.0));
        let top = rect((0.05, 1.03), (0.95, 1.5));
        assert!(is_stacked_on(&top, &bottom));
    }

    #[test]
    fn not_stacked_outside_vertical_margin() {
        let bottom = rect((0.0, 0.0), (1.0, 1.0));
        let top = rect((0.05, 1.2), (0.95, 1.5));
        assert!(!is_stacked_on(&top, &bottom));
    }

    #[test]
    fn not_stacked_without_horizontal_overlap_after_shrink() {
        let bottom = rect((0.0, 0.0), (1.0, 1.0));
        // top only overlaps within the margin that gets shrunk away
        let top = rect((0.95, 1.0), (1.15, 1.5));
        assert!(!is_stacked_on(&top, &bottom));
    }

    #[test]
    fn contains_point_is_inclusive() {
        let r = rect((0.0, 0.0), (1.0, 1.0));
        assert!(contains_point(&r, 0.0, 0.0));
        assert!(contains_point(&r, 1.0, 1.0));
        assert!(!contains_point(&r, 1.01, 0.5));
    }

    #[test]
    fn slice_self_drops_every_strip() {
        let r = rect((0.0, 0.0), (1.0, 1.0));
        let strips = slice_rectangle(&r, &r).unwrap();
        assert!(strips.is_empty());
    }

    #[test]
    fn slice_produces_left_and_right_strips() {
        let base = rect((0.0, 0.0), (3.0, 1.0));
        let cutter = rect((1.0, 0.0), (2.0, 1.0));
        let strips = slice_rectangle(&base, &cutter).unwrap();
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[0], rect((0.0, 0.0), (1.0, 1.0)));
        assert_eq!(strips[1], rect((2.0, 0.0), (3.0, 1.0)));
    }

    #[test]
    fn slice_fails_when_disjoint() {
        let base = rect((0.0, 0.0), (1.0, 1.0));
        let cutter = rect((2.0, 2.0), (3.0, 3.0));
        assert!(matches!(slice_rectangle(&base, &cutter), Err(Error::NoOverlap)));
    }

    #[test]
    fn union_covers_both_rectangles() {
        let a = rect((0.0, 0.0), (1.0, 1.0));
        let b = rect((0.5, 0.5), (2.0, 2.0));
        assert_eq!(union(&a, &b), rect((0.0, 0.0), (2.0, 2.0)));
    }
}
