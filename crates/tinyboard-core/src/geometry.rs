#![forbid(unsafe_code)]

//! Geometric primitives and collision predicates.
//!
//! All coordinates are board-local pixels with the origin at the top-left
//! corner of the board container. Values are `f64` because percent and grid
//! snapping produce fractional positions.
//!
//! # Tolerances
//!
//! The overlap predicates take an explicit `tolerance`. Two ranges that overlap
//! by less than the tolerance are treated as touching, not overlapping. This
//! keeps sub-pixel rounding noise from flipping collision results between
//! frames.

use serde::{Deserialize, Serialize};

use crate::id::LayoutId;

/// Default tolerance for the overlap predicates.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// A point in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to `self`.
    #[must_use]
    pub fn vector_from(self, origin: Point) -> Vector {
        Vector::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Width and height without a position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned box.
///
/// `width` and `height` are expected to be non-negative; the constructors do
/// not enforce it so that transient rects produced mid-gesture can be
/// represented faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a new rectangle from its left edge, top edge, and size.
    #[inline]
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Check if a point lies inside the rectangle. Edges are inclusive.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Move the rectangle by a displacement.
    #[must_use]
    pub fn translate(&self, vector: Vector) -> Rect {
        Rect {
            top: self.top + vector.y,
            left: self.left + vector.x,
            ..*self
        }
    }

    /// Move the top-left corner of the rectangle to `point`.
    #[must_use]
    pub fn move_to(&self, point: Point) -> Rect {
        Rect {
            top: point.y,
            left: point.x,
            ..*self
        }
    }

    /// Smallest rectangle containing both rectangles.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Whether the horizontal projections overlap by more than `tolerance`.
    #[inline]
    #[must_use]
    pub fn x_overlaps(&self, other: &Rect, tolerance: f64) -> bool {
        self.left + tolerance < other.right() && self.right() > other.left + tolerance
    }

    /// Whether the vertical projections overlap by more than `tolerance`.
    #[inline]
    #[must_use]
    pub fn y_overlaps(&self, other: &Rect, tolerance: f64) -> bool {
        self.top + tolerance < other.bottom() && self.bottom() > other.top + tolerance
    }

    /// Whether the two rectangles are separated on at least one axis.
    ///
    /// Touching rectangles are isolated, and so are rectangles that overlap by
    /// no more than `tolerance`.
    #[inline]
    #[must_use]
    pub fn is_isolated(&self, other: &Rect, tolerance: f64) -> bool {
        self.right() <= other.left + tolerance
            || other.right() <= self.left + tolerance
            || self.bottom() <= other.top + tolerance
            || other.bottom() <= self.top + tolerance
    }

    /// Width of the horizontal overlap, negative when the projections are apart.
    #[must_use]
    pub fn x_overlap_len(&self, other: &Rect) -> f64 {
        (self.right() - other.left).min(other.right() - self.left)
    }
}

/// A rect tagged with the block it belongs to.
///
/// An unassigned id marks a virtual block that only exists for the duration of
/// an interaction (for example a block dragged in from outside the board).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRect {
    pub id: LayoutId,
    #[serde(flatten)]
    pub rect: Rect,
}

impl LayoutRect {
    #[must_use]
    pub fn new(id: impl Into<LayoutId>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            rect,
        }
    }

    /// A rect for a block that has not been assigned an id yet.
    #[must_use]
    pub fn unassigned(rect: Rect) -> Self {
        Self {
            id: LayoutId::unassigned(),
            rect,
        }
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.rect.bottom()
    }

    #[must_use]
    pub fn with_rect(&self, rect: Rect) -> Self {
        Self {
            id: self.id.clone(),
            rect,
        }
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `min > max` the upper bound
/// wins, which is what a box larger than its container needs.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Whether `value` lies in `[min, max]`.
#[inline]
#[must_use]
pub fn is_between(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// Bounding box of a set of rectangles.
///
/// An empty set yields [`Rect::ZERO`].
#[must_use]
pub fn bounding_box<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Rect {
    let mut iter = rects.into_iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(*first, |acc, rect| acc.union(rect))
}

/// Rects from `rects` that are not isolated from `rect`.
pub fn collided_rects<'a>(
    rect: &'a Rect,
    rects: &'a [LayoutRect],
    tolerance: f64,
) -> impl Iterator<Item = &'a LayoutRect> + 'a {
    rects
        .iter()
        .filter(move |candidate| !candidate.rect.is_isolated(rect, tolerance))
}

/// Rects whose bottom edge reaches `boundary`, ordered by bottom edge.
///
/// Rects below a moved block have to be shifted in this order: a lower
/// rect's final position depends on where everything above it came to rest.
#[must_use]
pub fn ordered_below_rects(boundary: f64, rects: &[LayoutRect], tolerance: f64) -> Vec<LayoutRect> {
    let mut below: Vec<LayoutRect> = rects
        .iter()
        .filter(|r| r.bottom() >= boundary - tolerance)
        .cloned()
        .collect();
    below.sort_by(|a, b| a.bottom().total_cmp(&b.bottom()));
    below
}
