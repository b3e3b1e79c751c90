//! Core geometry types: Point, Size, Rect, EdgeInsets, Axis.
//!
//! All values are in points (f32). Sizes produced by this crate are never
//! negative: [`Size::clamped`] is applied wherever script input or layout
//! arithmetic could push a dimension below zero.

use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// A layout axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub const fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A position in surface coordinates (origin top-left).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size in points (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Total area (width * height).
    #[inline]
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// Whether this size encloses no area.
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Replace negative or NaN components with zero.
    #[inline]
    pub fn clamped(self) -> Size {
        Size { width: non_negative(self.width), height: non_negative(self.height) }
    }

    /// The component along `axis`.
    #[inline]
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Build a size from a main-axis and cross-axis component.
    #[inline]
    pub fn from_axes(axis: Axis, main: f32, cross: f32) -> Size {
        match axis {
            Axis::Horizontal => Size { width: main, height: cross },
            Axis::Vertical => Size { width: cross, height: main },
        }
    }

    /// Shrink by `insets` on every edge, clamped at zero.
    #[inline]
    pub fn inset(self, insets: EdgeInsets) -> Size {
        Size {
            width: self.width - insets.horizontal(),
            height: self.height - insets.vertical(),
        }
        .clamped()
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size { width: self.width + rhs.width, height: self.height + rhs.height }
    }
}

/// Clamp a scalar to `0.0..`, mapping NaN to zero.
#[inline]
pub fn non_negative(v: f32) -> f32 {
    if v.is_nan() || v < 0.0 {
        0.0
    } else {
        v
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A rectangle defined by its top-left corner and size.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// A rectangle at `origin` with the given size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    #[inline]
    pub const fn origin(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether `point` lies inside this rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Move the rectangle by `delta`.
    #[inline]
    pub fn translate(self, delta: Point) -> Rect {
        Rect { x: self.x + delta.x, y: self.y + delta.y, ..self }
    }
}

// ---------------------------------------------------------------------------
// EdgeInsets
// ---------------------------------------------------------------------------

/// Per-edge padding amounts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    #[inline]
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    /// The same inset on all four edges.
    #[inline]
    pub const fn all(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    /// Vertical (top/bottom) and horizontal (left/right) insets.
    #[inline]
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Offset of the content box from the outer top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        Point { x: self.left, y: self.top }
    }
}
