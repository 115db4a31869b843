use serde::{Deserialize, Serialize};

/// A position in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Converts a point and size into a rectangle
    ///
    /// The point is treated as the center of the rectangle, and the size
    /// is distributed equally in all directions around that center.
    pub fn to_rect(self, size: Size) -> Rect {
        Rect::new(
            self.x - size.width / 2.0,
            self.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
///
/// Width and height are never negative; the constructor asserts this in
/// debug builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(
            width >= 0.0 && height >= 0.0,
            "rectangle has invalid size {width}x{height}",
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the x-coordinate of the left edge
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the top edge
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the width of the rectangle
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height of the rectangle
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the x-coordinate of the right edge
    pub fn max_x(self) -> f32 {
        self.x + self.width
    }

    /// Returns the y-coordinate of the bottom edge
    pub fn max_y(self) -> f32 {
        self.y + self.height
    }

    /// Returns the center of the rectangle
    pub fn center(self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Returns the dimensions of the rectangle as a [`Size`]
    pub fn size(self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Checks whether a point lies inside this rectangle (edges included)
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.max_x()
            && point.y >= self.y
            && point.y <= self.max_y()
    }

    /// Checks whether two rectangles share any area or edge
    pub fn intersects(self, other: Rect) -> bool {
        self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }

    /// Computes the overlapping region of two rectangles
    ///
    /// Returns `None` when the rectangles are disjoint. Rectangles that only
    /// touch along an edge intersect in a zero-area rectangle.
    pub fn intersection(self, other: Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());

        Some(Rect::new(x, y, max_x - x, max_y - y))
    }

    /// Computes the smallest rectangle containing both rectangles
    pub fn union(self, other: Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());

        Rect::new(x, y, max_x - x, max_y - y)
    }

    /// Moves the rectangle by the specified offset along both axes
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Running minimum and maximum coordinates over a set of rectangles.
///
/// A freshly created `Bounds` is empty; including the first rectangle makes
/// it the exact extents of that rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates empty bounds that any included rectangle will replace
    pub fn empty() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    /// Returns true if nothing has been included yet
    pub fn is_empty(self) -> bool {
        self.min_x > self.max_x
    }

    /// Extends the bounds to cover a rectangle centered at `center`
    pub fn include_centered(&mut self, center: Point, size: Size) {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;

        self.min_x = self.min_x.min(center.x - half_width);
        self.max_x = self.max_x.max(center.x + half_width);
        self.min_y = self.min_y.min(center.y - half_height);
        self.max_y = self.max_y.max(center.y + half_height);
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds, or 0 when empty
    pub fn width(self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    /// Returns the height of the bounds, or 0 when empty
    pub fn height(self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}
