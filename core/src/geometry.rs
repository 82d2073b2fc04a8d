//! Playfield geometry expressed in screen-space units.
//!
//! The y axis grows downward, matching the screen the game is presented on.

use serde::{Deserialize, Serialize};

/// Point on the playfield. Entities are anchored at their centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from screen-space coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns a copy shifted by the provided offsets.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned rectangle anchored at its upper-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and dimensions.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a rectangle of the provided dimensions centred on `center`.
    ///
    /// Half extents are floored so integer-sized entities keep integer edges.
    #[must_use]
    pub fn centered(center: Position, width: f32, height: f32) -> Self {
        Self {
            left: center.x() - (width / 2.0).floor(),
            top: center.y() - (height / 2.0).floor(),
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Vertical centre line.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    /// Reports whether the rectangle encloses a non-zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Reports whether two rectangles overlap.
    ///
    /// Rectangles that merely share an edge do not intersect, and empty
    /// rectangles never intersect anything.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Reports whether the horizontal spans of two rectangles overlap.
    #[must_use]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left < other.right() && self.right() > other.left
    }

    /// Returns a copy grown by `dx` on the left and right and `dy` on the top and bottom.
    #[must_use]
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left - dx,
            top: self.top - dy,
            width: self.width + dx * 2.0,
            height: self.height + dy * 2.0,
        }
    }

    /// Returns a copy shifted by the provided offsets.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!left.intersects(&right));
        assert!(left.intersects(&right.translated(-0.5, 0.0)));
    }

    #[test]
    fn empty_rectangles_never_intersect() {
        let area = Rect::new(0.0, 0.0, 10.0, 10.0);
        let flat = Rect::new(2.0, 2.0, 5.0, 0.0);
        assert!(!area.intersects(&flat));
    }

    #[test]
    fn inflate_grows_every_side() {
        let rect = Rect::new(100.0, 50.0, 40.0, 40.0).inflate(40.0, 40.0);
        assert_eq!(rect, Rect::new(60.0, 10.0, 120.0, 120.0));
    }

    #[test]
    fn centered_floors_half_extents() {
        let rect = Rect::centered(Position::new(100.0, 100.0), 31.0, 31.0);
        assert_eq!(rect.left(), 85.0);
        assert_eq!(rect.top(), 85.0);
        assert_eq!(rect.right(), 116.0);
    }
}
