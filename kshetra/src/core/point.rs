//! Point and coordinate types.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Integer cell index into a grid.
///
/// `x` grows along the grid's column axis and `y` along its row axis; the
/// flat storage index of a cell is `num_x_cells * y + x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: GridCoord) -> GridCoord {
        GridCoord::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: GridCoord) -> GridCoord {
        GridCoord::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for GridCoord {
    type Output = GridCoord;

    #[inline]
    fn add(self, rhs: GridCoord) -> GridCoord {
        GridCoord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridCoord {
    type Output = GridCoord;

    #[inline]
    fn sub(self, rhs: GridCoord) -> GridCoord {
        GridCoord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A point in the local map frame, in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate (meters).
    pub x: f32,
    /// Y coordinate (meters).
    pub y: f32,
}

impl WorldPoint {
    /// The origin.
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin to this point.
    #[inline]
    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        (*self - *other).norm()
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: &WorldPoint) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Are both coordinates finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for WorldPoint {
    type Output = WorldPoint;

    #[inline]
    fn add(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for WorldPoint {
    type Output = WorldPoint;

    #[inline]
    fn sub(self, rhs: WorldPoint) -> WorldPoint {
        WorldPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for WorldPoint {
    type Output = WorldPoint;

    #[inline]
    fn mul(self, rhs: f32) -> WorldPoint {
        WorldPoint::new(self.x * rhs, self.y * rhs)
    }
}
