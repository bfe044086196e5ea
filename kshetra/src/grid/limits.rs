//! Grid extents and the known-cells bounding box.

use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, WorldPoint};

/// Number of cells along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLimits {
    /// Cells along X.
    pub num_x_cells: usize,
    /// Cells along Y.
    pub num_y_cells: usize,
}

impl CellLimits {
    /// Create new cell limits.
    #[inline]
    pub const fn new(num_x_cells: usize, num_y_cells: usize) -> Self {
        Self {
            num_x_cells,
            num_y_cells,
        }
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.num_x_cells * self.num_y_cells
    }

    /// Iterate over every cell index in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> + use<> {
        let (nx, ny) = (self.num_x_cells as i32, self.num_y_cells as i32);
        (0..ny).flat_map(move |y| (0..nx).map(move |x| GridCoord::new(x, y)))
    }
}

/// Resolution, placement and size of a grid.
///
/// Cell `(0, 0)` covers `[origin, origin + resolution)` on both axes; cell
/// `(x, y)` covers `origin + (x, y) * resolution` onwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapLimits {
    resolution: f32,
    origin: WorldPoint,
    cell_limits: CellLimits,
}

impl MapLimits {
    /// Create limits from the lower corner of cell `(0, 0)`.
    pub fn new(resolution: f32, origin: WorldPoint, cell_limits: CellLimits) -> Self {
        assert!(resolution > 0.0, "resolution must be positive");
        assert!(
            cell_limits.num_x_cells > 0 && cell_limits.num_y_cells > 0,
            "grid must have at least one cell"
        );
        Self {
            resolution,
            origin,
            cell_limits,
        }
    }

    /// Create square limits of `num_cells` per side centered on `center`.
    pub fn centered(resolution: f32, center: WorldPoint, num_cells: usize) -> Self {
        let half = 0.5 * num_cells as f32 * resolution;
        Self::new(
            resolution,
            WorldPoint::new(center.x - half, center.y - half),
            CellLimits::new(num_cells, num_cells),
        )
    }

    /// Meters per cell.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Lower corner of cell `(0, 0)`.
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Upper corner of the last cell.
    #[inline]
    pub fn max(&self) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + self.cell_limits.num_x_cells as f32 * self.resolution,
            self.origin.y + self.cell_limits.num_y_cells as f32 * self.resolution,
        )
    }

    /// Cell counts.
    #[inline]
    pub fn cell_limits(&self) -> CellLimits {
        self.cell_limits
    }

    /// Cell index containing `point`. May lie outside the limits.
    #[inline]
    pub fn cell_index(&self, point: WorldPoint) -> GridCoord {
        GridCoord::new(
            ((point.x - self.origin.x) / self.resolution).floor() as i32,
            ((point.y - self.origin.y) / self.resolution).floor() as i32,
        )
    }

    /// Center of a cell in the local map frame.
    #[inline]
    pub fn cell_center(&self, cell: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.resolution,
            self.origin.y + (cell.y as f32 + 0.5) * self.resolution,
        )
    }

    /// Is the cell index inside the limits?
    #[inline]
    pub fn contains(&self, cell: GridCoord) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.cell_limits.num_x_cells
            && (cell.y as usize) < self.cell_limits.num_y_cells
    }

    /// Is the point inside the limits?
    #[inline]
    pub fn contains_point(&self, point: WorldPoint) -> bool {
        self.contains(self.cell_index(point))
    }

    /// Limits doubled on both axes with the current region centered.
    ///
    /// Returns the new limits and the cell offset of the old region inside
    /// them.
    pub fn doubled(&self) -> (MapLimits, GridCoord) {
        let x_offset = self.cell_limits.num_x_cells / 2;
        let y_offset = self.cell_limits.num_y_cells / 2;
        let grown = MapLimits::new(
            self.resolution,
            WorldPoint::new(
                self.origin.x - x_offset as f32 * self.resolution,
                self.origin.y - y_offset as f32 * self.resolution,
            ),
            CellLimits::new(
                2 * self.cell_limits.num_x_cells,
                2 * self.cell_limits.num_y_cells,
            ),
        );
        (grown, GridCoord::new(x_offset as i32, y_offset as i32))
    }
}

/// Inclusive bounding box of cell indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBox {
    /// Lowest corner (inclusive).
    pub min: GridCoord,
    /// Highest corner (inclusive).
    pub max: GridCoord,
}

impl CellBox {
    /// Box covering one cell.
    #[inline]
    pub fn from_cell(cell: GridCoord) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    /// Grow to include `cell`.
    #[inline]
    pub fn extend(&mut self, cell: GridCoord) {
        self.min = self.min.min(cell);
        self.max = self.max.max(cell);
    }

    /// Shift by `offset`.
    #[inline]
    pub fn translate(&mut self, offset: GridCoord) {
        self.min = self.min + offset;
        self.max = self.max + offset;
    }

    /// Is `cell` inside the box?
    #[inline]
    pub fn contains(&self, cell: GridCoord) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// Cell counts covered by the box.
    #[inline]
    pub fn cell_limits(&self) -> CellLimits {
        CellLimits::new(
            (self.max.x - self.min.x + 1) as usize,
            (self.max.y - self.min.y + 1) as usize,
        )
    }
}

/// Extend an optional box, creating it on first use.
#[inline]
pub(crate) fn extend_box(known: &mut Option<CellBox>, cell: GridCoord) {
    match known {
        Some(b) => b.extend(cell),
        None => *known = Some(CellBox::from_cell(cell)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_and_center() {
        let limits = MapLimits::new(0.1, WorldPoint::ZERO, CellLimits::new(10, 10));

        assert_eq!(limits.cell_index(WorldPoint::new(0.05, 0.05)), GridCoord::new(0, 0));
        assert_eq!(limits.cell_index(WorldPoint::new(0.95, 0.35)), GridCoord::new(9, 3));
        assert_eq!(limits.cell_index(WorldPoint::new(-0.01, 0.0)), GridCoord::new(-1, 0));

        let center = limits.cell_center(GridCoord::new(2, 3));
        assert!((center.x - 0.25).abs() < 1e-6);
        assert!((center.y - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_centered_limits() {
        let limits = MapLimits::centered(0.05, WorldPoint::new(1.0, -1.0), 100);
        assert!((limits.origin().x + 1.5).abs() < 1e-5);
        assert!((limits.origin().y + 3.5).abs() < 1e-5);
        assert!(limits.contains_point(WorldPoint::new(1.0, -1.0)));
        assert!(!limits.contains_point(WorldPoint::new(4.0, -1.0)));
    }

    #[test]
    fn test_doubled_keeps_region_centered() {
        let limits = MapLimits::new(0.5, WorldPoint::new(0.0, 0.0), CellLimits::new(4, 6));
        let (grown, offset) = limits.doubled();

        assert_eq!(grown.cell_limits(), CellLimits::new(8, 12));
        assert_eq!(offset, GridCoord::new(2, 3));
        assert!((grown.origin().x + 1.0).abs() < 1e-6);
        assert!((grown.origin().y + 1.5).abs() < 1e-6);

        // Same world point, shifted cell index.
        let p = WorldPoint::new(1.2, 2.7);
        assert_eq!(grown.cell_index(p), limits.cell_index(p) + offset);
    }

    #[test]
    fn test_cell_box() {
        let mut known = None;
        extend_box(&mut known, GridCoord::new(3, 4));
        extend_box(&mut known, GridCoord::new(1, 7));
        let mut b = known.unwrap();
        assert_eq!(b.min, GridCoord::new(1, 4));
        assert_eq!(b.max, GridCoord::new(3, 7));
        assert_eq!(b.cell_limits(), CellLimits::new(3, 4));
        assert!(b.contains(GridCoord::new(2, 5)));

        b.translate(GridCoord::new(10, 10));
        assert_eq!(b.min, GridCoord::new(11, 14));
    }

    #[test]
    fn test_cell_limits_iter() {
        let cells: Vec<_> = CellLimits::new(2, 2).iter().collect();
        assert_eq!(
            cells,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(1, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 1)
            ]
        );
    }
}
