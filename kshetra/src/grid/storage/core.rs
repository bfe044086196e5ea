//! Shared growable cell storage.

use crate::core::{GridCoord, WorldPoint};
use crate::grid::limits::{CellBox, CellLimits, MapLimits, extend_box};
use crate::grid::tables::{ConversionTable, ValueConversionTables};
use crate::grid::values::{UNKNOWN_CORRESPONDENCE_VALUE, UPDATE_MARKER};

/// Growable 2D array of encoded cells.
///
/// Cells hold 15-bit codes of a bounded float (correspondence cost for
/// probability grids, signed distance for TSDF grids) plus the update marker
/// in bit 15. Code `0` is unknown.
///
/// The grid coordinate system:
/// - Cell `(0, 0)` starts at `limits.origin()`
/// - Positive X is to the right
/// - Positive Y is up
/// - Storage is row-major: index = `y * num_x_cells + x`
#[derive(Clone, Debug)]
pub struct Grid2D {
    pub(super) limits: MapLimits,
    pub(super) cells: Vec<u16>,
    pub(super) min_correspondence_cost: f32,
    pub(super) max_correspondence_cost: f32,
    /// Flat indices touched since the last `finish_update`.
    pub(super) update_indices: Vec<usize>,
    pub(super) known_cells_box: Option<CellBox>,
    pub(super) conversion_table: ConversionTable,
}

impl Grid2D {
    /// Create an all-unknown grid.
    ///
    /// Unknown cells decode to `max_correspondence_cost`.
    pub fn new(
        limits: MapLimits,
        min_correspondence_cost: f32,
        max_correspondence_cost: f32,
        tables: &ValueConversionTables,
    ) -> Self {
        assert!(
            min_correspondence_cost < max_correspondence_cost,
            "value bounds must be ordered"
        );
        Self {
            cells: vec![UNKNOWN_CORRESPONDENCE_VALUE; limits.cell_limits().cell_count()],
            limits,
            min_correspondence_cost,
            max_correspondence_cost,
            update_indices: Vec::new(),
            known_cells_box: None,
            conversion_table: tables.conversion_table(
                max_correspondence_cost,
                min_correspondence_cost,
                max_correspondence_cost,
            ),
        }
    }

    /// Rebuild a grid from stored cells and their known box.
    pub(crate) fn from_cells(
        limits: MapLimits,
        cells: Vec<u16>,
        known_cells_box: Option<CellBox>,
        min_correspondence_cost: f32,
        max_correspondence_cost: f32,
        tables: &ValueConversionTables,
    ) -> Self {
        let mut grid = Self::new(
            limits,
            min_correspondence_cost,
            max_correspondence_cost,
            tables,
        );
        assert_eq!(cells.len(), grid.cells.len(), "cell count must match limits");
        grid.cells = cells;
        grid.known_cells_box = known_cells_box;
        grid
    }

    // === Basic Properties ===

    /// Resolution, origin and size.
    #[inline]
    pub fn limits(&self) -> &MapLimits {
        &self.limits
    }

    /// Lower decode bound.
    #[inline]
    pub fn min_correspondence_cost(&self) -> f32 {
        self.min_correspondence_cost
    }

    /// Upper decode bound; also what unknown cells decode to.
    #[inline]
    pub fn max_correspondence_cost(&self) -> f32 {
        self.max_correspondence_cost
    }

    /// Bounding box of every cell ever written, or `None` if none was.
    #[inline]
    pub fn known_cells_box(&self) -> Option<CellBox> {
        self.known_cells_box
    }

    /// Raw encoded cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    /// Number of flat indices awaiting `finish_update`.
    #[inline]
    pub fn pending_update_count(&self) -> usize {
        self.update_indices.len()
    }

    // === Cell Access ===

    /// Row-major index of a cell.
    ///
    /// # Panics
    ///
    /// If `cell` lies outside the limits.
    #[inline]
    pub fn to_flat_index(&self, cell: GridCoord) -> usize {
        assert!(
            self.limits.contains(cell),
            "cell ({}, {}) outside grid limits",
            cell.x,
            cell.y
        );
        cell.y as usize * self.limits.cell_limits().num_x_cells + cell.x as usize
    }

    /// Decoded value of a cell. Out-of-limits and unknown cells yield the
    /// upper bound.
    #[inline]
    pub fn get_correspondence_cost(&self, cell: GridCoord) -> f32 {
        if !self.limits.contains(cell) {
            return self.max_correspondence_cost;
        }
        self.conversion_table[self.cells[self.to_flat_index(cell)] as usize]
    }

    /// Has the cell ever been written?
    #[inline]
    pub fn is_known(&self, cell: GridCoord) -> bool {
        self.limits.contains(cell)
            && self.cells[self.to_flat_index(cell)] != UNKNOWN_CORRESPONDENCE_VALUE
    }

    // === Update Cycle ===

    /// Record a write to a flat index within the current update.
    #[inline]
    pub(super) fn mark_updated(&mut self, index: usize, cell: GridCoord) {
        self.update_indices.push(index);
        extend_box(&mut self.known_cells_box, cell);
    }

    /// Strip the update marker from every cell touched since the last call.
    ///
    /// Calling it twice in a row is a no-op.
    pub fn finish_update(&mut self) {
        for index in self.update_indices.drain(..) {
            debug_assert!(self.cells[index] >= UPDATE_MARKER);
            self.cells[index] &= !UPDATE_MARKER;
        }
    }

    // === Growth ===

    /// Grow until `point` lies inside the limits.
    pub fn grow_limits(&mut self, point: WorldPoint) {
        self.grow_limits_with(point, &mut []);
    }

    /// Grow until `point` lies inside the limits, remapping `extra` arrays
    /// that share this grid's layout.
    ///
    /// Each step doubles both axes and places the old content at offset
    /// `(num_x_cells / 2, num_y_cells / 2)`, keeping it centered. The origin
    /// and the known-cells box move with it, so every known cell keeps its
    /// world position and value.
    ///
    /// # Panics
    ///
    /// If growth is needed while an update is in progress, or if `point` is
    /// not finite.
    pub(super) fn grow_limits_with(&mut self, point: WorldPoint, extra: &mut [&mut Vec<u16>]) {
        assert!(
            point.x.is_finite() && point.y.is_finite(),
            "cannot grow grid to a non-finite point"
        );
        while !self.limits.contains(self.limits.cell_index(point)) {
            assert!(
                self.update_indices.is_empty(),
                "grid cannot grow while an update is in progress"
            );
            let old = self.limits.cell_limits();
            let (grown, offset) = self.limits.doubled();

            self.cells = remap_cells(&self.cells, old, grown.cell_limits(), offset);
            for cells in extra.iter_mut() {
                let remapped = remap_cells(cells.as_slice(), old, grown.cell_limits(), offset);
                **cells = remapped;
            }
            if let Some(known) = self.known_cells_box.as_mut() {
                known.translate(offset);
            }
            self.limits = grown;

            log::debug!(
                "Grid grown to {}x{} cells, origin ({:.2}, {:.2})",
                grown.cell_limits().num_x_cells,
                grown.cell_limits().num_y_cells,
                grown.origin().x,
                grown.origin().y
            );
        }
    }

    // === Cropping ===

    /// Offset and size of the smallest region holding every known cell.
    ///
    /// An empty grid yields offset `(0, 0)` and a 1×1 region.
    pub fn compute_cropped_limits(&self) -> (GridCoord, CellLimits) {
        match self.known_cells_box {
            None => (GridCoord::new(0, 0), CellLimits::new(1, 1)),
            Some(known) => (known.min, known.cell_limits()),
        }
    }

    /// Copy of the cropped region, plus the same region of each `extra`
    /// array. Update markers are not carried over.
    pub(super) fn cropped(&self, extra: &[&[u16]]) -> (Grid2D, Vec<Vec<u16>>) {
        let (offset, cell_limits) = self.compute_cropped_limits();
        let resolution = self.limits.resolution();
        let origin = self.limits.origin();
        let limits = MapLimits::new(
            resolution,
            WorldPoint::new(
                origin.x + offset.x as f32 * resolution,
                origin.y + offset.y as f32 * resolution,
            ),
            cell_limits,
        );
        let crop = |source: &[u16]| -> Vec<u16> {
            cell_limits
                .iter()
                .map(|cell| source[self.to_flat_index(cell + offset)] & !UPDATE_MARKER)
                .collect()
        };

        let mut grid = Grid2D {
            limits,
            cells: crop(self.cells.as_slice()),
            min_correspondence_cost: self.min_correspondence_cost,
            max_correspondence_cost: self.max_correspondence_cost,
            update_indices: Vec::new(),
            known_cells_box: None,
            conversion_table: self.conversion_table.clone(),
        };
        grid.recompute_known_cells_box();
        let extra = extra.iter().map(|source| crop(*source)).collect();
        (grid, extra)
    }

    fn recompute_known_cells_box(&mut self) {
        self.known_cells_box = None;
        for cell in self.limits.cell_limits().iter() {
            if self.cells[self.to_flat_index(cell)] != UNKNOWN_CORRESPONDENCE_VALUE {
                extend_box(&mut self.known_cells_box, cell);
            }
        }
    }
}

/// Copy `cells` row by row into a larger, all-unknown array.
fn remap_cells(cells: &[u16], old: CellLimits, new: CellLimits, offset: GridCoord) -> Vec<u16> {
    let mut grown = vec![UNKNOWN_CORRESPONDENCE_VALUE; new.cell_count()];
    let (ox, oy) = (offset.x as usize, offset.y as usize);
    for y in 0..old.num_y_cells {
        let src = y * old.num_x_cells;
        let dst = (y + oy) * new.num_x_cells + ox;
        grown[dst..dst + old.num_x_cells].copy_from_slice(&cells[src..src + old.num_x_cells]);
    }
    grown
}
