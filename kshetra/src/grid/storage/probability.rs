//! Occupancy probability grid.

use std::ops::Deref;

use crate::core::{GridCoord, WorldPoint};
use crate::grid::limits::{CellBox, MapLimits, extend_box};
use crate::grid::tables::ValueConversionTables;
use crate::grid::values::{
    MAX_CORRESPONDENCE_COST, MIN_CORRESPONDENCE_COST, UNKNOWN_CORRESPONDENCE_VALUE,
    UPDATE_MARKER, VALUE_COUNT, correspondence_cost_to_probability, correspondence_cost_to_value,
    probability_to_correspondence_cost,
};

use super::core::Grid2D;

/// Grid whose cells store occupancy as encoded correspondence cost
/// (`1 - probability`).
#[derive(Clone, Debug)]
pub struct ProbabilityGrid {
    grid: Grid2D,
}

impl ProbabilityGrid {
    /// Create an all-unknown probability grid.
    pub fn new(limits: MapLimits, tables: &ValueConversionTables) -> Self {
        Self {
            grid: Grid2D::new(
                limits,
                MIN_CORRESPONDENCE_COST,
                MAX_CORRESPONDENCE_COST,
                tables,
            ),
        }
    }

    /// Rebuild from stored cells.
    pub(crate) fn from_cells(
        limits: MapLimits,
        cells: Vec<u16>,
        known_cells_box: Option<CellBox>,
        tables: &ValueConversionTables,
    ) -> Self {
        Self {
            grid: Grid2D::from_cells(
                limits,
                cells,
                known_cells_box,
                MIN_CORRESPONDENCE_COST,
                MAX_CORRESPONDENCE_COST,
                tables,
            ),
        }
    }

    /// Set the probability of an unknown cell.
    ///
    /// # Panics
    ///
    /// If the cell is outside the limits or already known.
    pub fn set_probability(&mut self, cell: GridCoord, probability: f32) {
        let index = self.grid.to_flat_index(cell);
        assert_eq!(
            self.grid.cells[index], UNKNOWN_CORRESPONDENCE_VALUE,
            "set_probability on a known cell ({}, {})",
            cell.x, cell.y
        );
        self.grid.cells[index] =
            correspondence_cost_to_value(probability_to_correspondence_cost(probability));
        extend_box(&mut self.grid.known_cells_box, cell);
    }

    /// Apply an update table to a cell.
    ///
    /// Returns `false` without touching the cell if it was already updated
    /// since the last [`finish_update`](Grid2D::finish_update).
    ///
    /// # Panics
    ///
    /// If the table does not have one entry per 15-bit value, or the cell is
    /// outside the limits.
    pub fn apply_lookup_table(&mut self, cell: GridCoord, table: &[u16]) -> bool {
        assert_eq!(table.len(), VALUE_COUNT, "update table must cover every value");
        let index = self.grid.to_flat_index(cell);
        let value = self.grid.cells[index];
        if value >= UPDATE_MARKER {
            return false;
        }
        self.grid.cells[index] = table[value as usize];
        debug_assert!(self.grid.cells[index] >= UPDATE_MARKER);
        self.grid.mark_updated(index, cell);
        true
    }

    /// Occupancy probability; out-of-limits and unknown cells yield the
    /// minimum probability.
    #[inline]
    pub fn get_probability(&self, cell: GridCoord) -> f32 {
        correspondence_cost_to_probability(self.grid.get_correspondence_cost(cell))
    }

    /// Strip update markers; see [`Grid2D::finish_update`].
    #[inline]
    pub fn finish_update(&mut self) {
        self.grid.finish_update();
    }

    /// Grow until `point` lies inside the limits.
    #[inline]
    pub fn grow_limits(&mut self, point: WorldPoint) {
        self.grid.grow_limits(point);
    }

    /// Copy of the smallest region holding every known cell.
    pub fn compute_cropped_grid(&self) -> ProbabilityGrid {
        let (grid, _) = self.grid.cropped(&[]);
        Self { grid }
    }

    /// Shared grid storage.
    #[inline]
    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }
}

impl Deref for ProbabilityGrid {
    type Target = Grid2D;

    fn deref(&self) -> &Grid2D {
        &self.grid
    }
}
