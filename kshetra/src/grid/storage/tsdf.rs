//! Truncated signed distance grid.

use std::ops::Deref;

use crate::core::{GridCoord, WorldPoint};
use crate::grid::limits::{CellBox, MapLimits};
use crate::grid::tables::{ConversionTable, ValueConversionTables};
use crate::grid::values::{UNKNOWN_CORRESPONDENCE_VALUE, UPDATE_MARKER, bounded_float_to_value};

use super::core::Grid2D;

/// Grid of truncated signed distances with per-cell weights.
///
/// Distances are encoded in `[-truncation, truncation]` in the shared cell
/// array; unknown cells read as `truncation`. Weights live in a second array
/// with bounds `[0, max_weight]`; unknown cells have weight `0`.
#[derive(Clone, Debug)]
pub struct TsdfGrid {
    grid: Grid2D,
    weight_cells: Vec<u16>,
    truncation_distance: f32,
    max_weight: f32,
    weight_table: ConversionTable,
}

impl TsdfGrid {
    /// Create an all-unknown TSDF grid.
    pub fn new(
        limits: MapLimits,
        truncation_distance: f32,
        max_weight: f32,
        tables: &ValueConversionTables,
    ) -> Self {
        assert!(truncation_distance > 0.0, "truncation distance must be positive");
        assert!(max_weight > 0.0, "max weight must be positive");
        let grid = Grid2D::new(limits, -truncation_distance, truncation_distance, tables);
        Self {
            weight_cells: vec![UNKNOWN_CORRESPONDENCE_VALUE; grid.cells().len()],
            grid,
            truncation_distance,
            max_weight,
            weight_table: tables.conversion_table(0.0, 0.0, max_weight),
        }
    }

    /// Rebuild from stored distance and weight cells.
    pub(crate) fn from_cells(
        limits: MapLimits,
        cells: Vec<u16>,
        weight_cells: Vec<u16>,
        known_cells_box: Option<CellBox>,
        truncation_distance: f32,
        max_weight: f32,
        tables: &ValueConversionTables,
    ) -> Self {
        let grid = Grid2D::from_cells(
            limits,
            cells,
            known_cells_box,
            -truncation_distance,
            truncation_distance,
            tables,
        );
        assert_eq!(
            weight_cells.len(),
            grid.cells().len(),
            "weight count must match limits"
        );
        Self {
            grid,
            weight_cells,
            truncation_distance,
            max_weight,
            weight_table: tables.conversion_table(0.0, 0.0, max_weight),
        }
    }

    /// Distance at which observations are truncated.
    #[inline]
    pub fn truncation_distance(&self) -> f32 {
        self.truncation_distance
    }

    /// Upper weight bound.
    #[inline]
    pub fn max_weight(&self) -> f32 {
        self.max_weight
    }

    /// Raw encoded weights in row-major order.
    #[inline]
    pub fn weight_cells(&self) -> &[u16] {
        &self.weight_cells
    }

    /// Write distance and weight to a cell.
    ///
    /// Returns `false` without touching the cell if it was already updated
    /// since the last `finish_update`.
    pub fn set_cell(&mut self, cell: GridCoord, tsd: f32, weight: f32) -> bool {
        let index = self.grid.to_flat_index(cell);
        if self.grid.cells[index] >= UPDATE_MARKER {
            return false;
        }
        self.grid.cells[index] = bounded_float_to_value(
            tsd,
            -self.truncation_distance,
            self.truncation_distance,
        ) | UPDATE_MARKER;
        self.weight_cells[index] = bounded_float_to_value(weight, 0.0, self.max_weight);
        self.grid.mark_updated(index, cell);
        true
    }

    /// Signed distance; unknown and out-of-limits cells read as the
    /// truncation distance.
    #[inline]
    pub fn get_tsd(&self, cell: GridCoord) -> f32 {
        self.grid.get_correspondence_cost(cell)
    }

    /// Weight; unknown and out-of-limits cells read as `0`.
    #[inline]
    pub fn get_weight(&self, cell: GridCoord) -> f32 {
        if !self.grid.limits().contains(cell) {
            return 0.0;
        }
        self.weight_table[self.weight_cells[self.grid.to_flat_index(cell)] as usize]
    }

    /// Signed distance and weight together.
    #[inline]
    pub fn get_tsd_and_weight(&self, cell: GridCoord) -> (f32, f32) {
        (self.get_tsd(cell), self.get_weight(cell))
    }

    /// Strip update markers.
    #[inline]
    pub fn finish_update(&mut self) {
        self.grid.finish_update();
    }

    /// Grow both cell arrays until `point` lies inside the limits.
    pub fn grow_limits(&mut self, point: WorldPoint) {
        self.grid
            .grow_limits_with(point, &mut [&mut self.weight_cells]);
    }

    /// Copy of the smallest region holding every known cell.
    pub fn compute_cropped_grid(&self) -> TsdfGrid {
        let (grid, mut extra) = self.grid.cropped(&[self.weight_cells.as_slice()]);
        Self {
            grid,
            weight_cells: extra.swap_remove(0),
            truncation_distance: self.truncation_distance,
            max_weight: self.max_weight,
            weight_table: self.weight_table.clone(),
        }
    }

    /// Shared grid storage.
    #[inline]
    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }
}

impl Deref for TsdfGrid {
    type Target = Grid2D;

    fn deref(&self) -> &Grid2D {
        &self.grid
    }
}
