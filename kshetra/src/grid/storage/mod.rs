//! Growable grid storage.
//!
//! Every grid shares one row-major array of 16-bit cells:
//!
//! ```text
//!  bit 15          bits 14..0
//! ┌───────┬───────────────────────────┐
//! │marker │ value (0 = unknown)       │
//! └───────┴───────────────────────────┘
//! ```
//!
//! The marker is set on every cell written during an insertion and stripped
//! by `finish_update`, so one batch can update each cell at most once.
//!
//! ## Key Types
//!
//! - [`Grid2D`]: Shared storage, limits, known-cells box and growth
//! - [`ProbabilityGrid`]: Occupancy stored as correspondence cost
//! - [`TsdfGrid`]: Truncated signed distance plus weights
//! - [`Grid`]: Variant chosen per submap by [`GridType`]

mod core;
mod probability;
mod tsdf;

use serde::{Deserialize, Serialize};

pub use self::core::Grid2D;
pub use probability::ProbabilityGrid;
pub use tsdf::TsdfGrid;

use crate::core::{GridCoord, WorldPoint};

use super::limits::{CellBox, CellLimits, MapLimits};

/// Which grid a submap stores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridType {
    /// Occupancy probabilities.
    #[default]
    Probability,
    /// Truncated signed distances.
    Tsdf,
}

/// A submap grid of either kind.
#[derive(Clone, Debug)]
pub enum Grid {
    /// Occupancy probability grid.
    Probability(ProbabilityGrid),
    /// Truncated signed distance grid.
    Tsdf(TsdfGrid),
}

impl Grid {
    /// Kind of this grid.
    pub fn grid_type(&self) -> GridType {
        match self {
            Grid::Probability(_) => GridType::Probability,
            Grid::Tsdf(_) => GridType::Tsdf,
        }
    }

    /// Shared storage.
    pub fn base(&self) -> &Grid2D {
        match self {
            Grid::Probability(grid) => grid.grid(),
            Grid::Tsdf(grid) => grid.grid(),
        }
    }

    /// Resolution, origin and size.
    #[inline]
    pub fn limits(&self) -> &MapLimits {
        self.base().limits()
    }

    /// Bounding box of known cells.
    #[inline]
    pub fn known_cells_box(&self) -> Option<CellBox> {
        self.base().known_cells_box()
    }

    /// Decoded cell value; see [`Grid2D::get_correspondence_cost`].
    #[inline]
    pub fn get_correspondence_cost(&self, cell: GridCoord) -> f32 {
        self.base().get_correspondence_cost(cell)
    }

    /// Has the cell ever been written?
    #[inline]
    pub fn is_known(&self, cell: GridCoord) -> bool {
        self.base().is_known(cell)
    }

    /// Strip update markers.
    pub fn finish_update(&mut self) {
        match self {
            Grid::Probability(grid) => grid.finish_update(),
            Grid::Tsdf(grid) => grid.finish_update(),
        }
    }

    /// Grow until `point` lies inside the limits.
    pub fn grow_limits(&mut self, point: WorldPoint) {
        match self {
            Grid::Probability(grid) => grid.grow_limits(point),
            Grid::Tsdf(grid) => grid.grow_limits(point),
        }
    }

    /// Offset and size of the region holding every known cell.
    #[inline]
    pub fn compute_cropped_limits(&self) -> (GridCoord, CellLimits) {
        self.base().compute_cropped_limits()
    }

    /// Copy of the smallest region holding every known cell.
    pub fn compute_cropped_grid(&self) -> Grid {
        match self {
            Grid::Probability(grid) => Grid::Probability(grid.compute_cropped_grid()),
            Grid::Tsdf(grid) => Grid::Tsdf(grid.compute_cropped_grid()),
        }
    }

    /// The probability grid, if this is one.
    pub fn as_probability(&self) -> Option<&ProbabilityGrid> {
        match self {
            Grid::Probability(grid) => Some(grid),
            Grid::Tsdf(_) => None,
        }
    }

    /// Mutable probability grid, if this is one.
    pub fn as_probability_mut(&mut self) -> Option<&mut ProbabilityGrid> {
        match self {
            Grid::Probability(grid) => Some(grid),
            Grid::Tsdf(_) => None,
        }
    }

    /// The TSDF grid, if this is one.
    pub fn as_tsdf(&self) -> Option<&TsdfGrid> {
        match self {
            Grid::Tsdf(grid) => Some(grid),
            Grid::Probability(_) => None,
        }
    }

    /// Mutable TSDF grid, if this is one.
    pub fn as_tsdf_mut(&mut self) -> Option<&mut TsdfGrid> {
        match self {
            Grid::Tsdf(grid) => Some(grid),
            Grid::Probability(_) => None,
        }
    }
}

impl From<ProbabilityGrid> for Grid {
    fn from(grid: ProbabilityGrid) -> Self {
        Grid::Probability(grid)
    }
}

impl From<TsdfGrid> for Grid {
    fn from(grid: TsdfGrid) -> Self {
        Grid::Tsdf(grid)
    }
}
