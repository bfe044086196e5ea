//! Serializable submap snapshots.
//!
//! A snapshot always carries the grid metadata. Encoded cells are optional:
//! consumers that already hold a submap can request metadata only. Restoring
//! from a snapshot with cells reproduces the encoded cells bit for bit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::WorldPoint;
use crate::grid::{
    CellBox, Grid, GridType, MapLimits, ProbabilityGrid, TsdfGrid, ValueConversionTables,
};

use super::types::SubmapId;

/// Snapshot restore error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Snapshot was taken without grid cells
    #[error("snapshot carries no grid cells")]
    MissingGrid,

    /// Cell array length does not match the limits
    #[error("cell count mismatch: limits need {expected}, snapshot has {actual}")]
    CellCountMismatch {
        /// Cells implied by the limits.
        expected: usize,
        /// Cells present in the snapshot.
        actual: usize,
    },

    /// Snapshot grid kind differs from the target grid
    #[error("grid type mismatch: expected {expected:?}, snapshot has {actual:?}")]
    GridTypeMismatch {
        /// Kind of the grid being updated.
        expected: GridType,
        /// Kind stored in the snapshot.
        actual: GridType,
    },

    /// Resolution, origin or cell counts cannot describe a grid
    #[error("invalid grid limits: {0}")]
    InvalidLimits(&'static str),

    /// Value bounds are not finite and ordered
    #[error("invalid value bounds: {0}")]
    InvalidBounds(&'static str),

    /// Known-cells box is inverted or reaches outside the limits
    #[error("known cells box {0:?} does not fit the limits")]
    KnownCellsBoxOutOfLimits(CellBox),

    /// Target submap is finished and no longer changes
    #[error("{0} is finished")]
    SubmapFinished(SubmapId),
}

/// TSDF-specific grid data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TsdfSnapshot {
    /// Truncation distance (meters).
    pub truncation_distance: f32,
    /// Upper weight bound.
    pub max_weight: f32,
    /// Encoded weights, present when cells are.
    #[serde(default)]
    pub weight_cells: Option<Vec<u16>>,
}

/// Grid metadata and optional encoded cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Grid kind.
    pub grid_type: GridType,
    /// Resolution, origin and size.
    pub limits: MapLimits,
    /// Lower decode bound.
    pub min_correspondence_cost: f32,
    /// Upper decode bound.
    pub max_correspondence_cost: f32,
    /// Bounding box of known cells.
    pub known_cells_box: Option<CellBox>,
    /// Row-major encoded cells without update markers.
    #[serde(default)]
    pub cells: Option<Vec<u16>>,
    /// Present for TSDF grids.
    #[serde(default)]
    pub tsdf: Option<TsdfSnapshot>,
}

impl GridSnapshot {
    /// Capture `grid`, with cells if `include_cells`.
    pub fn from_grid(grid: &Grid, include_cells: bool) -> Self {
        let base = grid.base();
        let tsdf = grid.as_tsdf().map(|tsdf| TsdfSnapshot {
            truncation_distance: tsdf.truncation_distance(),
            max_weight: tsdf.max_weight(),
            weight_cells: include_cells.then(|| tsdf.weight_cells().to_vec()),
        });
        Self {
            grid_type: grid.grid_type(),
            limits: *base.limits(),
            min_correspondence_cost: base.min_correspondence_cost(),
            max_correspondence_cost: base.max_correspondence_cost(),
            known_cells_box: base.known_cells_box(),
            cells: include_cells.then(|| base.cells().to_vec()),
            tsdf,
        }
    }

    /// Does the snapshot carry encoded cells?
    #[inline]
    pub fn has_cells(&self) -> bool {
        self.cells.is_some()
    }

    /// Rebuild the grid.
    ///
    /// Limits, value bounds and the known-cells box are checked before any
    /// cell is copied.
    pub fn to_grid(&self, tables: &ValueConversionTables) -> Result<Grid, SnapshotError> {
        let cells = self.cells.as_ref().ok_or(SnapshotError::MissingGrid)?;
        let expected = check_limits(&self.limits)?;
        check_count(expected, cells.len())?;
        check_bounds(self.min_correspondence_cost, self.max_correspondence_cost)?;
        if let Some(known) = self.known_cells_box {
            check_known_cells_box(&self.limits, known)?;
        }

        match self.grid_type {
            GridType::Probability => Ok(ProbabilityGrid::from_cells(
                self.limits,
                cells.clone(),
                self.known_cells_box,
                tables,
            )
            .into()),
            GridType::Tsdf => {
                let tsdf = self.tsdf.as_ref().ok_or(SnapshotError::MissingGrid)?;
                let weights = tsdf
                    .weight_cells
                    .as_ref()
                    .ok_or(SnapshotError::MissingGrid)?;
                check_count(expected, weights.len())?;
                if !tsdf.truncation_distance.is_finite() || tsdf.truncation_distance <= 0.0 {
                    return Err(SnapshotError::InvalidBounds(
                        "truncation_distance must be finite and > 0",
                    ));
                }
                if !tsdf.max_weight.is_finite() || tsdf.max_weight <= 0.0 {
                    return Err(SnapshotError::InvalidBounds(
                        "max_weight must be finite and > 0",
                    ));
                }
                Ok(TsdfGrid::from_cells(
                    self.limits,
                    cells.clone(),
                    weights.clone(),
                    self.known_cells_box,
                    tsdf.truncation_distance,
                    tsdf.max_weight,
                    tables,
                )
                .into())
            }
        }
    }
}

/// Returns the cell count the limits imply.
fn check_limits(limits: &MapLimits) -> Result<usize, SnapshotError> {
    let resolution = limits.resolution();
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(SnapshotError::InvalidLimits(
            "resolution must be finite and > 0",
        ));
    }
    if !limits.origin().is_finite() {
        return Err(SnapshotError::InvalidLimits("origin must be finite"));
    }
    let cell_limits = limits.cell_limits();
    if cell_limits.num_x_cells == 0 || cell_limits.num_y_cells == 0 {
        return Err(SnapshotError::InvalidLimits(
            "grid must have at least one cell",
        ));
    }
    if cell_limits.num_x_cells > i32::MAX as usize || cell_limits.num_y_cells > i32::MAX as usize
    {
        return Err(SnapshotError::InvalidLimits("cell counts overflow"));
    }
    cell_limits
        .num_x_cells
        .checked_mul(cell_limits.num_y_cells)
        .ok_or(SnapshotError::InvalidLimits("cell counts overflow"))
}

fn check_bounds(min: f32, max: f32) -> Result<(), SnapshotError> {
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(SnapshotError::InvalidBounds(
            "correspondence cost bounds must be finite and ordered",
        ));
    }
    Ok(())
}

fn check_known_cells_box(limits: &MapLimits, known: CellBox) -> Result<(), SnapshotError> {
    let ordered = known.min.x <= known.max.x && known.min.y <= known.max.y;
    if !(ordered && limits.contains(known.min) && limits.contains(known.max)) {
        return Err(SnapshotError::KnownCellsBoxOutOfLimits(known));
    }
    Ok(())
}

fn check_count(expected: usize, actual: usize) -> Result<(), SnapshotError> {
    if expected != actual {
        return Err(SnapshotError::CellCountMismatch { expected, actual });
    }
    Ok(())
}

/// Transferable state of one submap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmapSnapshot {
    /// Submap identifier.
    pub id: SubmapId,
    /// Submap origin in the local map frame.
    pub origin: WorldPoint,
    /// Batches inserted.
    pub num_range_data: usize,
    /// Was the submap finished when captured?
    pub finished: bool,
    /// Grid metadata and optional cells.
    pub grid: GridSnapshot,
}
