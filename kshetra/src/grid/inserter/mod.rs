//! Range data insertion into submap grids.
//!
//! ```text
//!  RangeData { origin, returns, misses }
//!        │
//!        ▼
//!  grow grid to cover every endpoint
//!        │
//!        ├─ probability: hit table at returns, miss table along rays
//!        └─ tsdf:        weighted distance average inside the truncation band
//!        │
//!        ▼
//!  finish_update (strip markers)
//! ```
//!
//! Each cell is updated at most once per batch; the update marker on the
//! cell enforces it.

mod probability;
mod tsdf;

use std::fmt::Debug;

pub use probability::ProbabilityGridRangeDataInserter;
pub use tsdf::TsdfRangeDataInserter;

use crate::core::{RangeData, WorldPoint};

use super::config::{ProbabilityInserterConfig, TsdfInserterConfig};
use super::storage::{Grid, GridType};
use super::tables::ValueConversionTables;

/// Writes one batch of range data into a grid.
pub trait RangeDataInserter: Debug + Send + Sync {
    /// Insert `range_data` into `grid`.
    ///
    /// # Panics
    ///
    /// If `grid` is not the variant this inserter writes, or if any point
    /// is NaN or infinite.
    fn insert(&self, range_data: &RangeData, grid: &mut Grid);
}

/// Inserter for the given grid kind.
pub fn create_inserter(
    grid_type: GridType,
    probability: &ProbabilityInserterConfig,
    tsdf: &TsdfInserterConfig,
    tables: &ValueConversionTables,
) -> Box<dyn RangeDataInserter> {
    match grid_type {
        GridType::Probability => {
            Box::new(ProbabilityGridRangeDataInserter::new(probability, tables))
        }
        GridType::Tsdf => Box::new(TsdfRangeDataInserter::new(tsdf.clone())),
    }
}

/// Grow `grid` to cover the origin and every endpoint plus `padding` meters.
///
/// # Panics
///
/// If any point of `range_data` is NaN or infinite.
fn grow_as_needed(range_data: &RangeData, grid: &mut Grid, padding: f32) {
    assert!(
        range_data.is_finite(),
        "range data contains non-finite points"
    );
    let (min, max) = range_data.bounds();
    let padding = WorldPoint::new(padding, padding);
    grid.grow_limits(min - padding);
    grid.grow_limits(max + padding);
}
