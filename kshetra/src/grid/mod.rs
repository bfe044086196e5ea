//! Submap grids and the value model behind them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        RangeData                            │
//! │            origin │ returns (hits) │ misses                 │
//! └─────────────────────────────┬───────────────────────────────┘
//!                               ▼
//!                 ┌───────────────────────────┐
//!                 │     RangeDataInserter     │
//!                 │  probability │ tsdf       │
//!                 └─────────────┬─────────────┘
//!                               ▼
//!                 ┌───────────────────────────┐      ┌──────────────────────┐
//!                 │   Grid (Probability/Tsdf) │◀─────│ ValueConversionTables│
//!                 │   Grid2D: u16 cells       │      │ decode + update LUTs │
//!                 └───────────────────────────┘      └──────────────────────┘
//! ```
//!
//! ## Key Components
//!
//! - [`values`]: Fixed-point encoding of bounded floats into 15 bits
//! - [`ValueConversionTables`]: Shared, lazily built decode and update tables
//! - [`MapLimits`], [`CellLimits`], [`CellBox`]: Grid extents
//! - [`Grid2D`], [`ProbabilityGrid`], [`TsdfGrid`], [`Grid`]: Storage
//! - [`RangeDataInserter`]: Writes range data into a grid
//! - [`raycaster`]: Bresenham traversal used by the inserters
//!
//! ## Value Model
//!
//! ```text
//! value = round((clamp(x) - lower) * 32766 / (upper - lower)) + 1   # 1..=32767
//! x     = value * scale + (lower - scale),  scale = (upper - lower) / 32766
//!
//! value 0 → unknown
//! bit 15  → updated in the current batch
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use kshetra::core::{RangeData, WorldPoint};
//! use kshetra::grid::{
//!     GridConfig, ProbabilityGrid, ProbabilityGridRangeDataInserter, ProbabilityInserterConfig,
//!     RangeDataInserter, ValueConversionTables,
//! };
//!
//! let tables = ValueConversionTables::global();
//! let limits = GridConfig::default().initial_limits(WorldPoint::ZERO);
//! let mut grid = ProbabilityGrid::new(limits, &tables).into();
//!
//! let inserter = ProbabilityGridRangeDataInserter::new(&ProbabilityInserterConfig::default(), &tables);
//! inserter.insert(&RangeData::new(WorldPoint::ZERO, vec![WorldPoint::new(1.0, 0.0)]), &mut grid);
//! ```

mod config;
pub mod inserter;
mod limits;
pub mod raycaster;
mod storage;
mod tables;
pub mod values;

pub use config::{GridConfig, ProbabilityInserterConfig, TsdfInserterConfig};
pub use inserter::{
    ProbabilityGridRangeDataInserter, RangeDataInserter, TsdfRangeDataInserter, create_inserter,
};
pub use limits::{CellBox, CellLimits, MapLimits};
pub use storage::{Grid, Grid2D, GridType, ProbabilityGrid, TsdfGrid};
pub use tables::{ConversionTable, LookupTable, ValueConversionTables};
