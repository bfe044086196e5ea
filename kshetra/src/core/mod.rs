//! Core types shared by every layer of the local mapping pipeline.
//!
//! ## Type Categories
//!
//! ### Coordinates
//! - [`GridCoord`]: Integer cell indices for grid access
//! - [`WorldPoint`]: Floating-point local map coordinates in meters
//!
//! ### Sensor Data
//! - [`TimedPoint`], [`TimedPointCloud`]: Per-sensor batches with relative point times
//! - [`MergedRangeData`], [`RangeMeasurement`]: Time-synchronized output of the collator
//! - [`RangeData`]: Origin, returns and misses ready for grid insertion

mod point;
mod sensors;

pub use point::{GridCoord, WorldPoint};
pub use sensors::{
    DEFAULT_INTENSITY, MergedRangeData, RangeData, RangeMeasurement, TimedPoint, TimedPointCloud,
    seconds_to_us, us_to_seconds,
};
