//! # kshetra
//!
//! 2D local mapping: multi-sensor range data synchronization, fixed-point
//! occupancy grids and double-buffered submaps.
//!
//! ## Overview
//!
//! ```text
//! per-sensor point clouds
//!        │
//!        ▼
//! RangeDataCollator ──▶ MergedRangeData ──▶ range filter ──▶ RangeData
//!                                                               │
//!                                                               ▼
//!                                    ActiveSubmaps (old + new) ─┤
//!                                                               ▼
//!                              Grid (u16 cells, lookup-table updates)
//! ```
//!
//! - **Value Model**: probabilities and correspondence costs encoded in 15
//!   bits, decoded and updated through precomputed tables
//! - **Grid**: dense growable cell array with a known-cells bounding box
//! - **Sensor Synchronizer**: windowed merge of asynchronous sensor batches
//! - **Submaps**: a grid at a fixed origin; two are live at a time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kshetra::{LocalMapBuilder, MapperConfig, TimedPointCloud, ValueConversionTables};
//!
//! let config = MapperConfig::load_default()?;
//! let mut builder = LocalMapBuilder::new(config.local_map, ValueConversionTables::global());
//!
//! let cloud = TimedPointCloud::new(timestamp_us, origin, points);
//! if let Some(result) = builder.add_range_data("scan", cloud) {
//!     println!("{} live submaps", result.submaps.len());
//! }
//! ```
//!
//! ## Coordinate System
//!
//! All positions are in the local map frame, in meters. Cell `(x, y)` covers
//! `[origin + x * resolution, origin + (x + 1) * resolution)` on each axis.

#![warn(missing_docs)]

// Core types
pub mod core;

// Value model, grid storage and range data insertion
pub mod grid;

// Multi-sensor synchronization
pub mod sensor;

// Submaps and their lifecycle
pub mod submap;

// YAML configuration
pub mod config;

// Local mapping pipeline
pub mod modes;

// Re-export commonly used types
pub use core::{GridCoord, MergedRangeData, RangeData, TimedPoint, TimedPointCloud, WorldPoint};

pub use config::{ConfigLoadError, MapperConfig};
pub use grid::{Grid, GridType, MapLimits, ProbabilityGrid, TsdfGrid, ValueConversionTables};
pub use modes::{LocalMapBuilder, LocalMapBuilderConfig};
pub use sensor::RangeDataCollator;
pub use submap::{ActiveSubmaps, Submap, SubmapConfig, SubmapId, SubmapSnapshot};
