//! Operation modes built on top of the mapping components.
//!
//! # Available Modes
//!
//! | Mode | Input | Output |
//! |------|-------|--------|
//! | [`LocalMapBuilder`] | Per-sensor point clouds | Live and finished submaps |
//!
//! # Local Mapping
//!
//! ```ignore
//! use kshetra::config::MapperConfig;
//! use kshetra::grid::ValueConversionTables;
//! use kshetra::modes::LocalMapBuilder;
//!
//! let config = MapperConfig::load_default()?;
//! let mut builder = LocalMapBuilder::new(config.local_map, ValueConversionTables::global());
//!
//! if let Some(result) = builder.add_range_data("scan", cloud) {
//!     if let Some(submap) = result.finished {
//!         println!("{} finished", submap.id());
//!     }
//! }
//! ```

mod mapping;

pub use mapping::{InsertionResult, LocalMapBuilder, LocalMapBuilderConfig};
