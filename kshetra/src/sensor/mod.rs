//! Sensor input handling.
//!
//! - [`RangeDataCollator`]: Merges batches from several range sensors into
//!   time-ordered windows before they reach the submaps.

mod collator;

pub use collator::RangeDataCollator;
