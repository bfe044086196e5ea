//! Submaps and their double-buffered lifecycle.
//!
//! A submap couples one grid with a fixed origin and counts the batches
//! inserted into it. [`ActiveSubmaps`] keeps an "old" and a "new" submap
//! alive and feeds every batch to both, so the new one already holds
//! context when it takes over.
//!
//! ## Key Concepts
//!
//! - **Submap**: Grid + origin + insertion count, mutable until finished
//! - **ActiveSubmaps**: Creates, fills and retires submaps
//! - **SubmapSnapshot**: Transferable state, grid cells optional
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌──────────┐  insert_range_data   ┌──────────┐
//!   │  Active  │ ───────────────────▶ │  Active  │ (num_range_data += 1)
//!   └────┬─────┘                      └──────────┘
//!        │ finish() once old has num_range_data batches
//!        ▼
//!   ┌──────────┐
//!   │ Finished │  immutable, shared as Arc<Submap>
//!   └──────────┘
//! ```

mod config;
mod manager;
mod snapshot;
mod types;

pub use config::SubmapConfig;
pub use manager::{ActiveSubmaps, InsertResult};
pub use snapshot::{GridSnapshot, SnapshotError, SubmapSnapshot, TsdfSnapshot};
pub use types::{Submap, SubmapId, SubmapState};
