//! Core submap data types.

use serde::{Deserialize, Serialize};

use crate::core::{RangeData, WorldPoint};
use crate::grid::{Grid, RangeDataInserter, ValueConversionTables};

use super::snapshot::{GridSnapshot, SnapshotError, SubmapSnapshot};

/// Unique identifier for a submap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmapId(pub u32);

impl SubmapId {
    /// Create a new submap ID.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the numeric value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SubmapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Submap({})", self.0)
    }
}

/// State of a submap in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmapState {
    /// Receiving range data.
    #[default]
    Active,

    /// Frozen. Safe to share with readers; no further insertion.
    Finished,
}

impl SubmapState {
    /// Can this submap receive range data?
    #[inline]
    pub fn accepts_range_data(&self) -> bool {
        matches!(self, SubmapState::Active)
    }
}

/// A grid anchored at a fixed origin, filled by consecutive batches.
#[derive(Clone, Debug)]
pub struct Submap {
    id: SubmapId,
    origin: WorldPoint,
    grid: Grid,
    num_range_data: usize,
    state: SubmapState,
}

impl Submap {
    /// Create an empty active submap.
    pub fn new(id: SubmapId, origin: WorldPoint, grid: Grid) -> Self {
        Self {
            id,
            origin,
            grid,
            num_range_data: 0,
            state: SubmapState::Active,
        }
    }

    /// Identifier.
    #[inline]
    pub fn id(&self) -> SubmapId {
        self.id
    }

    /// Position of the submap in the local map frame.
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// The grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of batches inserted so far.
    #[inline]
    pub fn num_range_data(&self) -> usize {
        self.num_range_data
    }

    /// Lifecycle state.
    #[inline]
    pub fn state(&self) -> SubmapState {
        self.state
    }

    /// Has [`finish`](Self::finish) been called?
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == SubmapState::Finished
    }

    /// Insert one batch through `inserter`.
    ///
    /// # Panics
    ///
    /// If the submap is finished.
    pub fn insert_range_data(&mut self, range_data: &RangeData, inserter: &dyn RangeDataInserter) {
        assert!(
            self.state.accepts_range_data(),
            "cannot insert into finished {}",
            self.id
        );
        inserter.insert(range_data, &mut self.grid);
        self.num_range_data += 1;
    }

    /// Freeze the submap.
    ///
    /// # Panics
    ///
    /// If the submap is already finished.
    pub fn finish(&mut self) {
        assert!(
            self.state.accepts_range_data(),
            "{} is already finished",
            self.id
        );
        self.state = SubmapState::Finished;
        log::debug!(
            "{} finished after {} range data",
            self.id,
            self.num_range_data
        );
    }

    /// Snapshot of metadata and, if `include_grid`, the encoded cells.
    pub fn to_snapshot(&self, include_grid: bool) -> SubmapSnapshot {
        SubmapSnapshot {
            id: self.id,
            origin: self.origin,
            num_range_data: self.num_range_data,
            finished: self.is_finished(),
            grid: GridSnapshot::from_grid(&self.grid, include_grid),
        }
    }

    /// Rebuild a submap from a snapshot that carries its cells.
    pub fn from_snapshot(
        snapshot: &SubmapSnapshot,
        tables: &ValueConversionTables,
    ) -> Result<Submap, SnapshotError> {
        Ok(Self {
            id: snapshot.id,
            origin: snapshot.origin,
            grid: snapshot.grid.to_grid(tables)?,
            num_range_data: snapshot.num_range_data,
            state: if snapshot.finished {
                SubmapState::Finished
            } else {
                SubmapState::Active
            },
        })
    }

    /// Refresh insertion count, state and, if the snapshot carries cells,
    /// the grid.
    ///
    /// Only active submaps accept updates; an update may finish them.
    /// Nothing changes when an error is returned.
    pub fn update_from_snapshot(
        &mut self,
        snapshot: &SubmapSnapshot,
        tables: &ValueConversionTables,
    ) -> Result<(), SnapshotError> {
        if self.is_finished() {
            return Err(SnapshotError::SubmapFinished(self.id));
        }
        if snapshot.grid.grid_type != self.grid.grid_type() {
            return Err(SnapshotError::GridTypeMismatch {
                expected: self.grid.grid_type(),
                actual: snapshot.grid.grid_type,
            });
        }
        if snapshot.grid.has_cells() {
            self.grid = snapshot.grid.to_grid(tables)?;
        }
        self.num_range_data = snapshot.num_range_data;
        self.state = if snapshot.finished {
            SubmapState::Finished
        } else {
            SubmapState::Active
        };
        Ok(())
    }
}
