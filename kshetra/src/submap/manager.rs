//! Active submap manager - double-buffered submap lifecycle.

use std::sync::Arc;

use super::config::SubmapConfig;
use super::types::{Submap, SubmapId};
use crate::core::{RangeData, WorldPoint};
use crate::grid::{
    Grid, GridType, ProbabilityGrid, RangeDataInserter, TsdfGrid, ValueConversionTables,
    create_inserter,
};

/// Result of inserting one batch into the active submaps.
#[derive(Clone, Debug)]
pub struct InsertResult {
    /// Live submaps after the insertion, oldest first.
    ///
    /// Holding these across the next insertion makes it clone the grids.
    pub submaps: Vec<Arc<Submap>>,
    /// Submap finished and evicted by this call, if any.
    pub finished: Option<Arc<Submap>>,
}

/// Keeps up to two live submaps and rotates them.
///
/// ```text
///  batch 1            batch 2 .. n            batch n+1 (old full)
///  ┌─────┐            ┌─────┬─────┐           ┌─────┐ ┌─────┬─────┐
///  │ old │    ──▶     │ old │ new │    ──▶    │done │ │ old │ new │
///  └─────┘            └─────┴─────┘           └─────┘ └─────┴─────┘
///                                             evicted
/// ```
///
/// Every batch is inserted into all live submaps. The older one is finished
/// once it has received `num_range_data` batches; the younger takes its place
/// and a fresh submap is started at the batch origin.
///
/// Handles returned to callers are copy-on-write: a held `Arc<Submap>` never
/// observes later insertions. The next insertion then clones every live
/// submap whose handle is still held, grid included, so that batch costs time
/// proportional to the grid size. Drop the previous [`InsertResult`] before
/// inserting to keep updates in place.
#[derive(Debug)]
pub struct ActiveSubmaps {
    config: SubmapConfig,
    submaps: Vec<Arc<Submap>>,
    inserter: Box<dyn RangeDataInserter>,
    tables: Arc<ValueConversionTables>,
    next_id: u32,
}

impl ActiveSubmaps {
    /// Create a manager with no live submaps.
    pub fn new(config: SubmapConfig, tables: Arc<ValueConversionTables>) -> Self {
        let inserter = create_inserter(
            config.grid.grid_type,
            &config.probability_inserter,
            &config.tsdf_inserter,
            &tables,
        );
        Self {
            config,
            submaps: Vec::with_capacity(2),
            inserter,
            tables,
            next_id: 0,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SubmapConfig {
        &self.config
    }

    /// Shared conversion tables used by every submap grid.
    pub fn tables(&self) -> &Arc<ValueConversionTables> {
        &self.tables
    }

    /// Grid kind of the submaps this manager creates.
    pub fn grid_type(&self) -> GridType {
        self.config.grid.grid_type
    }

    /// Live submaps, oldest first.
    pub fn submaps(&self) -> &[Arc<Submap>] {
        &self.submaps
    }

    /// Insert one batch, rotating submaps first if the old one is full.
    pub fn insert_range_data(&mut self, range_data: &RangeData) -> InsertResult {
        let mut finished = None;
        match self.submaps.len() {
            0 | 1 => self.add_submap(range_data.origin),
            _ if self.submaps[0].num_range_data() >= self.config.num_range_data => {
                let mut old = self.submaps.remove(0);
                Arc::make_mut(&mut old).finish();
                finished = Some(old);
                self.add_submap(range_data.origin);
            }
            _ => {}
        }

        for submap in &mut self.submaps {
            Arc::make_mut(submap).insert_range_data(range_data, self.inserter.as_ref());
        }

        InsertResult {
            submaps: self.submaps.clone(),
            finished,
        }
    }

    fn add_submap(&mut self, origin: WorldPoint) {
        debug_assert!(self.submaps.len() < 2);
        let id = SubmapId::new(self.next_id);
        self.next_id += 1;

        let grid = self.create_grid(origin);
        log::debug!(
            "Created {id} at ({:.2}, {:.2}), {} live",
            origin.x,
            origin.y,
            self.submaps.len() + 1
        );
        self.submaps.push(Arc::new(Submap::new(id, origin, grid)));
    }

    fn create_grid(&self, origin: WorldPoint) -> Grid {
        let limits = self.config.grid.initial_limits(origin);
        match self.config.grid.grid_type {
            GridType::Probability => ProbabilityGrid::new(limits, &self.tables).into(),
            GridType::Tsdf => TsdfGrid::new(
                limits,
                self.config.tsdf_inserter.truncation_distance,
                self.config.tsdf_inserter.max_weight,
                &self.tables,
            )
            .into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_range_data(x: f32) -> RangeData {
        let origin = WorldPoint::new(x, 0.0);
        let returns = (0..8)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::FRAC_PI_4;
                origin + WorldPoint::new(angle.cos(), angle.sin()) * 1.2
            })
            .collect();
        RangeData::new(origin, returns)
    }

    fn make_manager(num_range_data: usize) -> ActiveSubmaps {
        let config = SubmapConfig {
            num_range_data,
            ..Default::default()
        };
        ActiveSubmaps::new(config, Arc::new(ValueConversionTables::new()))
    }

    #[test]
    fn test_manager_creation() {
        let manager = make_manager(3);
        assert!(manager.submaps().is_empty());
        assert_eq!(manager.grid_type(), GridType::Probability);
    }

    #[test]
    fn test_first_insertions_fill_double_buffer() {
        let mut manager = make_manager(3);

        let result = manager.insert_range_data(&make_range_data(0.0));
        assert_eq!(result.submaps.len(), 1);
        assert!(result.finished.is_none());
        assert_eq!(result.submaps[0].num_range_data(), 1);

        let result = manager.insert_range_data(&make_range_data(0.1));
        assert_eq!(result.submaps.len(), 2);
        assert_eq!(result.submaps[0].num_range_data(), 2);
        assert_eq!(result.submaps[1].num_range_data(), 1);
        assert_eq!(result.submaps[1].origin(), WorldPoint::new(0.1, 0.0));
    }

    #[test]
    fn test_old_submap_finished_after_threshold() {
        let threshold = 4;
        let mut manager = make_manager(threshold);

        for i in 0..threshold {
            let result = manager.insert_range_data(&make_range_data(i as f32 * 0.1));
            assert!(result.finished.is_none());
        }

        let result = manager.insert_range_data(&make_range_data(1.0));
        let finished = result.finished.expect("old submap should be evicted");
        assert_eq!(finished.id(), SubmapId::new(0));
        assert!(finished.is_finished());
        assert_eq!(finished.num_range_data(), threshold);

        assert_eq!(result.submaps.len(), 2);
        assert_eq!(result.submaps[0].id(), SubmapId::new(1));
        assert_eq!(result.submaps[1].id(), SubmapId::new(2));
        assert_eq!(result.submaps[1].origin(), WorldPoint::new(1.0, 0.0));
        assert_eq!(result.submaps[1].num_range_data(), 1);
        assert!(result.submaps.iter().all(|s| !s.is_finished()));
    }

    #[test]
    fn test_steady_state_rotation() {
        let mut manager = make_manager(2);
        let mut finished = Vec::new();
        for i in 0..10 {
            let result = manager.insert_range_data(&make_range_data(i as f32 * 0.05));
            assert!(result.submaps.len() <= 2);
            finished.extend(result.finished);
        }

        let ids: Vec<u32> = finished.iter().map(|s| s.id().value()).collect();
        assert_eq!(ids, (0..8).collect::<Vec<u32>>());
        assert!(finished.iter().all(|s| s.num_range_data() == 2));
    }

    #[test]
    fn test_handles_are_snapshots() {
        let mut manager = make_manager(10);
        let held = manager.insert_range_data(&make_range_data(0.0)).submaps;
        manager.insert_range_data(&make_range_data(0.0));
        manager.insert_range_data(&make_range_data(0.0));

        assert_eq!(held[0].num_range_data(), 1);
        assert_eq!(manager.submaps()[0].num_range_data(), 3);
    }

    #[test]
    fn test_unshared_submaps_update_in_place() {
        let mut manager = make_manager(10);
        manager.insert_range_data(&make_range_data(0.0));
        let before = Arc::as_ptr(&manager.submaps()[0]);

        // Result dropped: no clone on the next insertion.
        manager.insert_range_data(&make_range_data(0.0));
        assert_eq!(Arc::as_ptr(&manager.submaps()[0]), before);

        // Handle held: the next insertion copies the submap.
        let held = manager.insert_range_data(&make_range_data(0.0));
        let shared = Arc::as_ptr(&manager.submaps()[0]);
        manager.insert_range_data(&make_range_data(0.0));
        assert_ne!(Arc::as_ptr(&manager.submaps()[0]), shared);
        assert_eq!(held.submaps[0].num_range_data(), 3);
    }

    #[test]
    fn test_tsdf_submaps() {
        let mut config = SubmapConfig::default();
        config.grid.grid_type = GridType::Tsdf;
        let mut manager = ActiveSubmaps::new(config, Arc::new(ValueConversionTables::new()));

        let result = manager.insert_range_data(&make_range_data(0.0));
        let grid = result.submaps[0].grid();
        assert_eq!(grid.grid_type(), GridType::Tsdf);
        assert!(grid.known_cells_box().is_some());
    }
}
