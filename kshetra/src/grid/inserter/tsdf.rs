//! Truncated signed distance insertion.

use crate::core::RangeData;
use crate::grid::config::TsdfInserterConfig;
use crate::grid::raycaster::BresenhamLine;
use crate::grid::storage::Grid;

use super::{RangeDataInserter, grow_as_needed};

/// Integrates returns into a [`TsdfGrid`] with a weighted running average.
///
/// For every return, cells on its ray within `truncation_distance` of the
/// return get the signed distance to it: positive in front of the surface,
/// negative behind.
///
/// [`TsdfGrid`]: crate::grid::TsdfGrid
#[derive(Clone, Debug)]
pub struct TsdfRangeDataInserter {
    config: TsdfInserterConfig,
}

impl TsdfRangeDataInserter {
    /// Create an inserter.
    pub fn new(config: TsdfInserterConfig) -> Self {
        Self { config }
    }
}

impl RangeDataInserter for TsdfRangeDataInserter {
    fn insert(&self, range_data: &RangeData, grid: &mut Grid) {
        let truncation = self.config.truncation_distance;
        let padding = truncation + grid.limits().resolution();
        grow_as_needed(range_data, grid, padding);

        let Some(tsdf) = grid.as_tsdf_mut() else {
            panic!("TSDF inserter requires a TSDF grid");
        };
        let limits = *tsdf.limits();
        let origin = range_data.origin;

        for hit in &range_data.returns {
            let ray = *hit - origin;
            let range = ray.norm();
            if range <= f32::EPSILON {
                continue;
            }
            let direction = ray * (1.0 / range);
            let begin = if range > truncation {
                *hit - direction * truncation
            } else {
                origin
            };
            let end = *hit + direction * truncation;

            for cell in BresenhamLine::from_points(&limits, begin, end) {
                let along_ray = (limits.cell_center(cell) - origin).dot(&direction);
                let observed = (range - along_ray).clamp(-truncation, truncation);

                let (tsd, weight) = tsdf.get_tsd_and_weight(cell);
                let updated_weight = weight + self.config.update_weight;
                let updated_tsd =
                    (tsd * weight + observed * self.config.update_weight) / updated_weight;
                tsdf.set_cell(
                    cell,
                    updated_tsd,
                    updated_weight.min(self.config.max_weight),
                );
            }
        }

        tsdf.finish_update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorldPoint;
    use crate::grid::limits::MapLimits;
    use crate::grid::tables::ValueConversionTables;
    use crate::grid::{ProbabilityGrid, TsdfGrid};

    fn setup() -> (TsdfRangeDataInserter, Grid) {
        let config = TsdfInserterConfig::default();
        let limits = MapLimits::centered(0.05, WorldPoint::ZERO, 40);
        let grid = TsdfGrid::new(
            limits,
            config.truncation_distance,
            config.max_weight,
            &ValueConversionTables::new(),
        );
        (TsdfRangeDataInserter::new(config), grid.into())
    }

    fn tsd_and_weight(grid: &Grid, point: WorldPoint) -> (f32, f32) {
        let grid = grid.as_tsdf().unwrap();
        grid.get_tsd_and_weight(grid.limits().cell_index(point))
    }

    #[test]
    fn test_signed_distance_around_return() {
        let (inserter, mut grid) = setup();
        let hit = WorldPoint::new(0.525, 0.025);
        inserter.insert(&RangeData::new(WorldPoint::new(0.025, 0.025), vec![hit]), &mut grid);

        let (at_hit, weight) = tsd_and_weight(&grid, hit);
        assert!(at_hit.abs() < 0.01);
        assert!((weight - 1.0).abs() < 1e-3);

        let (in_front, _) = tsd_and_weight(&grid, WorldPoint::new(0.325, 0.025));
        assert!((in_front - 0.2).abs() < 0.01);

        let (behind, _) = tsd_and_weight(&grid, WorldPoint::new(0.725, 0.025));
        assert!((behind + 0.2).abs() < 0.01);

        // Outside the truncation band nothing is written.
        let (_, far_weight) = tsd_and_weight(&grid, WorldPoint::new(0.125, 0.025));
        assert_eq!(far_weight, 0.0);
    }

    #[test]
    fn test_weights_accumulate_and_saturate() {
        let (inserter, mut grid) = setup();
        let hit = WorldPoint::new(0.525, 0.025);
        let data = RangeData::new(WorldPoint::new(0.025, 0.025), vec![hit]);
        for _ in 0..15 {
            inserter.insert(&data, &mut grid);
        }
        let (tsd, weight) = tsd_and_weight(&grid, hit);
        assert!(tsd.abs() < 0.01);
        assert!((weight - 10.0).abs() < 1e-3);
    }

    #[test]
    #[should_panic(expected = "requires a TSDF grid")]
    fn test_wrong_grid_variant_panics() {
        let (inserter, _) = setup();
        let tables = ValueConversionTables::new();
        let mut grid: Grid =
            ProbabilityGrid::new(MapLimits::centered(0.05, WorldPoint::ZERO, 40), &tables).into();
        inserter.insert(
            &RangeData::new(WorldPoint::ZERO, vec![WorldPoint::new(0.5, 0.0)]),
            &mut grid,
        );
    }

    #[test]
    #[should_panic(expected = "non-finite points")]
    fn test_infinite_return_panics() {
        let (inserter, mut grid) = setup();
        let data = RangeData::new(WorldPoint::ZERO, vec![WorldPoint::new(f32::INFINITY, 0.0)]);
        inserter.insert(&data, &mut grid);
    }
}
