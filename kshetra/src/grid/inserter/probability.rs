//! Hit/miss insertion into probability grids.

use crate::core::RangeData;
use crate::grid::config::ProbabilityInserterConfig;
use crate::grid::raycaster::BresenhamLine;
use crate::grid::storage::Grid;
use crate::grid::tables::{LookupTable, ValueConversionTables};
use crate::grid::values::odds;

use super::{RangeDataInserter, grow_as_needed};

/// Applies precomputed hit and miss tables to a [`ProbabilityGrid`].
///
/// Returns are applied first, so a cell that holds a return is never also
/// cleared by a free-space ray of the same batch.
///
/// [`ProbabilityGrid`]: crate::grid::ProbabilityGrid
#[derive(Clone, Debug)]
pub struct ProbabilityGridRangeDataInserter {
    hit_table: LookupTable,
    miss_table: LookupTable,
    insert_free_space: bool,
}

impl ProbabilityGridRangeDataInserter {
    /// Build an inserter, fetching its tables from `tables`.
    pub fn new(config: &ProbabilityInserterConfig, tables: &ValueConversionTables) -> Self {
        Self {
            hit_table: tables.correspondence_cost_update_table(odds(config.hit_probability)),
            miss_table: tables.correspondence_cost_update_table(odds(config.miss_probability)),
            insert_free_space: config.insert_free_space,
        }
    }
}

impl RangeDataInserter for ProbabilityGridRangeDataInserter {
    fn insert(&self, range_data: &RangeData, grid: &mut Grid) {
        let padding = grid.limits().resolution();
        grow_as_needed(range_data, grid, padding);

        let Some(probability_grid) = grid.as_probability_mut() else {
            panic!("probability inserter requires a probability grid");
        };
        let limits = *probability_grid.limits();
        let origin = limits.cell_index(range_data.origin);

        for hit in &range_data.returns {
            probability_grid.apply_lookup_table(limits.cell_index(*hit), &self.hit_table);
        }

        if self.insert_free_space {
            for hit in &range_data.returns {
                for cell in BresenhamLine::new(origin, limits.cell_index(*hit)).excluding_end() {
                    probability_grid.apply_lookup_table(cell, &self.miss_table);
                }
            }
            for miss in &range_data.misses {
                for cell in BresenhamLine::new(origin, limits.cell_index(*miss)) {
                    probability_grid.apply_lookup_table(cell, &self.miss_table);
                }
            }
        }

        probability_grid.finish_update();
    }
}
