//! Shared cache of decode and update tables.
//!
//! Tables are keyed by the exact bit pattern of their float parameters, built
//! on first request and handed out as reference-counted slices. Grids and
//! inserters hold on to the `Arc`s; nothing is rebuilt per grid.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use super::values::{
    UNKNOWN_CORRESPONDENCE_VALUE, compute_lookup_table_to_apply_correspondence_cost_odds,
    compute_lookup_table_to_apply_odds, precompute_value_to_bounded_float,
};

/// Decode table: encoded value (with or without marker) → float.
pub type ConversionTable = Arc<[f32]>;

/// Update table: encoded value → updated encoded value (with marker).
pub type LookupTable = Arc<[u16]>;

type BoundsKey = (u32, u32, u32);

/// Cache of decode tables per bounds and update tables per odds.
#[derive(Debug, Default)]
pub struct ValueConversionTables {
    bounded_float_tables: Mutex<HashMap<BoundsKey, ConversionTable>>,
    correspondence_cost_update_tables: Mutex<HashMap<u32, LookupTable>>,
    probability_update_tables: Mutex<HashMap<u32, LookupTable>>,
}

impl ValueConversionTables {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide instance.
    pub fn global() -> Arc<ValueConversionTables> {
        static GLOBAL: OnceLock<Arc<ValueConversionTables>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(ValueConversionTables::new()))
            .clone()
    }

    /// Decode table for values in `[lower_bound, upper_bound]` whose unknown
    /// value decodes to `unknown_result`.
    pub fn conversion_table(
        &self,
        unknown_result: f32,
        lower_bound: f32,
        upper_bound: f32,
    ) -> ConversionTable {
        let key = (
            unknown_result.to_bits(),
            lower_bound.to_bits(),
            upper_bound.to_bits(),
        );
        self.bounded_float_tables
            .lock()
            .entry(key)
            .or_insert_with(|| {
                log::debug!(
                    "Building conversion table: unknown={unknown_result} bounds=[{lower_bound}, {upper_bound}]"
                );
                precompute_value_to_bounded_float(
                    UNKNOWN_CORRESPONDENCE_VALUE,
                    unknown_result,
                    lower_bound,
                    upper_bound,
                )
                .into()
            })
            .clone()
    }

    /// Update table applying `odds` to correspondence-cost cells.
    pub fn correspondence_cost_update_table(&self, odds: f32) -> LookupTable {
        self.correspondence_cost_update_tables
            .lock()
            .entry(odds.to_bits())
            .or_insert_with(|| {
                log::debug!("Building correspondence cost update table for odds {odds}");
                compute_lookup_table_to_apply_correspondence_cost_odds(odds).into()
            })
            .clone()
    }

    /// Update table applying `odds` to probability cells.
    pub fn probability_update_table(&self, odds: f32) -> LookupTable {
        self.probability_update_tables
            .lock()
            .entry(odds.to_bits())
            .or_insert_with(|| {
                log::debug!("Building probability update table for odds {odds}");
                compute_lookup_table_to_apply_odds(odds).into()
            })
            .clone()
    }

    /// Number of tables built so far.
    pub fn cached_table_count(&self) -> usize {
        self.bounded_float_tables.lock().len()
            + self.correspondence_cost_update_tables.lock().len()
            + self.probability_update_tables.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::values::{
        MAX_CORRESPONDENCE_COST, MIN_CORRESPONDENCE_COST, VALUE_COUNT, odds,
        value_to_correspondence_cost,
    };

    #[test]
    fn test_tables_are_shared() {
        let tables = ValueConversionTables::new();
        let a = tables.conversion_table(0.9, 0.1, 0.9);
        let b = tables.conversion_table(0.9, 0.1, 0.9);
        assert!(Arc::ptr_eq(&a, &b));

        let hit_a = tables.correspondence_cost_update_table(odds(0.55));
        let hit_b = tables.correspondence_cost_update_table(odds(0.55));
        assert!(Arc::ptr_eq(&hit_a, &hit_b));
        assert_eq!(tables.cached_table_count(), 2);

        tables.correspondence_cost_update_table(odds(0.49));
        tables.probability_update_table(odds(0.55));
        assert_eq!(tables.cached_table_count(), 4);
    }

    #[test]
    fn test_conversion_table_matches_default_decode() {
        let tables = ValueConversionTables::new();
        let table = tables.conversion_table(
            MAX_CORRESPONDENCE_COST,
            MIN_CORRESPONDENCE_COST,
            MAX_CORRESPONDENCE_COST,
        );
        assert_eq!(table.len(), 2 * VALUE_COUNT);
        for value in [0u16, 1, 100, 16000, 32767] {
            assert_eq!(table[value as usize], value_to_correspondence_cost(value));
        }
    }

    #[test]
    fn test_global_is_singleton() {
        let a = ValueConversionTables::global();
        let b = ValueConversionTables::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
