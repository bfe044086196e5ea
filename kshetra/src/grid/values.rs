//! Fixed-point probability and correspondence-cost encoding.
//!
//! Every grid cell is a `u16`. The low 15 bits hold the value, bit 15 is the
//! update marker:
//!
//! ```text
//!  15 14                                   0
//! ┌──┬──────────────────────────────────────┐
//! │ M│              value                    │
//! └──┴──────────────────────────────────────┘
//!  M = 1 → cell already updated in the current batch
//!  value = 0          → unknown
//!  value ∈ [1, 32767] → lower + (value - 1) * (upper - lower) / 32766
//! ```
//!
//! Grids store the *correspondence cost* (`1 - p`), bounded to
//! `[MIN_CORRESPONDENCE_COST, MAX_CORRESPONDENCE_COST]`.
//!
//! ## Update Tables
//!
//! A Bayesian occupancy update multiplies odds: `odds_new = odds_obs * odds_old`.
//! Because the encoded value space is only 32768 entries wide, the result for
//! every possible prior is precomputed once per observation odds, turning
//! each cell update into a single table lookup:
//!
//! ```text
//! cell = table[cell]      // also sets the update marker
//! ```

use std::sync::OnceLock;

/// Number of distinct encoded values (2^15).
pub const VALUE_COUNT: usize = 32768;

/// Bit set on a cell that was updated in the current batch.
pub const UPDATE_MARKER: u16 = 1 << 15;

/// Encoded value of an unknown probability cell.
pub const UNKNOWN_PROBABILITY_VALUE: u16 = 0;

/// Encoded value of an unknown correspondence-cost cell.
pub const UNKNOWN_CORRESPONDENCE_VALUE: u16 = UNKNOWN_PROBABILITY_VALUE;

/// Lowest representable occupancy probability.
pub const MIN_PROBABILITY: f32 = 0.1;

/// Highest representable occupancy probability.
pub const MAX_PROBABILITY: f32 = 1.0 - MIN_PROBABILITY;

/// Lowest representable correspondence cost.
pub const MIN_CORRESPONDENCE_COST: f32 = 1.0 - MAX_PROBABILITY;

/// Highest representable correspondence cost.
pub const MAX_CORRESPONDENCE_COST: f32 = 1.0 - MIN_PROBABILITY;

/// Odds of a probability: `p / (1 - p)`.
#[inline]
pub fn odds(probability: f32) -> f32 {
    probability / (1.0 - probability)
}

/// Probability from odds: `o / (o + 1)`.
#[inline]
pub fn probability_from_odds(odds: f32) -> f32 {
    odds / (odds + 1.0)
}

/// Correspondence cost of an occupancy probability.
#[inline]
pub fn probability_to_correspondence_cost(probability: f32) -> f32 {
    1.0 - probability
}

/// Occupancy probability of a correspondence cost.
#[inline]
pub fn correspondence_cost_to_probability(correspondence_cost: f32) -> f32 {
    1.0 - correspondence_cost
}

/// Clamp to `[MIN_PROBABILITY, MAX_PROBABILITY]`.
#[inline]
pub fn clamp_probability(probability: f32) -> f32 {
    probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Clamp to `[MIN_CORRESPONDENCE_COST, MAX_CORRESPONDENCE_COST]`.
#[inline]
pub fn clamp_correspondence_cost(correspondence_cost: f32) -> f32 {
    correspondence_cost.clamp(MIN_CORRESPONDENCE_COST, MAX_CORRESPONDENCE_COST)
}

/// Encode a float in `[lower_bound, upper_bound]` to `[1, 32767]`.
///
/// Values outside the bounds are clamped first, so the unknown value `0` is
/// never produced.
#[inline]
pub fn bounded_float_to_value(float_value: f32, lower_bound: f32, upper_bound: f32) -> u16 {
    let clamped = float_value.clamp(lower_bound, upper_bound);
    let scaled = (clamped - lower_bound) * ((VALUE_COUNT - 2) as f32 / (upper_bound - lower_bound));
    let value = scaled.round() as i32 + 1;
    debug_assert!((1..VALUE_COUNT as i32).contains(&value));
    value as u16
}

/// Encode a correspondence cost.
#[inline]
pub fn correspondence_cost_to_value(correspondence_cost: f32) -> u16 {
    bounded_float_to_value(
        correspondence_cost,
        MIN_CORRESPONDENCE_COST,
        MAX_CORRESPONDENCE_COST,
    )
}

/// Encode an occupancy probability.
#[inline]
pub fn probability_to_value(probability: f32) -> u16 {
    bounded_float_to_value(probability, MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Reference decode of a single value. Used to build tables.
///
/// # Panics
///
/// If `value` has the update marker set.
pub fn value_to_bounded_float(
    value: u16,
    unknown_value: u16,
    unknown_result: f32,
    lower_bound: f32,
    upper_bound: f32,
) -> f32 {
    assert!(
        (value as usize) < VALUE_COUNT,
        "value {value} carries the update marker"
    );
    if value == unknown_value {
        return unknown_result;
    }
    let scale = (upper_bound - lower_bound) / (VALUE_COUNT as f32 - 2.0);
    value as f32 * scale + (lower_bound - scale)
}

/// Build a decode table covering values with and without the update marker.
pub fn precompute_value_to_bounded_float(
    unknown_value: u16,
    unknown_result: f32,
    lower_bound: f32,
    upper_bound: f32,
) -> Vec<f32> {
    const REPETITION_COUNT: usize = 2;
    let mut result = Vec::with_capacity(REPETITION_COUNT * VALUE_COUNT);
    for _ in 0..REPETITION_COUNT {
        for value in 0..VALUE_COUNT as u16 {
            result.push(value_to_bounded_float(
                value,
                unknown_value,
                unknown_result,
                lower_bound,
                upper_bound,
            ));
        }
    }
    result
}

fn value_to_probability_table() -> &'static [f32] {
    static TABLE: OnceLock<Vec<f32>> = OnceLock::new();
    TABLE.get_or_init(|| {
        precompute_value_to_bounded_float(
            UNKNOWN_PROBABILITY_VALUE,
            MIN_PROBABILITY,
            MIN_PROBABILITY,
            MAX_PROBABILITY,
        )
    })
}

fn value_to_correspondence_cost_table() -> &'static [f32] {
    static TABLE: OnceLock<Vec<f32>> = OnceLock::new();
    TABLE.get_or_init(|| {
        precompute_value_to_bounded_float(
            UNKNOWN_CORRESPONDENCE_VALUE,
            MAX_CORRESPONDENCE_COST,
            MIN_CORRESPONDENCE_COST,
            MAX_CORRESPONDENCE_COST,
        )
    })
}

/// Decode an occupancy probability (unknown decodes to `MIN_PROBABILITY`).
#[inline]
pub fn value_to_probability(value: u16) -> f32 {
    value_to_probability_table()[value as usize]
}

/// Decode a correspondence cost (unknown decodes to `MAX_CORRESPONDENCE_COST`).
#[inline]
pub fn value_to_correspondence_cost(value: u16) -> f32 {
    value_to_correspondence_cost_table()[value as usize]
}

/// Convert an encoded probability to an encoded correspondence cost,
/// carrying the update marker across.
pub fn probability_value_to_correspondence_cost_value(probability_value: u16) -> u16 {
    if probability_value == UNKNOWN_PROBABILITY_VALUE {
        return UNKNOWN_CORRESPONDENCE_VALUE;
    }
    let marker = probability_value & UPDATE_MARKER;
    let value = probability_value & !UPDATE_MARKER;
    correspondence_cost_to_value(probability_to_correspondence_cost(value_to_probability(
        value,
    ))) | marker
}

/// Convert an encoded correspondence cost to an encoded probability,
/// carrying the update marker across.
pub fn correspondence_cost_value_to_probability_value(correspondence_cost_value: u16) -> u16 {
    if correspondence_cost_value == UNKNOWN_CORRESPONDENCE_VALUE {
        return UNKNOWN_PROBABILITY_VALUE;
    }
    let marker = correspondence_cost_value & UPDATE_MARKER;
    let value = correspondence_cost_value & !UPDATE_MARKER;
    probability_to_value(correspondence_cost_to_probability(
        value_to_correspondence_cost(value),
    )) | marker
}

/// Update table for cells holding encoded probabilities.
///
/// Entry `0` (unknown) is the probability of `odds` itself; entry `c` is the
/// Bayesian combination of `odds` with the prior encoded by `c`. Every entry
/// carries [`UPDATE_MARKER`].
pub fn compute_lookup_table_to_apply_odds(odds: f32) -> Vec<u16> {
    let mut result = Vec::with_capacity(VALUE_COUNT);
    result.push(probability_to_value(probability_from_odds(odds)) + UPDATE_MARKER);
    for cell in 1..VALUE_COUNT as u16 {
        result.push(
            probability_to_value(probability_from_odds(
                odds * self::odds(value_to_probability(cell)),
            )) + UPDATE_MARKER,
        );
    }
    result
}

/// Update table for cells holding encoded correspondence costs.
///
/// `odds` are occupancy odds, as for [`compute_lookup_table_to_apply_odds`].
pub fn compute_lookup_table_to_apply_correspondence_cost_odds(odds: f32) -> Vec<u16> {
    let mut result = Vec::with_capacity(VALUE_COUNT);
    result.push(
        correspondence_cost_to_value(probability_to_correspondence_cost(probability_from_odds(
            odds,
        ))) + UPDATE_MARKER,
    );
    for cell in 1..VALUE_COUNT as u16 {
        let prior = correspondence_cost_to_probability(value_to_correspondence_cost(cell));
        result.push(
            correspondence_cost_to_value(probability_to_correspondence_cost(
                probability_from_odds(odds * self::odds(prior)),
            )) + UPDATE_MARKER,
        );
    }
    result
}
