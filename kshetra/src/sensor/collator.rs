//! Time synchronization of range data from several sensors.
//!
//! Each sensor delivers batches whose points carry times relative to the
//! batch timestamp. The collator cuts all pending batches at a common window
//! `[start, end]` and merges the points that fall inside it:
//!
//! ```text
//!              window_start            window_end
//!                   │                      │
//! sensor A  ──●──●──┼──●──●──●──●──●──●──●─┤            (end = oldest batch)
//! sensor B      ●───┼───●─────●─────●──────┼─────●────  (rest stays pending)
//!                   │◀──── merged output ─▶│
//! ```
//!
//! Merged point times are corrected to be relative to `window_end` and
//! sorted ascending.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{
    DEFAULT_INTENSITY, MergedRangeData, RangeMeasurement, TimedPointCloud, us_to_seconds,
};

/// Merges per-sensor point clouds into time-ordered windows.
#[derive(Clone, Debug)]
pub struct RangeDataCollator {
    expected_sensor_ids: BTreeSet<String>,
    /// At most one batch per sensor awaiting merge.
    pending: BTreeMap<String, TimedPointCloud>,
    window_start_us: i64,
    window_end_us: i64,
}

impl RangeDataCollator {
    /// Create a collator that waits for all of `expected_sensor_ids`.
    pub fn new<I, S>(expected_sensor_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected_sensor_ids: BTreeSet<String> =
            expected_sensor_ids.into_iter().map(Into::into).collect();
        assert!(
            !expected_sensor_ids.is_empty(),
            "collator needs at least one sensor"
        );
        Self {
            expected_sensor_ids,
            pending: BTreeMap::new(),
            window_start_us: i64::MIN,
            window_end_us: i64::MIN,
        }
    }

    /// Sensors this collator waits for.
    pub fn expected_sensor_ids(&self) -> impl Iterator<Item = &str> {
        self.expected_sensor_ids.iter().map(String::as_str)
    }

    /// Number of sensors with a batch awaiting merge.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Add one batch and return whatever can be merged now.
    ///
    /// The result is empty while some expected sensor has nothing pending.
    ///
    /// # Panics
    ///
    /// If `sensor_id` is not an expected sensor.
    pub fn add_range_data(&mut self, sensor_id: &str, mut data: TimedPointCloud) -> MergedRangeData {
        assert!(
            self.expected_sensor_ids.contains(sensor_id),
            "unexpected sensor id '{sensor_id}'"
        );
        data.intensities.resize(data.points.len(), DEFAULT_INTENSITY);

        // A second batch from the same sensor: flush up to the older one.
        if let Some(previous) = self.pending.get(sensor_id) {
            self.window_start_us = self.window_end_us;
            self.window_end_us = previous.timestamp_us as i64;
            let result = self.crop_and_merge();
            self.pending.insert(sensor_id.to_string(), data);
            return result;
        }

        self.pending.insert(sensor_id.to_string(), data);
        if self.pending.len() != self.expected_sensor_ids.len() {
            return MergedRangeData::default();
        }

        // Every sensor has data: advance to the oldest batch.
        self.window_start_us = self.window_end_us;
        self.window_end_us = self
            .pending
            .values()
            .map(|data| data.timestamp_us as i64)
            .min()
            .unwrap_or(self.window_start_us);
        self.crop_and_merge()
    }

    fn crop_and_merge(&mut self) -> MergedRangeData {
        let mut result = MergedRangeData {
            timestamp_us: self.window_end_us.max(0) as u64,
            ..Default::default()
        };
        let (start, end) = (self.window_start_us, self.window_end_us);
        let mut warned_for_dropped_points = false;

        self.pending.retain(|sensor_id, data| {
            let overlap_begin = data
                .points
                .iter()
                .position(|p| data.point_time_us(p) >= start)
                .unwrap_or(data.points.len());
            let overlap_end = overlap_begin
                + data.points[overlap_begin..]
                    .iter()
                    .take_while(|p| data.point_time_us(p) <= end)
                    .count();

            if overlap_begin > 0 && !warned_for_dropped_points {
                log::warn!("Dropped {overlap_begin} earlier points from '{sensor_id}'.");
                warned_for_dropped_points = true;
            }

            if overlap_begin < overlap_end {
                let origin_index = result.origins.len();
                result.origins.push(data.origin);
                let time_correction = us_to_seconds(data.timestamp_us as i64 - end);
                result.measurements.extend(
                    data.points[overlap_begin..overlap_end]
                        .iter()
                        .zip(&data.intensities[overlap_begin..overlap_end])
                        .map(|(point, &intensity)| {
                            let mut point = *point;
                            point.time += time_correction;
                            RangeMeasurement {
                                point,
                                intensity,
                                origin_index,
                            }
                        }),
                );
            }

            if overlap_end == data.points.len() {
                false
            } else {
                if overlap_end > 0 {
                    data.points.drain(..overlap_end);
                    data.intensities.drain(..overlap_end);
                }
                true
            }
        });

        result
            .measurements
            .sort_by(|a, b| a.point.time.total_cmp(&b.point.time));

        log::trace!(
            "Merged {} points from {} origins, window ({start}, {end}] us",
            result.measurements.len(),
            result.origins.len()
        );
        result
    }
}
