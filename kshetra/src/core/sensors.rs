//! Range sensor data types.
//!
//! ## Time Convention
//!
//! Each point cloud carries one absolute timestamp (`timestamp_us`,
//! microseconds) and every point carries a time in seconds *relative* to it.
//! Relative times are usually non-positive: the batch timestamp is the time
//! of the last point.
//!
//! ```text
//!   p0        p1        p2        p3
//!   │─────────│─────────│─────────│
//!  -0.3      -0.2      -0.1      0.0   (relative seconds)
//!                                 ▲
//!                           timestamp_us
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! TimedPointCloud (per sensor)
//!        │  RangeDataCollator
//!        ▼
//! MergedRangeData (time-sorted, one origin per contributing sensor)
//!        │  LocalMapBuilder (range filtering)
//!        ▼
//! RangeData (origin + returns + misses) ──▶ submaps
//! ```

use serde::{Deserialize, Serialize};

use super::point::WorldPoint;

/// Intensity assigned to points whose sensor did not report one.
pub const DEFAULT_INTENSITY: f32 = 0.0;

/// A point with a time relative to its batch timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedPoint {
    /// Position in the local map frame (meters).
    pub position: WorldPoint,
    /// Time relative to the owning batch timestamp (seconds).
    pub time: f32,
}

impl TimedPoint {
    /// Create a new timed point.
    #[inline]
    pub fn new(x: f32, y: f32, time: f32) -> Self {
        Self {
            position: WorldPoint::new(x, y),
            time,
        }
    }
}

/// One batch of points from a single range sensor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimedPointCloud {
    /// Absolute batch time in microseconds.
    pub timestamp_us: u64,
    /// Sensor position when the batch was captured.
    pub origin: WorldPoint,
    /// Points ordered by relative time.
    pub points: Vec<TimedPoint>,
    /// Per-point intensities. May be empty or shorter than `points`.
    #[serde(default)]
    pub intensities: Vec<f32>,
}

impl TimedPointCloud {
    /// Create a point cloud without intensities.
    pub fn new(timestamp_us: u64, origin: WorldPoint, points: Vec<TimedPoint>) -> Self {
        Self {
            timestamp_us,
            origin,
            points,
            intensities: Vec::new(),
        }
    }

    /// Attach intensities.
    pub fn with_intensities(mut self, intensities: Vec<f32>) -> Self {
        self.intensities = intensities;
        self
    }

    /// Absolute time of a point in microseconds.
    #[inline]
    pub fn point_time_us(&self, point: &TimedPoint) -> i64 {
        self.timestamp_us as i64 + seconds_to_us(point.time)
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Is the cloud empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A single point of a merged batch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeMeasurement {
    /// Point with time relative to the merged batch timestamp.
    pub point: TimedPoint,
    /// Intensity (or [`DEFAULT_INTENSITY`]).
    pub intensity: f32,
    /// Index into [`MergedRangeData::origins`].
    pub origin_index: usize,
}

/// Time-synchronized points from all sensors for one window.
///
/// Produced by the collator; empty while it is still waiting for sensors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedRangeData {
    /// Window end in microseconds; every point time is relative to it.
    pub timestamp_us: u64,
    /// One origin per contributing sensor batch.
    pub origins: Vec<WorldPoint>,
    /// Points sorted by ascending relative time.
    pub measurements: Vec<RangeMeasurement>,
}

impl MergedRangeData {
    /// Does this batch carry any points?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Origin of a measurement.
    #[inline]
    pub fn origin_of(&self, measurement: &RangeMeasurement) -> WorldPoint {
        self.origins[measurement.origin_index]
    }
}

/// Range data ready for insertion into a grid.
///
/// Rays are cast from `origin`. `returns` are endpoints where an obstacle was
/// observed; `misses` are endpoints of rays that saw free space only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeData {
    /// Ray origin in the local map frame.
    pub origin: WorldPoint,
    /// Obstacle endpoints.
    pub returns: Vec<WorldPoint>,
    /// Free-space endpoints.
    pub misses: Vec<WorldPoint>,
}

impl RangeData {
    /// Create range data from an origin and returns only.
    pub fn new(origin: WorldPoint, returns: Vec<WorldPoint>) -> Self {
        Self {
            origin,
            returns,
            misses: Vec::new(),
        }
    }

    /// Are the origin and every endpoint finite?
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite()
            && self.returns.iter().all(WorldPoint::is_finite)
            && self.misses.iter().all(WorldPoint::is_finite)
    }

    /// Axis-aligned bounds of origin, returns and misses: `(min, max)`.
    pub fn bounds(&self) -> (WorldPoint, WorldPoint) {
        self.returns
            .iter()
            .chain(self.misses.iter())
            .fold((self.origin, self.origin), |(min, max), p| {
                (min.min(*p), max.max(*p))
            })
    }
}

/// Convert relative seconds to whole microseconds.
#[inline]
pub fn seconds_to_us(seconds: f32) -> i64 {
    (seconds as f64 * 1e6).round() as i64
}

/// Convert a microsecond delta to seconds.
#[inline]
pub fn us_to_seconds(us: i64) -> f32 {
    (us as f64 * 1e-6) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_time_us() {
        let cloud = TimedPointCloud::new(
            1_000_000,
            WorldPoint::ZERO,
            vec![TimedPoint::new(1.0, 0.0, -0.25), TimedPoint::new(1.0, 0.0, 0.0)],
        );
        assert_eq!(cloud.point_time_us(&cloud.points[0]), 750_000);
        assert_eq!(cloud.point_time_us(&cloud.points[1]), 1_000_000);
    }

    #[test]
    fn test_range_data_bounds() {
        let mut data = RangeData::new(
            WorldPoint::new(0.0, 0.0),
            vec![WorldPoint::new(2.0, -1.0), WorldPoint::new(-0.5, 3.0)],
        );
        data.misses.push(WorldPoint::new(4.0, 0.0));

        let (min, max) = data.bounds();
        assert_eq!(min, WorldPoint::new(-0.5, -1.0));
        assert_eq!(max, WorldPoint::new(4.0, 3.0));
    }

    #[test]
    fn test_time_conversion() {
        assert_eq!(seconds_to_us(-0.1), -100_000);
        assert!((us_to_seconds(250_000) - 0.25).abs() < 1e-6);
    }
}
