//! Test utilities for kshetra integration tests.
//!
//! This module provides helpers for building synthetic sensor batches.

#![allow(dead_code)]

use std::f32::consts::PI;
use std::sync::Arc;

use kshetra::grid::ValueConversionTables;
use kshetra::{RangeData, TimedPoint, TimedPointCloud, WorldPoint};

/// Fresh conversion tables, isolated from other tests.
pub fn make_tables() -> Arc<ValueConversionTables> {
    Arc::new(ValueConversionTables::new())
}

/// Distance from `origin` along `angle` to the walls of a square room
/// spanning `[-half_size, half_size]` on both axes.
pub fn room_range(origin: WorldPoint, angle: f32, half_size: f32) -> f32 {
    let (sin, cos) = angle.sin_cos();
    let mut range = f32::INFINITY;
    if cos.abs() > 1e-6 {
        let wall = if cos > 0.0 { half_size } else { -half_size };
        range = range.min((wall - origin.x) / cos);
    }
    if sin.abs() > 1e-6 {
        let wall = if sin > 0.0 { half_size } else { -half_size };
        range = range.min((wall - origin.y) / sin);
    }
    range
}

/// Wall points of a square room seen from `origin`, evenly spaced in angle.
pub fn room_points(origin: WorldPoint, num_points: usize, half_size: f32) -> Vec<WorldPoint> {
    (0..num_points)
        .map(|i| {
            let angle = i as f32 * 2.0 * PI / num_points as f32 - PI;
            let range = room_range(origin, angle, half_size);
            origin + WorldPoint::new(angle.cos(), angle.sin()) * range
        })
        .collect()
}

/// Room scan as a timed point cloud; points are `dt` seconds apart and the
/// last one lands on `timestamp_us`.
pub fn room_cloud(
    timestamp_us: u64,
    origin: WorldPoint,
    num_points: usize,
    half_size: f32,
    dt: f32,
) -> TimedPointCloud {
    let points = room_points(origin, num_points, half_size)
        .into_iter()
        .enumerate()
        .map(|(i, p)| TimedPoint::new(p.x, p.y, -((num_points - 1 - i) as f32) * dt))
        .collect();
    TimedPointCloud::new(timestamp_us, origin, points)
}

/// Room scan ready for direct insertion.
pub fn room_range_data(origin: WorldPoint, num_points: usize, half_size: f32) -> RangeData {
    RangeData::new(origin, room_points(origin, num_points, half_size))
}

/// Cloud of stationary points with all relative times zero.
pub fn static_cloud(timestamp_us: u64, origin: WorldPoint, points: &[(f32, f32)]) -> TimedPointCloud {
    let points = points
        .iter()
        .map(|&(x, y)| TimedPoint::new(x, y, 0.0))
        .collect();
    TimedPointCloud::new(timestamp_us, origin, points)
}
