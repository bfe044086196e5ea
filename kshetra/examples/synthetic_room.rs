//! Local mapping of a simulated room with two range sensors.
//!
//! This example demonstrates:
//! - Loading the YAML configuration (falls back to defaults)
//! - Feeding two asynchronous sensors through the collator
//! - Watching submaps rotate and reporting finished ones
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --example synthetic_room
//! ```

use std::f32::consts::PI;

use kshetra::config::MapperConfig;
use kshetra::{LocalMapBuilder, TimedPoint, TimedPointCloud, ValueConversionTables, WorldPoint};

const ROOM_WIDTH: f32 = 6.0;
const ROOM_HEIGHT: f32 = 4.0;

/// Sweep of a sensor at `origin`, last point at `timestamp_us`.
fn sweep(timestamp_us: u64, origin: WorldPoint, num_points: usize, sweep_time: f32) -> TimedPointCloud {
    let dt = sweep_time / num_points as f32;
    let points = (0..num_points)
        .map(|i| {
            let angle = i as f32 * 2.0 * PI / num_points as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            let mut range = f32::INFINITY;
            if cos_a.abs() > 1e-6 {
                let wall = if cos_a > 0.0 { ROOM_WIDTH } else { 0.0 };
                range = range.min((wall - origin.x) / cos_a);
            }
            if sin_a.abs() > 1e-6 {
                let wall = if sin_a > 0.0 { ROOM_HEIGHT } else { 0.0 };
                range = range.min((wall - origin.y) / sin_a);
            }
            let time = -((num_points - 1 - i) as f32) * dt;
            TimedPoint::new(origin.x + range * cos_a, origin.y + range * sin_a, time)
        })
        .collect();
    TimedPointCloud::new(timestamp_us, origin, points)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = MapperConfig::load_default()?;
    config.local_map.sensor_ids = vec!["front".to_string(), "rear".to_string()];
    config.local_map.submaps.num_range_data = 20;
    config.validate()?;

    let mut builder = LocalMapBuilder::new(config.local_map, ValueConversionTables::global());

    // Robot drives along the room; the rear sensor runs at a slower rate.
    let mut t_front = 0u64;
    let mut t_rear = 40_000u64;
    let mut finished = 0;
    let mut insertions = 0;

    for step in 0..200 {
        let x = 0.5 + 5.0 * step as f32 / 200.0;
        let outputs = if t_front <= t_rear {
            t_front += 100_000;
            builder.add_range_data("front", sweep(t_front, WorldPoint::new(x, 2.0), 360, 0.1))
        } else {
            t_rear += 130_000;
            builder.add_range_data("rear", sweep(t_rear, WorldPoint::new(x - 0.2, 2.0), 180, 0.13))
        };

        if let Some(result) = outputs {
            insertions += 1;
            if let Some(submap) = result.finished {
                finished += 1;
                let (offset, cells) = submap.grid().compute_cropped_limits();
                log::info!(
                    "{} finished: origin ({:.2}, {:.2}), {} batches, known region {}x{} at ({}, {})",
                    submap.id(),
                    submap.origin().x,
                    submap.origin().y,
                    submap.num_range_data(),
                    cells.num_x_cells,
                    cells.num_y_cells,
                    offset.x,
                    offset.y
                );
            }
        }
    }

    log::info!(
        "{insertions} insertions, {finished} finished submaps, {} live",
        builder.submaps().len()
    );
    Ok(())
}
