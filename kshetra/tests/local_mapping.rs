//! Collator windowing and submap lifecycle through the full pipeline.

mod common;

use kshetra::grid::GridType;
use kshetra::{
    LocalMapBuilder, LocalMapBuilderConfig, RangeDataCollator, SubmapConfig, SubmapId,
    WorldPoint,
};

use common::{make_tables, room_cloud, static_cloud};

fn make_builder(sensor_ids: &[&str], num_range_data: usize, grid_type: GridType) -> LocalMapBuilder {
    let mut submaps = SubmapConfig {
        num_range_data,
        ..Default::default()
    };
    submaps.grid.grid_type = grid_type;
    let config = LocalMapBuilderConfig {
        max_range: 8.0,
        sensor_ids: sensor_ids.iter().map(|s| s.to_string()).collect(),
        submaps,
        ..Default::default()
    };
    LocalMapBuilder::new(config, make_tables())
}

#[test]
fn test_first_window_ends_at_oldest_batch() {
    let mut collator = RangeDataCollator::new(["a", "b"]);
    let t_a = 2_000_000;
    let t_b = 2_050_000;

    let a = room_cloud(t_a, WorldPoint::ZERO, 20, 2.0, 0.01);
    let b = room_cloud(t_b, WorldPoint::new(0.5, 0.0), 20, 2.0, 0.01);
    let b_points_in_window = b
        .points
        .iter()
        .filter(|p| b.point_time_us(p) <= t_a as i64)
        .count();

    assert!(collator.add_range_data("a", a).is_empty());
    let merged = collator.add_range_data("b", b);

    assert_eq!(merged.timestamp_us, t_a);
    assert_eq!(merged.measurements.len(), 20 + b_points_in_window);
    assert!(merged.measurements.iter().all(|m| m.point.time <= 1e-6));
}

#[test]
fn test_merged_points_sorted() {
    let mut collator = RangeDataCollator::new(["front", "rear"]);
    let mut outputs = Vec::new();
    let mut t_front = 100_000u64;
    let mut t_rear = 130_000u64;
    for _ in 0..10 {
        outputs.push(collator.add_range_data(
            "front",
            room_cloud(t_front, WorldPoint::ZERO, 30, 3.0, 0.003),
        ));
        outputs.push(collator.add_range_data(
            "rear",
            room_cloud(t_rear, WorldPoint::new(-0.2, 0.0), 17, 3.0, 0.005),
        ));
        t_front += 100_000;
        t_rear += 75_000;
    }

    let non_empty: Vec<_> = outputs.iter().filter(|m| !m.is_empty()).collect();
    assert!(non_empty.len() > 5);
    for merged in non_empty {
        let times: Vec<f32> = merged.measurements.iter().map(|m| m.point.time).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]), "unsorted: {times:?}");
        assert!(merged.measurements.iter().all(|m| m.origin_index < merged.origins.len()));
    }
}

#[test]
fn test_two_sensors_same_timestamp_union() {
    let mut collator = RangeDataCollator::new(["a", "b"]);
    let origin_a = WorldPoint::new(0.0, 0.0);
    let origin_b = WorldPoint::new(1.0, 1.0);
    let points_a = [(1.0, 0.0), (2.0, 0.0)];
    let points_b = [(1.0, 2.0), (1.0, 3.0), (1.0, 4.0)];

    assert!(
        collator
            .add_range_data("a", static_cloud(500_000, origin_a, &points_a))
            .is_empty()
    );
    let merged = collator.add_range_data("b", static_cloud(500_000, origin_b, &points_b));

    assert_eq!(merged.timestamp_us, 500_000);
    assert_eq!(merged.measurements.len(), 5);
    assert_eq!(collator.pending_count(), 0);
    for m in &merged.measurements {
        let p = (m.point.position.x, m.point.position.y);
        let expected = if points_a.contains(&p) { origin_a } else { origin_b };
        assert_eq!(merged.origin_of(m), expected);
    }
}

#[test]
fn test_lifecycle_after_threshold_plus_one() {
    let threshold = 5;
    let mut builder = make_builder(&["scan"], threshold, GridType::Probability);
    let mut evicted = Vec::new();

    for i in 0..=threshold {
        let cloud = room_cloud(
            (i as u64 + 1) * 100_000,
            WorldPoint::new(i as f32 * 0.05, 0.0),
            60,
            2.5,
            0.001,
        );
        let result = builder.add_range_data("scan", cloud).unwrap();
        let expected_live = if i == 0 { 1 } else { 2 };
        assert_eq!(result.submaps.len(), expected_live);
        evicted.extend(result.finished);
    }

    assert_eq!(evicted.len(), 1);
    assert_eq!(evicted[0].id(), SubmapId::new(0));
    assert!(evicted[0].is_finished());
    assert_eq!(evicted[0].num_range_data(), threshold);
    assert_eq!(builder.submaps().len(), 2);
}

#[test]
fn test_tsdf_pipeline() {
    let mut builder = make_builder(&["scan"], 3, GridType::Tsdf);
    for i in 0..4u64 {
        let cloud = room_cloud((i + 1) * 100_000, WorldPoint::ZERO, 90, 2.0, 0.001);
        builder.add_range_data("scan", cloud).unwrap();
    }

    let submap = &builder.submaps()[0];
    let tsdf = submap.grid().as_tsdf().unwrap();
    let wall = tsdf.limits().cell_index(WorldPoint::new(2.0, 0.0));
    let (tsd, weight) = tsdf.get_tsd_and_weight(wall);
    assert!(tsd.abs() < 0.1);
    assert!(weight > 0.0);
}
