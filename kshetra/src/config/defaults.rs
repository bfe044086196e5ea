//! Default value functions for serde deserialization.

use crate::grid::GridType;

pub fn resolution() -> f32 {
    0.05
}

pub fn initial_size() -> usize {
    100
}

pub fn grid_type() -> GridType {
    GridType::Probability
}

pub fn hit_probability() -> f32 {
    0.55
}

pub fn miss_probability() -> f32 {
    0.49
}

pub fn enabled() -> bool {
    true
}

pub fn truncation_distance() -> f32 {
    0.3
}

pub fn max_weight() -> f32 {
    10.0
}

pub fn update_weight() -> f32 {
    1.0
}

pub fn num_range_data() -> usize {
    90
}

pub fn min_range() -> f32 {
    0.0
}

pub fn max_range() -> f32 {
    30.0
}

pub fn missing_data_ray_length() -> f32 {
    5.0
}

pub fn sensor_ids() -> Vec<String> {
    vec!["scan".to_string()]
}
