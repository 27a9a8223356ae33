//! Star geometry generation.
//!
//! Pure CPU-side functions producing the static vertex/index data uploaded once
//! at renderer setup, plus the per-instance parameters of the particle field.
//!
//! Convention:
//! - positions are in NDC-like model space centered on the origin
//! - perimeter vertices interleave outer and inner radius, starting at −90°

mod instances;
mod star;

pub use instances::{wrap_axis, InstancePool, StarInstance};
pub use star::{
    fan_indices, filled_indices, generate_indices, generate_vertices, golden_inner_radius,
    outline_indices, StarGeometry, StarVertex, GOLDEN_INNER_RATIO, POINT_COUNT,
};
