use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

/// Number of points on every star this crate draws.
pub const POINT_COUNT: usize = 5;

/// Inner/outer radius ratio of a regular pentagram (1/φ²).
pub const GOLDEN_INNER_RATIO: f32 = 0.381966;

/// Inner radius producing a regular pentagram for the given outer radius.
#[inline]
pub fn golden_inner_radius(outer_radius: f32) -> f32 {
    outer_radius * GOLDEN_INNER_RATIO
}

/// One perimeter (or center) vertex, as uploaded to the vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StarVertex {
    pub pos: [f32; 2],
}

/// Perimeter vertices of a star.
///
/// Returns `2 * point_count` vertices. Even indices sit on `outer_radius`, odd
/// indices on `inner_radius`, and vertex `i` is at angle `−π/2 + i·π/point_count`.
pub fn generate_vertices(outer_radius: f32, inner_radius: f32, point_count: usize) -> Vec<StarVertex> {
    let perimeter = point_count * 2;
    (0..perimeter)
        .map(|i| {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = -PI / 2.0 + i as f32 * PI / point_count as f32;
            StarVertex {
                pos: [radius * angle.cos(), radius * angle.sin()],
            }
        })
        .collect()
}

#[inline]
fn outer(k: usize) -> u16 {
    (2 * k) as u16
}

#[inline]
fn inner(k: usize) -> u16 {
    (2 * k + 1) as u16
}

/// Line-list indices tracing the pentagram through the outer points.
///
/// Each segment joins outer point `k` to outer point `k + 2`, so the path visits
/// points 0 → 2 → 4 → 1 → 3 → 0 and yields `point_count` disjoint segments.
pub fn outline_indices(point_count: usize) -> Vec<u16> {
    (0..point_count)
        .flat_map(|j| {
            let from = (2 * j) % point_count;
            let to = (2 * (j + 1)) % point_count;
            [outer(from), outer(to)]
        })
        .collect()
}

/// Triangle-list indices covering the solid star.
///
/// The inner polygon is fanned from inner vertex 0 (`point_count − 2`
/// triangles), then each outer point is closed against the two inner vertices
/// flanking it (`point_count` triangles).
pub fn filled_indices(point_count: usize) -> Vec<u16> {
    let mut indices = Vec::with_capacity(3 * (2 * point_count - 2));

    for k in 1..point_count - 1 {
        indices.extend_from_slice(&[inner(0), inner(k), inner(k + 1)]);
    }

    for k in 0..point_count {
        let previous = (k + point_count - 1) % point_count;
        indices.extend_from_slice(&[outer(k), inner(k), inner(previous)]);
    }

    indices
}

/// Triangle-list fan around an extra center vertex at index `2 * point_count`.
///
/// Used with [`StarGeometry::fan`], whose vertex list has the origin appended.
pub fn fan_indices(point_count: usize) -> Vec<u16> {
    let perimeter = point_count * 2;
    let center = perimeter as u16;
    (0..perimeter)
        .flat_map(|i| [i as u16, ((i + 1) % perimeter) as u16, center])
        .collect()
}

/// Index topology for the five-pointed star in the requested fill mode.
pub fn generate_indices(fill: bool) -> Vec<u16> {
    if fill {
        filled_indices(POINT_COUNT)
    } else {
        outline_indices(POINT_COUNT)
    }
}

/// Static vertex + index data for one renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct StarGeometry {
    pub vertices: Vec<StarVertex>,
    pub indices: Vec<u16>,
}

impl StarGeometry {
    /// Pentagram outline (line list).
    pub fn outline(outer_radius: f32) -> Self {
        Self {
            vertices: perimeter(outer_radius),
            indices: outline_indices(POINT_COUNT),
        }
    }

    /// Solid star (triangle list).
    pub fn filled(outer_radius: f32) -> Self {
        Self {
            vertices: perimeter(outer_radius),
            indices: filled_indices(POINT_COUNT),
        }
    }

    /// Solid star triangulated around an appended center vertex.
    pub fn fan(outer_radius: f32) -> Self {
        let mut vertices = perimeter(outer_radius);
        vertices.push(StarVertex { pos: [0.0, 0.0] });
        Self {
            vertices,
            indices: fan_indices(POINT_COUNT),
        }
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

fn perimeter(outer_radius: f32) -> Vec<StarVertex> {
    generate_vertices(outer_radius, golden_inner_radius(outer_radius), POINT_COUNT)
}
