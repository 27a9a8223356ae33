use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-instance motion parameters of one drifting star.
///
/// Layout (28 bytes, instance step):
///
///  offset  0  position          [f32; 2]   loc 1
///  offset  8  scale             f32        loc 2
///  offset 12  rotation          f32        loc 3
///  offset 16  velocity          [f32; 2]   loc 4
///  offset 24  angular_velocity  f32        loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 2],
    pub scale: f32,
    pub rotation: f32,
    pub velocity: [f32; 2],
    pub angular_velocity: f32,
}

impl StarInstance {
    /// Draws one instance from `rng`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            position: [rng.gen_range(-0.8..0.8), rng.gen_range(-0.8..0.8)],
            scale: rng.gen_range(0.02..0.08),
            rotation: rng.gen_range(0.0..TAU),
            velocity: [rng.gen_range(-0.25..0.25), rng.gen_range(-0.25..0.25)],
            angular_velocity: rng.gen_range(-1.5..1.5),
        }
    }

    /// Wrapped position after `elapsed` seconds.
    ///
    /// Mirrors the vertex shader; the host never advances instances itself.
    pub fn position_at(&self, elapsed: f32) -> [f32; 2] {
        [
            wrap_axis(self.position[0] + self.velocity[0] * elapsed),
            wrap_axis(self.position[1] + self.velocity[1] * elapsed),
        ]
    }

    /// Unbounded rotation after `elapsed` seconds.
    pub fn rotation_at(&self, elapsed: f32) -> f32 {
        self.rotation + self.angular_velocity * elapsed
    }
}

/// Folds one coordinate back into `[-1, 1]`.
///
/// Values inside the range are returned as is. Outside it the axis is periodic
/// with period 2, so one crossing is a single ±2 shift and long runs keep
/// wrapping instead of leaving the screen.
#[inline]
pub fn wrap_axis(x: f32) -> f32 {
    if (-1.0..=1.0).contains(&x) {
        x
    } else {
        (x + 1.0).rem_euclid(2.0) - 1.0
    }
}

/// Instances of the particle field, generated once and never regenerated.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancePool {
    instances: Vec<StarInstance>,
}

impl InstancePool {
    /// Generates `count` instances from the injected generator.
    pub fn generate<R: Rng>(count: usize, rng: &mut R) -> Self {
        Self {
            instances: (0..count).map(|_| StarInstance::random(rng)).collect(),
        }
    }

    /// Generates `count` instances from a seeded `StdRng`.
    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::generate(count, &mut StdRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn instances(&self) -> &[StarInstance] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_28_bytes() {
        assert_eq!(std::mem::size_of::<StarInstance>(), 28);
    }

    #[test]
    fn generated_fields_stay_in_range() {
        let pool = InstancePool::seeded(500, 7);
        assert_eq!(pool.len(), 500);
        for inst in pool.instances() {
            assert!(inst.position.iter().all(|p| (-0.8..=0.8).contains(p)));
            assert!((0.02..=0.08).contains(&inst.scale));
            assert!((0.0..TAU).contains(&inst.rotation));
            assert!(inst.velocity.iter().all(|v| (-0.25..=0.25).contains(v)));
            assert!((-1.5..=1.5).contains(&inst.angular_velocity));
        }
    }

    #[test]
    fn same_seed_same_pool() {
        assert_eq!(InstancePool::seeded(32, 42), InstancePool::seeded(32, 42));
        assert_ne!(InstancePool::seeded(32, 42), InstancePool::seeded(32, 43));
    }

    #[test]
    fn empty_pool() {
        assert!(InstancePool::seeded(0, 1).is_empty());
    }

    #[test]
    fn wraps_past_right_edge() {
        let inst = StarInstance {
            position: [0.95, 0.0],
            scale: 0.05,
            rotation: 0.0,
            velocity: [0.5, 0.0],
            angular_velocity: 0.0,
        };
        let elapsed = 0.2;
        let raw = 0.95 + 0.5 * elapsed;
        assert!(raw > 1.0);
        let [x, y] = inst.position_at(elapsed);
        assert!((x - (raw - 2.0)).abs() < 1e-6);
        assert!((-1.0..=1.0).contains(&x));
        assert_eq!(y, 0.0);
    }

    #[test]
    fn wraps_past_left_edge() {
        assert!((wrap_axis(-1.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn long_runs_keep_wrapping() {
        let inst = StarInstance {
            position: [0.0, -0.5],
            scale: 0.05,
            rotation: 0.0,
            velocity: [0.25, -0.25],
            angular_velocity: 0.0,
        };
        for step in 0..400 {
            let [x, y] = inst.position_at(step as f32 * 0.5);
            assert!((-1.0..=1.0).contains(&x), "x = {x}");
            assert!((-1.0..=1.0).contains(&y), "y = {y}");
        }
        // 25.25 units from the origin folds to -0.75.
        assert!((inst.position_at(101.0)[0] + 0.75).abs() < 1e-4);
    }

    #[test]
    fn inside_range_is_untouched() {
        for x in [-1.0, -0.3, 0.0, 0.99, 1.0] {
            assert_eq!(wrap_axis(x), x);
        }
    }

    #[test]
    fn rotation_is_not_wrapped() {
        let inst = StarInstance {
            position: [0.0, 0.0],
            scale: 0.05,
            rotation: 1.0,
            velocity: [0.0, 0.0],
            angular_velocity: 1.5,
        };
        assert_eq!(inst.rotation_at(10.0), 16.0);
    }
}
