use std::f64::consts::{PI, TAU};

use crate::config::{Animation, Rotate};

/// Nominal display refresh period in milliseconds.
pub const FRAME_INTERVAL_MS: f64 = 16.7;

/// Angular increment per tick for a revolution lasting `speed_ms`.
#[inline]
pub fn rotation_step(speed_ms: f64) -> f64 {
    TAU / (speed_ms / FRAME_INTERVAL_MS)
}

/// How rotation evolves while running.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RotationPolicy {
    /// Spin forever, rotation kept in `[0, 2π)`.
    Infinite,
    /// Rotate until `target` radians is reached or passed.
    Bounded { target: f64 },
}

impl From<Rotate> for RotationPolicy {
    fn from(rotate: Rotate) -> Self {
        match rotate {
            Rotate::Infinite => RotationPolicy::Infinite,
            Rotate::Degrees(deg) => RotationPolicy::Bounded {
                target: deg * (PI / 180.0),
            },
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AnimationPhase {
    /// Not started, or no animation configured.
    Idle,
    Running,
    /// Cancelled or target reached. Terminal.
    Stopped,
}

/// Result of one tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Tick {
    /// Draw this frame and schedule another.
    Continue,
    /// Draw this frame, then schedule nothing.
    Last,
    /// Draw nothing.
    Halted,
}

/// Per-renderer rotation state machine (`Idle → Running → Stopped`).
#[derive(Debug, Clone)]
pub struct AnimationController {
    policy: Option<RotationPolicy>,
    step: f64,
    rotation: f64,
    steps_taken: u64,
    phase: AnimationPhase,
}

impl AnimationController {
    /// Controller for an optional animation block. `None` yields a static shape.
    pub fn new(animation: Option<&Animation>) -> Self {
        match animation {
            Some(a) => Self::with_step(a.rotate.into(), rotation_step(a.speed)),
            None => Self {
                policy: None,
                step: 0.0,
                rotation: 0.0,
                steps_taken: 0,
                phase: AnimationPhase::Idle,
            },
        }
    }

    /// Controller with an explicit per-tick increment.
    pub fn with_step(policy: RotationPolicy, step: f64) -> Self {
        Self {
            policy: Some(policy),
            step,
            rotation: 0.0,
            steps_taken: 0,
            phase: AnimationPhase::Idle,
        }
    }

    /// `Idle → Running` when an animation is configured; no-op otherwise.
    pub fn start(&mut self) -> AnimationPhase {
        if self.phase == AnimationPhase::Idle && self.policy.is_some() {
            self.phase = AnimationPhase::Running;
        }
        self.phase
    }

    /// Moves to `Stopped`. Idempotent.
    pub fn stop(&mut self) {
        self.phase = AnimationPhase::Stopped;
    }

    /// Advances one tick.
    ///
    /// A bounded rotation is not clamped: the final value may pass the target
    /// by up to one step.
    pub fn advance(&mut self) -> Tick {
        match (self.phase, self.policy) {
            (AnimationPhase::Stopped, _) => Tick::Halted,
            (AnimationPhase::Idle, _) | (AnimationPhase::Running, None) => Tick::Last,
            (AnimationPhase::Running, Some(RotationPolicy::Infinite)) => {
                self.rotation = (self.rotation + self.step) % TAU;
                Tick::Continue
            }
            (AnimationPhase::Running, Some(RotationPolicy::Bounded { target })) => {
                if self.rotation < target {
                    // Derived from the step count so exact multiples land on the target.
                    self.steps_taken += 1;
                    self.rotation = self.steps_taken as f64 * self.step;
                }
                if self.rotation >= target {
                    log::debug!(
                        "rotation target {target:.4} reached at {:.4} after {} steps",
                        self.rotation,
                        self.steps_taken
                    );
                    self.phase = AnimationPhase::Stopped;
                    Tick::Last
                } else {
                    Tick::Continue
                }
            }
        }
    }

    /// Current rotation in radians.
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[inline]
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    #[inline]
    pub fn policy(&self) -> Option<RotationPolicy> {
        self.policy
    }
}
