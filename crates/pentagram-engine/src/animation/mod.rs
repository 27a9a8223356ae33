//! Rotation animation.
//!
//! The controller assumes a nominal display refresh and derives a fixed angular
//! increment per tick from the configured milliseconds-per-revolution. It holds
//! no timing state of its own; one call to `advance` is one tick.

mod controller;

pub use controller::{
    rotation_step, AnimationController, AnimationPhase, RotationPolicy, Tick, FRAME_INTERVAL_MS,
};
