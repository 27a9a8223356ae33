//! Frame timing.
//!
//! One `FrameClock` per window; call `tick()` once per presented frame. The
//! rotation animation steps per tick and ignores wall time, while the particle
//! field reads `FrameTime::elapsed`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
