//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue, configures the per-window
//! surface and hands out frames. Setup failures are `GpuError`s; steady-state
//! surface errors map to a `SurfaceErrorAction`.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::{GpuError, SurfaceErrorAction};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
