//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Windows, and wires them to the GPU layer.
//! Redraws are demand-driven: each window redraws when the platform asks or
//! when the app arms one through `RuntimeCtx::request_redraw`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
