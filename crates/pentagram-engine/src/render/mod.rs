//! GPU rendering subsystem.
//!
//! Positions are in normalized device coordinates; the star sits at the
//! origin and the vertex shader applies rotation (or per-instance motion).
//!
//! - `pipeline` picks topology, blending and sample count from a `ShapeConfig`.
//! - `uniforms` packs per-frame state into the block the shader expects.
//! - `driver` sequences one tick: advance, write uniforms, draw, re-arm.
//! - `shapes::star` owns the GPU resources and plugs them into the driver.

mod ctx;
mod driver;
mod error;
mod pipeline;
pub mod shapes;
mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use driver::{CancelToken, FrameDriver, FrameSink, Schedule};
pub use error::RendererError;
pub use pipeline::{PipelineConfig, StarVariant, MSAA_SAMPLE_COUNT};
pub use uniforms::{
    ExtendedUniform, FieldUniform, SimpleUniform, UniformBlock, UniformInput, UniformLayout,
};
