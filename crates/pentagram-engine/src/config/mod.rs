//! Shape configuration.
//!
//! A `ShapeConfig` is supplied once by the caller and never mutated after it is
//! handed to a renderer. Everything derived from it (geometry, pipeline state,
//! uniform layout) is fixed for the renderer's lifetime.

mod color;
mod error;
mod shape;

pub use color::Rgb;
pub use error::ConfigError;
pub use shape::{Animation, Effects, FieldConfig, Gradient, Rotate, ShapeConfig};
