//! Shape renderers.

pub mod star;

pub use star::StarRenderer;
