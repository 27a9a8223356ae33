//! Pentagram engine crate.
//!
//! Star geometry, uniform packing, rotation animation and the wgpu pipeline
//! that draws animated pentagrams, plus the platform + GPU runtime that hosts
//! them in winit windows.

pub mod config;
pub mod geometry;
pub mod animation;

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
