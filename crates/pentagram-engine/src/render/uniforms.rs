//! Uniform block layouts consumed by the star shaders.
//!
//! Every layout is written in full before every draw. Field order and size are
//! fixed per pipeline and must match the WGSL `Uniforms` struct of the shader
//! paired with the layout in `pipeline`.

use bytemuck::{Pod, Zeroable};

use crate::config::ShapeConfig;
use crate::render::pipeline::StarVariant;

/// `[rotation, r, g, b]` (16 bytes). Used by shapes without effects.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SimpleUniform {
    pub rotation: f32,
    pub color: [f32; 3],
}

impl SimpleUniform {
    pub fn pack(rotation: f32, config: &ShapeConfig) -> Self {
        let c = config.color;
        Self {
            rotation,
            color: [c.r, c.g, c.b],
        }
    }

    pub fn to_floats(&self) -> [f32; 4] {
        [self.rotation, self.color[0], self.color[1], self.color[2]]
    }
}

/// Rotation, gradient colors, gradient flag and opacity (64 bytes).
///
/// Layout (WGSL uniform alignment, vec4 members on 16-byte boundaries):
///
///  offset  0  rotation          f32
///  offset 16  inner_color       [f32; 4]
///  offset 32  outer_color       [f32; 4]
///  offset 48  gradient_enabled  f32   (exactly 0.0 or 1.0)
///  offset 52  opacity           f32
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ExtendedUniform {
    pub rotation: f32,
    pub _pad0: [f32; 3],
    pub inner_color: [f32; 4],
    pub outer_color: [f32; 4],
    pub gradient_enabled: f32,
    pub opacity: f32,
    pub _pad1: [f32; 2],
}

impl ExtendedUniform {
    /// Without a gradient, both colors collapse to the base color.
    pub fn pack(rotation: f32, config: &ShapeConfig) -> Self {
        let (inner, outer, enabled) = match config.gradient() {
            Some(g) => (g.inner_color, g.outer_color, 1.0),
            None => (config.color, config.color, 0.0),
        };
        Self {
            rotation,
            _pad0: [0.0; 3],
            inner_color: inner.with_alpha(1.0),
            outer_color: outer.with_alpha(1.0),
            gradient_enabled: enabled,
            opacity: config.opacity(),
            _pad1: [0.0; 2],
        }
    }

    /// The eleven logical values in block order, without alignment padding.
    pub fn to_floats(&self) -> [f32; 11] {
        let [ir, ig, ib, ia] = self.inner_color;
        let [or, og, ob, oa] = self.outer_color;
        [
            self.rotation,
            ir,
            ig,
            ib,
            ia,
            or,
            og,
            ob,
            oa,
            self.gradient_enabled,
            self.opacity,
        ]
    }
}

/// `[elapsed_seconds, r, g, b]` (16 bytes). Used by the particle field.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FieldUniform {
    pub elapsed: f32,
    pub color: [f32; 3],
}

impl FieldUniform {
    pub fn pack(elapsed: f32, config: &ShapeConfig) -> Self {
        let c = config.color;
        Self {
            elapsed,
            color: [c.r, c.g, c.b],
        }
    }
}

/// Which block a pipeline consumes. Chosen once at setup.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformLayout {
    Simple,
    Extended,
    Field,
}

impl UniformLayout {
    pub fn select(config: &ShapeConfig, variant: &StarVariant) -> Self {
        match variant {
            StarVariant::Field(_) => UniformLayout::Field,
            _ if config.effects.is_some() => UniformLayout::Extended,
            _ => UniformLayout::Simple,
        }
    }

    /// Buffer size in bytes.
    pub const fn size(self) -> u64 {
        let bytes = match self {
            UniformLayout::Simple => std::mem::size_of::<SimpleUniform>(),
            UniformLayout::Extended => std::mem::size_of::<ExtendedUniform>(),
            UniformLayout::Field => std::mem::size_of::<FieldUniform>(),
        };
        bytes as u64
    }

    pub fn min_binding_size(self) -> std::num::NonZeroU64 {
        // All three blocks are non-empty structs.
        std::num::NonZeroU64::new(self.size()).unwrap_or(std::num::NonZeroU64::MIN)
    }

    /// Packs the current animation state into this layout.
    pub fn pack(self, config: &ShapeConfig, state: UniformInput) -> UniformBlock {
        match self {
            UniformLayout::Simple => UniformBlock::Simple(SimpleUniform::pack(state.rotation, config)),
            UniformLayout::Extended => {
                UniformBlock::Extended(ExtendedUniform::pack(state.rotation, config))
            }
            UniformLayout::Field => UniformBlock::Field(FieldUniform::pack(state.elapsed, config)),
        }
    }
}

/// Mutable per-frame state feeding a uniform block.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UniformInput {
    /// Radians.
    pub rotation: f32,
    /// Seconds since the renderer started.
    pub elapsed: f32,
}

/// A packed block ready for `Queue::write_buffer`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformBlock {
    Simple(SimpleUniform),
    Extended(ExtendedUniform),
    Field(FieldUniform),
}

impl UniformBlock {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniformBlock::Simple(u) => bytemuck::bytes_of(u),
            UniformBlock::Extended(u) => bytemuck::bytes_of(u),
            UniformBlock::Field(u) => bytemuck::bytes_of(u),
        }
    }

    pub fn layout(&self) -> UniformLayout {
        match self {
            UniformBlock::Simple(_) => UniformLayout::Simple,
            UniformBlock::Extended(_) => UniformLayout::Extended,
            UniformBlock::Field(_) => UniformLayout::Field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Effects, FieldConfig, Gradient, Rgb};

    fn blue() -> ShapeConfig {
        ShapeConfig::new(Rgb::new(0.0, 0.0, 1.0)).filled(true)
    }

    fn gradient() -> Gradient {
        Gradient {
            inner_color: Rgb::new(1.0, 0.0, 0.0),
            outer_color: Rgb::new(0.0, 1.0, 0.0),
        }
    }

    // ── sizes ─────────────────────────────────────────────────────────────

    #[test]
    fn block_sizes_match_shader_structs() {
        assert_eq!(UniformLayout::Simple.size(), 16);
        assert_eq!(UniformLayout::Extended.size(), 64);
        assert_eq!(UniformLayout::Field.size(), 16);
    }

    #[test]
    fn extended_offsets_follow_wgsl_alignment() {
        let u = ExtendedUniform::pack(0.5, &blue());
        let words: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(words.len(), 16);
        assert_eq!(words[0], 0.5);
        assert_eq!(&words[4..8], &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(&words[8..12], &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(words[12], 0.0);
        assert_eq!(words[13], 1.0);
    }

    // ── simple ────────────────────────────────────────────────────────────

    #[test]
    fn simple_is_rotation_then_color() {
        let u = SimpleUniform::pack(1.25, &ShapeConfig::new(Rgb::new(0.1, 0.2, 0.3)));
        assert_eq!(u.to_floats(), [1.25, 0.1, 0.2, 0.3]);
    }

    // ── extended ──────────────────────────────────────────────────────────

    #[test]
    fn no_gradient_collapses_to_base_color() {
        let config = blue().with_effects(Effects {
            antialiasing: Some(true),
            ..Effects::default()
        });
        let u = ExtendedUniform::pack(0.0, &config);
        assert_eq!(u.inner_color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(u.outer_color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(u.gradient_enabled, 0.0);
        assert_eq!(u.opacity, 1.0);
    }

    #[test]
    fn gradient_colors_are_packed() {
        let config = blue().with_effects(Effects {
            gradient: Some(gradient()),
            opacity: Some(0.8),
            antialiasing: None,
        });
        let u = ExtendedUniform::pack(2.0, &config);
        assert_eq!(
            u.to_floats(),
            [2.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.8]
        );
    }

    #[test]
    fn gradient_flag_is_binary() {
        let with = blue().with_effects(Effects {
            gradient: Some(gradient()),
            ..Effects::default()
        });
        let without = blue().with_effects(Effects::default());
        for config in [with, without] {
            let flag = ExtendedUniform::pack(0.0, &config).gradient_enabled;
            assert!(flag == 0.0 || flag == 1.0);
        }
    }

    #[test]
    fn opacity_is_packed_exactly() {
        let config = blue().with_effects(Effects {
            opacity: Some(0.8),
            ..Effects::default()
        });
        assert_eq!(ExtendedUniform::pack(0.0, &config).opacity, 0.8);
    }

    // ── layout selection ──────────────────────────────────────────────────

    #[test]
    fn layout_follows_effects_and_variant() {
        let plain = blue();
        let fx = blue().with_effects(Effects::default());
        let filled = StarVariant::from_config(&plain);
        let field = StarVariant::Field(FieldConfig::default());

        assert_eq!(UniformLayout::select(&plain, &filled), UniformLayout::Simple);
        assert_eq!(UniformLayout::select(&fx, &filled), UniformLayout::Extended);
        assert_eq!(UniformLayout::select(&fx, &field), UniformLayout::Field);
    }

    #[test]
    fn packed_bytes_match_layout_size() {
        let config = blue();
        let input = UniformInput { rotation: 0.3, elapsed: 4.0 };
        for layout in [UniformLayout::Simple, UniformLayout::Extended, UniformLayout::Field] {
            let block = layout.pack(&config, input);
            assert_eq!(block.layout(), layout);
            assert_eq!(block.as_bytes().len() as u64, layout.size());
        }
    }

    #[test]
    fn field_block_carries_elapsed_time() {
        let block = UniformLayout::Field.pack(&blue(), UniformInput { rotation: 9.0, elapsed: 1.5 });
        let words: &[f32] = bytemuck::cast_slice(block.as_bytes());
        assert_eq!(words, &[1.5, 0.0, 0.0, 1.0]);
    }
}
