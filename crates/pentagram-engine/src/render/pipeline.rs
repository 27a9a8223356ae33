//! Static pipeline description selected from a `ShapeConfig` at setup time.
//!
//! Topology, blending, sample count and vertex layouts are pipeline
//! properties; changing any of them means building a new pipeline.

use crate::config::{FieldConfig, ShapeConfig};
use crate::geometry::{StarGeometry, StarInstance, StarVertex};

use super::uniforms::UniformLayout;

/// Sample count used when antialiasing is requested.
pub const MSAA_SAMPLE_COUNT: u32 = 4;

/// Which kind of star a renderer draws. Fixed for the renderer's lifetime.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StarVariant {
    /// Pentagram outline, line list.
    Outline,
    /// Solid star, triangle list.
    Filled,
    /// Many drifting solid stars, one instanced draw.
    Field(FieldConfig),
}

impl StarVariant {
    /// Outline or filled, from `config.fill`.
    pub fn from_config(config: &ShapeConfig) -> Self {
        if config.fill {
            StarVariant::Filled
        } else {
            StarVariant::Outline
        }
    }

    pub fn geometry(&self, outer_radius: f32) -> StarGeometry {
        match self {
            StarVariant::Outline => StarGeometry::outline(outer_radius),
            StarVariant::Filled => StarGeometry::filled(outer_radius),
            StarVariant::Field(_) => StarGeometry::fan(outer_radius),
        }
    }

    #[inline]
    pub fn is_instanced(&self) -> bool {
        matches!(self, StarVariant::Field(_))
    }
}

/// Source-over on color, complementary rule on alpha.
pub(crate) fn source_over_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

impl StarVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl StarInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x2, // position
        2 => Float32,   // scale
        3 => Float32,   // rotation
        4 => Float32x2, // velocity
        5 => Float32    // angular_velocity
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Everything needed to build the render pipeline for one renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PipelineConfig {
    pub topology: wgpu::PrimitiveTopology,
    pub blend: Option<wgpu::BlendState>,
    pub sample_count: u32,
    pub instanced: bool,
    pub uniforms: UniformLayout,
}

impl PipelineConfig {
    pub fn select(config: &ShapeConfig, variant: &StarVariant) -> Self {
        let topology = match variant {
            StarVariant::Outline => wgpu::PrimitiveTopology::LineList,
            StarVariant::Filled | StarVariant::Field(_) => wgpu::PrimitiveTopology::TriangleList,
        };

        Self {
            topology,
            blend: config.needs_blending().then(source_over_blend),
            sample_count: if config.antialiasing() { MSAA_SAMPLE_COUNT } else { 1 },
            instanced: variant.is_instanced(),
            uniforms: UniformLayout::select(config, variant),
        }
    }

    #[inline]
    pub fn multisampled(&self) -> bool {
        self.sample_count > 1
    }

    pub fn vertex_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'static>> {
        if self.instanced {
            vec![StarVertex::layout(), StarInstance::layout()]
        } else {
            vec![StarVertex::layout()]
        }
    }

    fn shader_source(&self) -> &'static str {
        match self.uniforms {
            UniformLayout::Simple => include_str!("shaders/star_simple.wgsl"),
            UniformLayout::Extended => include_str!("shaders/star_extended.wgsl"),
            UniformLayout::Field => include_str!("shaders/star_field.wgsl"),
        }
    }

    /// Creates the uniform bind group layout and the render pipeline.
    pub(crate) fn build(
        &self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pentagram star shader"),
            source: wgpu::ShaderSource::Wgsl(self.shader_source().into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pentagram star bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(self.uniforms.min_binding_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pentagram star pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let buffers = self.vertex_layouts();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pentagram star pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: self.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: self.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "built star pipeline: {:?}, samples={}, blend={}, uniforms={:?}",
            self.topology,
            self.sample_count,
            self.blend.is_some(),
            self.uniforms
        );

        (pipeline, bind_group_layout)
    }
}
