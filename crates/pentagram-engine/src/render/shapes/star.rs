use wgpu::util::DeviceExt;

use crate::config::{FieldConfig, ShapeConfig};
use crate::geometry::InstancePool;
use crate::render::driver::{CancelToken, FrameDriver, FrameSink, Schedule};
use crate::render::pipeline::{PipelineConfig, StarVariant};
use crate::render::{RenderCtx, RenderTarget, RendererError};
use crate::time::FrameTime;

/// Renderer for one star shape: outline, filled, or an instanced field.
///
/// Lifecycle is `Uninitialized → Ready → Stopped`. Every per-frame call is a
/// silent no-op outside `Ready`, and `Stopped` is terminal.
pub struct StarRenderer {
    config: ShapeConfig,
    variant: StarVariant,
    state: RendererState,
}

enum RendererState {
    Uninitialized,
    Ready(Box<StarResources>),
    Stopped,
}

struct StarResources {
    gpu: GpuResources,
    driver: FrameDriver,
}

struct GpuResources {
    pipeline: PipelineConfig,
    render_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_ubo: wgpu::Buffer,

    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,

    instance_vbo: Option<wgpu::Buffer>,
    instance_count: u32,

    msaa: Option<MsaaTarget>,
    clear: wgpu::Color,
}

/// Multisampled color attachment resolved into the frame view.
struct MsaaTarget {
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    size: (u32, u32),
}

impl StarRenderer {
    /// Outline or filled star, from `config.fill`.
    pub fn new(config: ShapeConfig) -> Self {
        let variant = StarVariant::from_config(&config);
        Self {
            config,
            variant,
            state: RendererState::Uninitialized,
        }
    }

    /// Drifting star field. `config.color` colors every instance.
    pub fn field(config: ShapeConfig, field: FieldConfig) -> Self {
        Self {
            config,
            variant: StarVariant::Field(field),
            state: RendererState::Uninitialized,
        }
    }

    pub fn config(&self) -> &ShapeConfig {
        &self.config
    }

    pub fn variant(&self) -> &StarVariant {
        &self.variant
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, RendererState::Ready(_))
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        matches!(self.state, RendererState::Stopped)
    }

    /// Clear color for frames this renderer draws into.
    pub fn clear_color(&self) -> wgpu::Color {
        to_wgpu_color(&self.config)
    }

    /// Validates the config, allocates buffers, builds the pipeline and starts
    /// the animation if one is configured.
    pub fn initialize(&mut self, ctx: &RenderCtx<'_>) -> Result<(), RendererError> {
        match self.state {
            RendererState::Ready(_) => return Err(RendererError::AlreadyInitialized),
            RendererState::Stopped => return Err(RendererError::Stopped),
            RendererState::Uninitialized => {}
        }

        self.config.validate()?;

        let gpu = GpuResources::create(ctx, &self.config, &self.variant);
        let mut driver = FrameDriver::new(&self.config, &self.variant);
        driver.start();

        log::debug!(
            "star renderer ready: {:?}, {} indices, {} instances",
            self.variant,
            gpu.index_count,
            gpu.instance_count
        );

        self.state = RendererState::Ready(Box::new(StarResources { gpu, driver }));
        Ok(())
    }

    /// Draws the current state without advancing the animation.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let RendererState::Ready(res) = &mut self.state else { return };
        let StarResources { gpu, driver } = res.as_mut();

        gpu.ensure_msaa_target(ctx);
        let mut sink = GpuSink { queue: ctx.queue, gpu, target };
        driver.redraw(&mut sink);
    }

    /// Runs one animation tick and reports whether another should be scheduled.
    pub fn tick(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        time: FrameTime,
    ) -> Schedule {
        let RendererState::Ready(res) = &mut self.state else {
            return Schedule::Done;
        };
        let StarResources { gpu, driver } = res.as_mut();

        gpu.ensure_msaa_target(ctx);
        let mut sink = GpuSink { queue: ctx.queue, gpu, target };
        driver.tick(time, &mut sink)
    }

    /// True while ticks should keep being scheduled.
    pub fn is_animating(&self) -> bool {
        match &self.state {
            RendererState::Ready(res) => !res.driver.is_finished(),
            _ => false,
        }
    }

    /// Handle that stops the animation from outside the frame loop. Returns
    /// `None` before initialization or after `stop`.
    pub fn cancel_token(&self) -> Option<CancelToken> {
        match &self.state {
            RendererState::Ready(res) => Some(res.driver.cancel_token()),
            _ => None,
        }
    }

    /// Cancels pending ticks and releases GPU resources. Idempotent.
    pub fn stop(&mut self) {
        match std::mem::replace(&mut self.state, RendererState::Stopped) {
            RendererState::Ready(mut res) => {
                res.driver.cancel();
                log::debug!(
                    "star renderer stopped after {} frames at rotation {:.4}",
                    res.driver.frames(),
                    res.driver.rotation()
                );
            }
            RendererState::Uninitialized => log::debug!("star renderer stopped before initialization"),
            RendererState::Stopped => {}
        }
    }
}

impl GpuResources {
    fn create(ctx: &RenderCtx<'_>, config: &ShapeConfig, variant: &StarVariant) -> Self {
        let pipeline = PipelineConfig::select(config, variant);
        let (render_pipeline, bind_group_layout) = pipeline.build(ctx.device, ctx.surface_format);

        // Field stars are unit-size and scaled per instance.
        let outer_radius = if variant.is_instanced() { 1.0 } else { config.radius };
        let geometry = variant.geometry(outer_radius);

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pentagram star vbo"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pentagram star ibo"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let (instance_vbo, instance_count) = match variant {
            StarVariant::Field(field) => {
                let pool = InstancePool::seeded(field.count as usize, field.seed);
                let vbo = (!pool.is_empty()).then(|| {
                    ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("pentagram star instance vbo"),
                        contents: bytemuck::cast_slice(pool.instances()),
                        usage: wgpu::BufferUsages::VERTEX,
                    })
                });
                (vbo, pool.len() as u32)
            }
            _ => (None, 1),
        };

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pentagram star ubo"),
            size: pipeline.uniforms.size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pentagram star bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            render_pipeline,
            bind_group,
            uniform_ubo,
            vbo,
            ibo,
            index_count: geometry.index_count(),
            instance_vbo,
            instance_count,
            msaa: None,
            clear: to_wgpu_color(config),
        }
    }

    /// (Re)creates the multisample attachment when the surface size or format changed.
    fn ensure_msaa_target(&mut self, ctx: &RenderCtx<'_>) {
        if !self.pipeline.multisampled() {
            return;
        }
        let (w, h) = ctx.surface_size;
        if w == 0 || h == 0 {
            return;
        }
        if let Some(msaa) = &self.msaa {
            if msaa.size == (w, h) && msaa.format == ctx.surface_format {
                return;
            }
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("pentagram star msaa"),
            size: wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: self.pipeline.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.surface_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        log::debug!("msaa target resized to {w}x{h}");
        self.msaa = Some(MsaaTarget {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            format: ctx.surface_format,
            size: (w, h),
        });
    }
}

/// `FrameSink` over a live queue and encoder.
struct GpuSink<'s, 't> {
    queue: &'s wgpu::Queue,
    gpu: &'s GpuResources,
    target: &'s mut RenderTarget<'t>,
}

impl FrameSink for GpuSink<'_, '_> {
    fn write_uniforms(&mut self, bytes: &[u8]) {
        self.queue.write_buffer(&self.gpu.uniform_ubo, 0, bytes);
    }

    fn draw(&mut self) {
        let gpu = self.gpu;

        // Multisampled: clear the MSAA attachment and resolve into the frame.
        // Otherwise draw over the frame view, which the caller has cleared.
        let (view, resolve_target, ops) = match &gpu.msaa {
            Some(msaa) => (
                &msaa.view,
                Some(self.target.color_view),
                wgpu::Operations {
                    load: wgpu::LoadOp::Clear(gpu.clear),
                    store: wgpu::StoreOp::Discard,
                },
            ),
            None if gpu.pipeline.multisampled() => return,
            None => (
                self.target.color_view,
                None,
                wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            ),
        };

        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pentagram star pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops,
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&gpu.render_pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu.vbo.slice(..));
        if gpu.pipeline.instanced {
            let Some(instance_vbo) = gpu.instance_vbo.as_ref() else { return };
            rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        }
        rpass.set_index_buffer(gpu.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..gpu.index_count, 0, 0..gpu.instance_count);
    }
}

fn to_wgpu_color(config: &ShapeConfig) -> wgpu::Color {
    match config.background {
        Some(c) => wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: 1.0,
        },
        None => wgpu::Color::TRANSPARENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Animation, Rgb};

    #[test]
    fn new_picks_variant_from_fill() {
        let outline = StarRenderer::new(ShapeConfig::new(Rgb::white()));
        let filled = StarRenderer::new(ShapeConfig::new(Rgb::white()).filled(true));
        assert_eq!(*outline.variant(), StarVariant::Outline);
        assert_eq!(*filled.variant(), StarVariant::Filled);
    }

    #[test]
    fn uninitialized_is_inert() {
        let r = StarRenderer::new(ShapeConfig::new(Rgb::white()).animated(Animation::infinite(3000.0)));
        assert!(!r.is_ready());
        assert!(!r.is_animating());
        assert!(r.cancel_token().is_none());
    }

    #[test]
    fn stop_is_terminal_and_idempotent() {
        let mut r = StarRenderer::field(ShapeConfig::new(Rgb::white()), FieldConfig::default());
        r.stop();
        r.stop();
        assert!(r.is_stopped());
        assert!(!r.is_ready());
        assert!(!r.is_animating());
    }

    #[test]
    fn clear_color_defaults_to_transparent() {
        let r = StarRenderer::new(ShapeConfig::new(Rgb::white()));
        assert_eq!(r.clear_color(), wgpu::Color::TRANSPARENT);

        let r = StarRenderer::new(ShapeConfig::new(Rgb::white()).with_background(Rgb::new(1.0, 1.0, 1.0)));
        assert_eq!(r.clear_color(), wgpu::Color::WHITE);
    }
}
