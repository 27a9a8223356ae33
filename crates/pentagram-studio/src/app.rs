use std::collections::HashMap;

use pentagram_engine::core::{App, AppControl, FrameCtx};
use pentagram_engine::render::Schedule;
use pentagram_engine::render::shapes::StarRenderer;
use pentagram_engine::window::RuntimeConfig;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use crate::scenes::Scene;

/// Hosts one `StarRenderer` per window.
pub struct StudioApp {
    scenes: Vec<Scene>,
    windows: HashMap<WindowId, Slot>,
}

struct Slot {
    renderer: StarRenderer,
    /// A tick is pending; the next redraw advances the animation.
    armed: bool,
}

impl StudioApp {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self {
            scenes,
            windows: HashMap::new(),
        }
    }
}

impl App for StudioApp {
    fn on_window_created(&mut self, window_id: WindowId, config: &RuntimeConfig) {
        let Some(scene) = self.scenes.get(config.tag as usize) else {
            log::warn!("no scene for window {window_id:?} (tag {})", config.tag);
            return;
        };
        self.windows.insert(
            window_id,
            Slot {
                renderer: scene.renderer(),
                armed: true,
            },
        );
    }

    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => return AppControl::Exit,
                    PhysicalKey::Code(KeyCode::Space) => {
                        if let Some(slot) = self.windows.get_mut(&window_id) {
                            slot.renderer.stop();
                            slot.armed = false;
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::CloseRequested => {
                if let Some(mut slot) = self.windows.remove(&window_id) {
                    slot.renderer.stop();
                }
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(slot) = self.windows.get_mut(&ctx.window.id) else {
            return AppControl::Continue;
        };

        let clear = slot.renderer.clear_color();
        let time = ctx.time;
        let armed = slot.armed;
        let renderer = &mut slot.renderer;

        let mut init_error = None;
        let mut schedule = None;

        let control = ctx.render(clear, |rctx, target| {
            if !renderer.is_ready() && !renderer.is_stopped() {
                if let Err(e) = renderer.initialize(rctx) {
                    init_error = Some(e);
                    return;
                }
            }

            if armed {
                schedule = Some(renderer.tick(rctx, target, time));
            } else {
                renderer.render(rctx, target);
            }
        });

        if let Some(e) = init_error {
            log::error!("renderer initialization failed: {e}");
            return AppControl::Exit;
        }

        // A skipped frame keeps the pending tick.
        if let Some(schedule) = schedule {
            slot.armed = schedule == Schedule::Rearm;
        }
        if slot.armed {
            ctx.request_redraw();
        }

        control
    }
}
