use std::path::Path;

use anyhow::{Context, Result};
use pentagram_engine::config::{Animation, Effects, FieldConfig, Gradient, Rgb, ShapeConfig};
use pentagram_engine::render::shapes::StarRenderer;
use pentagram_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// One window's worth of content.
#[derive(Debug, Clone)]
pub struct Scene {
    pub title: String,
    pub shape: ShapeConfig,
    pub field: Option<FieldConfig>,
}

impl Scene {
    pub fn renderer(&self) -> StarRenderer {
        match self.field {
            Some(field) => StarRenderer::field(self.shape.clone(), field),
            None => StarRenderer::new(self.shape.clone()),
        }
    }

    pub fn window_config(&self, tag: usize) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(640.0, 640.0),
            tag: tag as u64,
        }
    }

    /// Reads and validates a JSON shape config.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let shape = ShapeConfig::from_json_str(&text)
            .with_context(|| format!("invalid shape config in {}", path.display()))?;

        Ok(Self {
            title: format!("pentagram · {}", path.display()),
            shape,
            field: None,
        })
    }
}

/// Built-in scenes shown when no config files are given.
pub fn demo_scenes() -> Vec<Scene> {
    let outline = ShapeConfig::new(Rgb::new(0.0, 0.0, 1.0))
        .animated(Animation::infinite(3000.0))
        .with_background(Rgb::white());

    let gradient = ShapeConfig::new(Rgb::new(1.0, 0.0, 0.0))
        .filled(true)
        .animated(Animation::bounded(720.0, 3000.0))
        .with_effects(Effects {
            gradient: Some(Gradient {
                inner_color: Rgb::new(1.0, 0.9, 0.0),
                outer_color: Rgb::new(0.8, 0.0, 0.2),
            }),
            opacity: Some(0.8),
            antialiasing: Some(true),
        })
        .with_background(Rgb::new(0.07, 0.07, 0.09));

    let field = ShapeConfig::new(Rgb::new(1.0, 0.85, 0.2))
        .with_background(Rgb::new(0.02, 0.02, 0.08));

    vec![
        Scene {
            title: "pentagram · outline".to_string(),
            shape: outline,
            field: None,
        },
        Scene {
            title: "pentagram · gradient".to_string(),
            shape: gradient,
            field: None,
        },
        Scene {
            title: "pentagram · field".to_string(),
            shape: field,
            field: Some(FieldConfig { seed: 7, ..FieldConfig::default() }),
        },
    ]
}
