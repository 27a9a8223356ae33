mod app;
mod scenes;

use std::path::PathBuf;

use anyhow::Result;
use pentagram_engine::device::GpuInit;
use pentagram_engine::logging::{init_logging, LoggingConfig};
use pentagram_engine::window::Runtime;

use app::StudioApp;
use scenes::{demo_scenes, Scene};

/// Usage: `pentagram-studio [CONFIG.json ...]`
///
/// One window per config file. Without arguments the built-in demo scenes
/// are shown. Space stops the animation of the focused window, Escape quits.
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let scenes = if paths.is_empty() {
        demo_scenes()
    } else {
        paths
            .iter()
            .map(|p| Scene::from_file(p))
            .collect::<Result<Vec<_>>>()?
    };

    log::info!("opening {} window(s)", scenes.len());

    let windows = scenes
        .iter()
        .enumerate()
        .map(|(i, scene)| scene.window_config(i))
        .collect();

    Runtime::run(windows, GpuInit::default(), StudioApp::new(scenes))
}
