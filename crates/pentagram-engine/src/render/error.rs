use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by `StarRenderer::initialize`.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("invalid shape config: {0}")]
    Config(#[from] ConfigError),

    #[error("renderer was stopped and cannot be initialized again")]
    Stopped,

    #[error("renderer is already initialized")]
    AlreadyInitialized,
}
