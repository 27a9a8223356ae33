/// Errors produced while reading or validating a shape configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse shape config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} has a channel outside [0, 1]")]
    ColorOutOfRange { field: &'static str },
    #[error("opacity {0} is outside [0, 1]")]
    OpacityOutOfRange(f32),
    #[error("animation speed must be a positive number of milliseconds, got {0}")]
    InvalidSpeed(f64),
    #[error("outer radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
}
