use serde::{Deserialize, Serialize};

use super::{ConfigError, Rgb};

/// Outer radius used when a config does not name one (NDC units).
const DEFAULT_RADIUS: f32 = 0.8;

/// Instance count of the reference particle field.
const DEFAULT_FIELD_COUNT: u32 = 500;

/// Immutable description of one star shape.
///
/// JSON field names follow the camelCase schema used by the bootstrap layer:
///
/// ```json
/// {
///   "color": { "r": 0, "g": 0, "b": 1 },
///   "fill": true,
///   "animation": { "rotate": "infinite", "speed": 3000 },
///   "effects": {
///     "gradient": {
///       "innerColor": { "r": 1, "g": 0, "b": 0 },
///       "outerColor": { "r": 0, "g": 0, "b": 1 }
///     },
///     "opacity": 0.8,
///     "antialiasing": true
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeConfig {
    pub color: Rgb,

    /// Solid triangulated area when true, pentagram outline otherwise.
    #[serde(default)]
    pub fill: bool,

    /// `None` draws the shape once and never reschedules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Effects>,

    /// Outer radius in NDC units. The inner radius is derived from it.
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Clear color. `None` clears to transparent black.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
}

fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

impl ShapeConfig {
    /// Static outline in `color` with every other field at its default.
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            fill: false,
            animation: None,
            effects: None,
            radius: DEFAULT_RADIUS,
            background: None,
        }
    }

    pub fn filled(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn animated(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = Some(effects);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = Some(background);
        self
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.color.is_unit() {
            return Err(ConfigError::ColorOutOfRange { field: "color" });
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if let Some(bg) = self.background {
            if !bg.is_unit() {
                return Err(ConfigError::ColorOutOfRange { field: "background" });
            }
        }
        if let Some(anim) = &self.animation {
            if !(anim.speed.is_finite() && anim.speed > 0.0) {
                return Err(ConfigError::InvalidSpeed(anim.speed));
            }
        }
        if let Some(effects) = &self.effects {
            if let Some(g) = &effects.gradient {
                if !g.inner_color.is_unit() {
                    return Err(ConfigError::ColorOutOfRange { field: "effects.gradient.innerColor" });
                }
                if !g.outer_color.is_unit() {
                    return Err(ConfigError::ColorOutOfRange { field: "effects.gradient.outerColor" });
                }
            }
            if let Some(o) = effects.opacity {
                if !(o.is_finite() && (0.0..=1.0).contains(&o)) {
                    return Err(ConfigError::OpacityOutOfRange(o));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn gradient(&self) -> Option<&Gradient> {
        self.effects.as_ref().and_then(|e| e.gradient.as_ref())
    }

    /// Configured opacity, `1.0` when absent.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.effects.as_ref().and_then(|e| e.opacity).unwrap_or(1.0)
    }

    #[inline]
    pub fn antialiasing(&self) -> bool {
        self.effects.as_ref().and_then(|e| e.antialiasing).unwrap_or(false)
    }

    /// True when the shape needs alpha compositing (gradient or opacity present).
    #[inline]
    pub fn needs_blending(&self) -> bool {
        self.effects
            .as_ref()
            .is_some_and(|e| e.gradient.is_some() || e.opacity.is_some())
    }

    #[inline]
    pub fn inner_radius(&self) -> f32 {
        crate::geometry::golden_inner_radius(self.radius)
    }
}

/// Rotation animation parameters.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub rotate: Rotate,
    /// Milliseconds per full revolution.
    pub speed: f64,
}

impl Animation {
    pub fn infinite(speed: f64) -> Self {
        Self { rotate: Rotate::Infinite, speed }
    }

    pub fn bounded(degrees: f64, speed: f64) -> Self {
        Self { rotate: Rotate::Degrees(degrees), speed }
    }
}

/// Rotation policy: spin forever, or rotate until a target angle is reached.
///
/// Serialized as the string `"infinite"` or a number of degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RotateRepr", into = "RotateRepr")]
pub enum Rotate {
    Infinite,
    Degrees(f64),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RotateRepr {
    Keyword(String),
    Degrees(f64),
}

impl TryFrom<RotateRepr> for Rotate {
    type Error = String;

    fn try_from(repr: RotateRepr) -> Result<Self, Self::Error> {
        match repr {
            RotateRepr::Keyword(k) if k == "infinite" => Ok(Rotate::Infinite),
            RotateRepr::Keyword(k) => {
                Err(format!("rotate must be \"infinite\" or a number of degrees, got \"{k}\""))
            }
            RotateRepr::Degrees(d) if d.is_finite() => Ok(Rotate::Degrees(d)),
            RotateRepr::Degrees(d) => Err(format!("rotate degrees must be finite, got {d}")),
        }
    }
}

impl From<Rotate> for RotateRepr {
    fn from(r: Rotate) -> Self {
        match r {
            Rotate::Infinite => RotateRepr::Keyword("infinite".to_string()),
            Rotate::Degrees(d) => RotateRepr::Degrees(d),
        }
    }
}

/// Optional appearance effects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antialiasing: Option<bool>,
}

/// Radial two-color gradient: `inner_color` at the notches, `outer_color` at the points.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    pub inner_color: Rgb,
    pub outer_color: Rgb,
}

/// Parameters of the drifting star field.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Number of star instances.
    #[serde(default = "default_field_count")]
    pub count: u32,
    /// Seed for the instance generator.
    #[serde(default)]
    pub seed: u64,
}

fn default_field_count() -> u32 {
    DEFAULT_FIELD_COUNT
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_FIELD_COUNT,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "color": { "r": 0, "g": 0, "b": 1 },
        "fill": true,
        "animation": { "rotate": "infinite", "speed": 3000 },
        "effects": {
            "gradient": {
                "innerColor": { "r": 1, "g": 0, "b": 0 },
                "outerColor": { "r": 0, "g": 0, "b": 1 }
            },
            "opacity": 0.8,
            "antialiasing": true
        }
    }"#;

    #[test]
    fn parses_full_document() {
        let config = ShapeConfig::from_json_str(FULL).unwrap();
        assert!(config.fill);
        assert_eq!(config.animation, Some(Animation::infinite(3000.0)));
        assert_eq!(config.opacity(), 0.8);
        assert!(config.antialiasing());
        let g = config.gradient().unwrap();
        assert_eq!(g.inner_color, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(g.outer_color, Rgb::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let config = ShapeConfig::from_json_str(r#"{ "color": { "r": 1, "g": 1, "b": 0 } }"#).unwrap();
        assert!(!config.fill);
        assert!(config.animation.is_none());
        assert!(config.effects.is_none());
        assert_eq!(config.radius, DEFAULT_RADIUS);
        assert_eq!(config.opacity(), 1.0);
        assert!(!config.antialiasing());
        assert!(!config.needs_blending());
    }

    #[test]
    fn rotate_accepts_degrees() {
        let config = ShapeConfig::from_json_str(
            r#"{ "color": { "r": 1, "g": 1, "b": 1 }, "animation": { "rotate": 180, "speed": 1000 } }"#,
        )
        .unwrap();
        assert_eq!(config.animation, Some(Animation::bounded(180.0, 1000.0)));
    }

    #[test]
    fn rotate_rejects_unknown_keyword() {
        let err = ShapeConfig::from_json_str(
            r#"{ "color": { "r": 1, "g": 1, "b": 1 }, "animation": { "rotate": "forever", "speed": 1000 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rotate_serializes_back_to_schema() {
        let json = serde_json::to_string(&Animation::infinite(3000.0)).unwrap();
        assert_eq!(json, r#"{"rotate":"infinite","speed":3000.0}"#);
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        let base = ShapeConfig::new(Rgb::white());

        let bad_color = ShapeConfig::new(Rgb::new(2.0, 0.0, 0.0));
        assert!(matches!(bad_color.validate(), Err(ConfigError::ColorOutOfRange { field: "color" })));

        let bad_opacity = base.clone().with_effects(Effects {
            opacity: Some(1.2),
            ..Effects::default()
        });
        assert!(matches!(bad_opacity.validate(), Err(ConfigError::OpacityOutOfRange(_))));

        let bad_speed = base.clone().animated(Animation::infinite(0.0));
        assert!(matches!(bad_speed.validate(), Err(ConfigError::InvalidSpeed(_))));

        let bad_radius = base.with_radius(-1.0);
        assert!(matches!(bad_radius.validate(), Err(ConfigError::InvalidRadius(_))));
    }

    #[test]
    fn inner_radius_follows_golden_ratio() {
        let config = ShapeConfig::new(Rgb::white()).with_radius(0.5);
        assert_eq!(config.inner_radius(), 0.5 * crate::geometry::GOLDEN_INNER_RATIO);
    }

    #[test]
    fn opacity_alone_requests_blending() {
        let config = ShapeConfig::new(Rgb::white()).with_effects(Effects {
            opacity: Some(0.5),
            ..Effects::default()
        });
        assert!(config.needs_blending());

        let aa_only = ShapeConfig::new(Rgb::white()).with_effects(Effects {
            antialiasing: Some(true),
            ..Effects::default()
        });
        assert!(!aa_only.needs_blending());
    }
}
