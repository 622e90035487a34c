//! Movement tuning loaded from a TOML file.
//!
//! Every field has a default, so a config file only needs to list the values
//! it changes:
//!
//! ```toml
//! walk_speed = 5.0
//! pitch_limit = 60.0
//! terminal_ascent_speed = 3.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Per-mode movement tunables.
///
/// Speeds are metres/second, accelerations metres/second², angles degrees.
/// Treated as static configuration; the controller never mutates it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModeParameters {
    // ------------------------------------------------------------------
    // Horizontal speeds
    // ------------------------------------------------------------------
    /// Grounded speed without the sprint button.
    pub walk_speed: f32,
    /// Grounded speed while sprint is held.
    pub run_speed: f32,
    /// Grounded speed while crouched. Replaces both walk and run speed.
    pub crouch_speed: f32,
    /// Horizontal and rise/sink speed while swimming.
    pub swim_speed: f32,
    /// Horizontal and rise/sink speed of a possessed vehicle.
    pub pilot_speed: f32,

    // ------------------------------------------------------------------
    // Vertical
    // ------------------------------------------------------------------
    pub gravity: f32,
    /// Upward acceleration while swimming without ground contact.
    pub buoyancy: f32,
    /// Vertical velocity set on a grounded jump press.
    pub jump_impulse: f32,
    /// Cap on the accumulated buoyancy lift. `None` leaves it unbounded.
    pub terminal_ascent_speed: Option<f32>,

    // ------------------------------------------------------------------
    // Look
    // ------------------------------------------------------------------
    /// Degrees of rotation per unit of look delta.
    pub look_sensitivity: f32,
    /// Pitch is clamped to `[-pitch_limit, +pitch_limit]`.
    pub pitch_limit: f32,

    // ------------------------------------------------------------------
    // Capsule
    // ------------------------------------------------------------------
    pub standing_height: f32,
    pub crouch_height: f32,
}

impl Default for ModeParameters {
    fn default() -> Self {
        Self {
            walk_speed: 6.0,
            run_speed: 12.0,
            crouch_speed: 3.0,
            swim_speed: 4.0,
            pilot_speed: 5.0,
            gravity: 10.0,
            buoyancy: 5.0,
            jump_impulse: 7.0,
            terminal_ascent_speed: None,
            look_sensitivity: 2.0,
            pitch_limit: 45.0,
            standing_height: 2.0,
            crouch_height: 1.0,
        }
    }
}

impl ModeParameters {
    /// Load and validate parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Parse and validate parameters from TOML text. `origin` names the
    /// source in error messages.
    pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("walk_speed", self.walk_speed),
            ("run_speed", self.run_speed),
            ("crouch_speed", self.crouch_speed),
            ("swim_speed", self.swim_speed),
            ("pilot_speed", self.pilot_speed),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("look_sensitivity", self.look_sensitivity),
            ("standing_height", self.standing_height),
            ("crouch_height", self.crouch_height),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(self.buoyancy >= 0.0) {
            return Err(ConfigError::Negative {
                field: "buoyancy",
                value: self.buoyancy,
            });
        }
        if let Some(cap) = self.terminal_ascent_speed {
            if !(cap > 0.0) {
                return Err(ConfigError::NotPositive {
                    field: "terminal_ascent_speed",
                    value: cap,
                });
            }
        }
        if !(0.0..=90.0).contains(&self.pitch_limit) {
            return Err(ConfigError::PitchLimit(self.pitch_limit));
        }
        if self.crouch_height > self.standing_height {
            return Err(ConfigError::CrouchTaller {
                crouch: self.crouch_height,
                standing: self.standing_height,
            });
        }
        Ok(())
    }

    /// Horizontal speed while grounded. Crouching overrides sprint.
    pub fn grounded_speed(&self, crouched: bool, sprinting: bool) -> f32 {
        if crouched {
            self.crouch_speed
        } else if sprinting {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Capsule height for the given crouch flag.
    pub fn capsule_height(&self, crouched: bool) -> f32 {
        if crouched {
            self.crouch_height
        } else {
            self.standing_height
        }
    }
}

/// Errors raised while loading or validating [`ModeParameters`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("pitch_limit must be within [0, 90] degrees, got {0}")]
    PitchLimit(f32),
    #[error("crouch_height ({crouch}) must not exceed standing_height ({standing})")]
    CrouchTaller { crouch: f32, standing: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = ModeParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.walk_speed, 6.0);
        assert_eq!(params.pitch_limit, 45.0);
        assert_eq!(params.terminal_ascent_speed, None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let params = ModeParameters::from_toml(
            "walk_speed = 5.0\nterminal_ascent_speed = 3.0\n",
            "inline",
        )
        .expect("valid config");
        assert_eq!(params.walk_speed, 5.0);
        assert_eq!(params.run_speed, 12.0);
        assert_eq!(params.terminal_ascent_speed, Some(3.0));
    }

    #[test]
    fn rejects_pitch_limit_out_of_range() {
        let err = ModeParameters::from_toml("pitch_limit = 120.0", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::PitchLimit(limit) if limit == 120.0));
    }

    #[test]
    fn rejects_zero_speed() {
        let err = ModeParameters::from_toml("swim_speed = 0.0", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "swim_speed", .. }));
    }

    #[test]
    fn rejects_crouch_taller_than_standing() {
        let err = ModeParameters::from_toml("crouch_height = 3.0", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::CrouchTaller { .. }));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = ModeParameters::from_toml("walk_speed = \"fast\"", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ModeParameters::from_file(Path::new("/nonexistent/undertow.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn bundled_file_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("undertow.toml");
        let params = ModeParameters::from_file(&path).expect("bundled config loads");
        assert_eq!(params, ModeParameters::default());
    }

    #[test]
    fn crouch_overrides_sprint() {
        let params = ModeParameters::default();
        assert_eq!(params.grounded_speed(true, true), params.crouch_speed);
        assert_eq!(params.grounded_speed(false, true), params.run_speed);
        assert_eq!(params.grounded_speed(false, false), params.walk_speed);
    }
}
