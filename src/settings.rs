//! Flock settings
//!
//! Loaded from a JSON file; every field falls back to its default when
//! missing.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sim::{AgentParams, Scene};

/// Simulation run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockSettings {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Number of agents placed at startup
    pub agent_count: usize,
    /// Center of the starting cluster
    pub spawn_center: Vec3,
    /// Half-size of the starting cluster cube
    pub spawn_spread: f32,
    /// Parameters shared by every agent
    pub agent: AgentParams,
    /// Obstacle layout
    pub scene: Scene,

    // === Run ===
    /// Seconds of frame time the headless driver runs for
    pub duration: f32,
    /// Frames per second fed into the fixed-step clock
    pub frame_rate: f32,
    /// Seconds between progress log lines
    pub report_interval: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            agent_count: 50,
            spawn_center: Vec3::new(0.0, 0.0, -25.0),
            spawn_spread: 5.0,
            agent: AgentParams::default(),
            scene: Scene::arena_with_pillars(Vec3::new(40.0, 20.0, 40.0)),

            duration: 60.0,
            frame_rate: 60.0,
            report_interval: 5.0,
        }
    }
}

impl FlockSettings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject parameters the simulation cannot run with
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        use crate::ConfigError;

        self.agent.validate()?;
        self.scene.validate()?;
        if !self.spawn_center.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "spawn_center",
            });
        }
        for (name, value) in [
            ("spawn_spread", self.spawn_spread),
            ("duration", self.duration),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        for (name, value) in [
            ("frame_rate", self.frame_rate),
            ("report_interval", self.report_interval),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Frame length fed into the fixed-step clock
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FlockSettings::default().validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let settings = FlockSettings::default();
        let json = settings.to_json().unwrap();
        let back = FlockSettings::from_json(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            FlockSettings::from_json(r#"{ "seed": 7, "agent": { "speed": 4.0 } }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.agent.speed, 4.0);
        assert_eq!(settings.agent.neighbor_radius, 10.0);
        assert_eq!(settings.agent_count, 50);
    }

    #[test]
    fn test_invalid_agent_params_rejected() {
        let err = FlockSettings::from_json(r#"{ "agent": { "stuck_radius": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::NonPositive {
                name: "stuck_radius",
                ..
            })
        ));

        let err = FlockSettings::from_json(r#"{ "agent": { "strengths": { "alignment": -1.0 } } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::Negative { .. })));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = FlockSettings::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FlockSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_bad_obstacle_geometry_rejected() {
        let json = r#"{ "scene": { "obstacles": [
            { "type": "sphere", "center": [0.0, 0.0, 0.0], "radius": -2.0 }
        ] } }"#;
        let err = FlockSettings::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::NonPositive {
                name: "sphere radius",
                ..
            })
        ));

        let json = r#"{ "scene": { "obstacles": [
            { "type": "arena", "center": [0.0, 0.0, 0.0], "half_extents": [10.0, -1.0, 10.0] }
        ] } }"#;
        assert!(FlockSettings::from_json(json).is_err());
    }

    #[test]
    fn test_zero_frame_rate_rejected() {
        let settings = FlockSettings {
            frame_rate: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
