//! Engine-wide runtime settings

use super::{Config, ConfigError};
use crate::ecs::systems::CollisionScan;
use serde::{Deserialize, Serialize};

/// Runtime settings for the engine's update pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest frame delta (seconds) fed to the systems; longer frames are clamped
    pub max_frame_delta: f32,

    /// Which entity pairs the collision system tests each frame
    pub collision_scan: CollisionScan,

    /// Integrate acceleration into velocity and radial velocity into rotation
    pub integrate_motion: bool,

    /// Default `env_logger` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.25,
            collision_scan: CollisionScan::AllOrderedPairs,
            integrate_motion: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Check that every field is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_frame_delta.is_finite() || self.max_frame_delta <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_frame_delta",
                reason: format!("must be a positive number of seconds, got {}", self.max_frame_delta),
            });
        }
        Ok(())
    }

    /// Clamp a raw frame delta into `[0, max_frame_delta]`; NaN and negatives become zero
    pub fn clamp_delta(&self, delta_time: f32) -> f32 {
        if delta_time.is_nan() || delta_time <= 0.0 {
            0.0
        } else {
            delta_time.min(self.max_frame_delta)
        }
    }

    /// Builder pattern: set the collision scan mode
    pub fn with_collision_scan(mut self, scan: CollisionScan) -> Self {
        self.collision_scan = scan;
        self
    }

    /// Builder pattern: enable or disable motion integration
    pub fn with_motion_integration(mut self, enabled: bool) -> Self {
        self.integrate_motion = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collision_scan, CollisionScan::AllOrderedPairs);
        assert!(!config.integrate_motion);
    }

    #[test]
    fn test_rejects_non_positive_frame_cap() {
        let config = EngineConfig {
            max_frame_delta: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "max_frame_delta", .. })
        ));
    }

    #[test]
    fn test_clamp_delta() {
        let config = EngineConfig::default();
        assert_eq!(config.clamp_delta(-1.0), 0.0);
        assert_eq!(config.clamp_delta(f32::NAN), 0.0);
        assert_eq!(config.clamp_delta(0.1), 0.1);
        assert_eq!(config.clamp_delta(5.0), 0.25);
    }

    #[test]
    fn test_toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        let config = EngineConfig::default()
            .with_collision_scan(CollisionScan::UniquePairs)
            .with_motion_integration(true);

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");
        let config = EngineConfig {
            max_frame_delta: 0.1,
            ..Default::default()
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(EngineConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EngineConfig = toml::from_str("integrate_motion = true").unwrap();
        assert!(config.integrate_motion);
        assert_eq!(config.max_frame_delta, 0.25);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::default().save_to_file("engine.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
