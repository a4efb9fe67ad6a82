//! Tunables for the move engine.

use crate::snap::{GRID_SIZE, SnapMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Squared distance below which the cursor counts as being on a lane.
pub const LANE_CHANGE_DISTANCE_SQUARED: f64 = 1.0;

/// Per-axis tolerance for collapsing consecutive points on commit.
pub const DOUBLE_POINT_TOLERANCE: f64 = 2.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid move configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Move engine settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveConfig {
    /// Snap mode for dragged points.
    pub snap_mode: SnapMode,
    /// Grid spacing used when snapping.
    pub grid_size: f64,
    /// Squared cursor distance that triggers a lane change.
    pub lane_change_distance_squared: f64,
    /// Tolerance for double point removal on commit.
    pub double_point_tolerance: f64,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            snap_mode: SnapMode::None,
            grid_size: GRID_SIZE,
            lane_change_distance_squared: LANE_CHANGE_DISTANCE_SQUARED,
            double_point_tolerance: DOUBLE_POINT_TOLERANCE,
        }
    }
}

impl MoveConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MoveConfig::default();
        assert_eq!(config.snap_mode, SnapMode::None);
        assert_eq!(config.grid_size, GRID_SIZE);
        assert_eq!(config.lane_change_distance_squared, 1.0);
        assert_eq!(config.double_point_tolerance, 2.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MoveConfig::from_json(r#"{ "snap_mode": "Grid", "grid_size": 5.0 }"#).unwrap();
        assert_eq!(config.snap_mode, SnapMode::Grid);
        assert_eq!(config.grid_size, 5.0);
        assert_eq!(config.double_point_tolerance, DOUBLE_POINT_TOLERANCE);
    }

    #[test]
    fn test_invalid_json() {
        let err = MoveConfig::from_json("{ snap_mode: ").unwrap_err();
        assert!(err.to_string().starts_with("Invalid move configuration"));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = MoveConfig {
            lane_change_distance_squared: 4.0,
            ..MoveConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(MoveConfig::from_json(&json).unwrap(), config);
    }
}
