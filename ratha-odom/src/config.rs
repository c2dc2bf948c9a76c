//! Configuration loading for RathaOdom
//!
//! ```toml
//! [geometry]
//! wheel_radius = 0.45
//! wheel_separation = 0.0
//! wheelbase = 3.24644
//!
//! [odometry]
//! velocity_rolling_window_size = 10
//! integration = "exact"
//!
//! [controller]
//! layout = "bicycle"
//! position_feedback = true
//! reference_timeout_secs = 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controller::ControllerConfig;
use crate::error::{RathaError, Result};
use crate::kinematics::VehicleGeometry;
use crate::odometry::SteeringOdometryConfig;

/// Main configuration structure
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RathaConfig {
    pub geometry: GeometryConfig,
    pub odometry: SteeringOdometryConfig,
    pub controller: ControllerConfig,
}

/// Vehicle physical parameters, before calibration multipliers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Traction wheel radius in meters, right wheel for dual layouts (default: 0.45)
    #[serde(default = "default_wheel_radius")]
    pub wheel_radius: f64,

    /// Left traction wheel radius in meters if it differs from the right one
    #[serde(default)]
    pub left_wheel_radius: Option<f64>,

    /// Distance between the dual traction wheels in meters (default: 0.0)
    #[serde(default)]
    pub wheel_separation: f64,

    /// Distance between steered and fixed axle in meters (default: 3.24644)
    #[serde(default = "default_wheelbase")]
    pub wheelbase: f64,

    #[serde(default = "default_multiplier")]
    pub wheel_radius_multiplier: f64,

    #[serde(default = "default_multiplier")]
    pub wheel_separation_multiplier: f64,

    #[serde(default = "default_multiplier")]
    pub wheelbase_multiplier: f64,
}

fn default_wheel_radius() -> f64 {
    0.45
}
fn default_wheelbase() -> f64 {
    3.24644
}
fn default_multiplier() -> f64 {
    1.0
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            wheel_radius: default_wheel_radius(),
            left_wheel_radius: None,
            wheel_separation: 0.0,
            wheelbase: default_wheelbase(),
            wheel_radius_multiplier: default_multiplier(),
            wheel_separation_multiplier: default_multiplier(),
            wheelbase_multiplier: default_multiplier(),
        }
    }
}

impl GeometryConfig {
    /// Build the calibrated geometry (value × multiplier) and validate it.
    pub fn to_geometry(&self) -> Result<VehicleGeometry> {
        for (name, value) in [
            ("wheel_radius_multiplier", self.wheel_radius_multiplier),
            ("wheel_separation_multiplier", self.wheel_separation_multiplier),
            ("wheelbase_multiplier", self.wheelbase_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RathaError::InvalidGeometry(format!(
                    "{} must be > 0, got {}",
                    name, value
                )));
            }
        }

        let geometry = VehicleGeometry::new(
            self.wheel_radius * self.wheel_radius_multiplier,
            self.wheel_separation * self.wheel_separation_multiplier,
            self.wheelbase * self.wheelbase_multiplier,
        )?;

        match self.left_wheel_radius {
            Some(left) => geometry.with_left_wheel_radius(left * self.wheel_radius_multiplier),
            None => Ok(geometry),
        }
    }
}

impl RathaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RathaConfig = basic_toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.geometry.to_geometry()?;
        self.odometry.validate()?;
        self.controller.validate()
    }

    /// Calibrated, validated vehicle geometry.
    pub fn geometry(&self) -> Result<VehicleGeometry> {
        self.geometry.to_geometry()
    }
}
