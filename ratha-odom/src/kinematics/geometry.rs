//! Vehicle geometry.

use serde::Serialize;

use crate::error::{RathaError, Result};

/// Validated vehicle geometry.
///
/// Fields are private so a constructed value always satisfies:
/// - traction wheel radius (or radii) > 0
/// - wheelbase > 0 (both layouts derive yaw rate from it)
/// - wheel separation >= 0 (0 collapses the dual layout to a single wheel)
///
/// Construct once at configuration time; the per-tick paths divide by the
/// radius and wheelbase without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleGeometry {
    wheel_radius: f64,
    left_wheel_radius: Option<f64>,
    wheel_separation: f64,
    wheelbase: f64,
}

impl VehicleGeometry {
    /// Create geometry with one shared traction wheel radius.
    ///
    /// # Arguments
    /// * `wheel_radius` - Traction wheel radius in meters
    /// * `wheel_separation` - Distance between the dual traction wheels in meters
    /// * `wheelbase` - Distance between the steered and fixed axles in meters
    pub fn new(wheel_radius: f64, wheel_separation: f64, wheelbase: f64) -> Result<Self> {
        check_positive("wheel_radius", wheel_radius)?;
        check_positive("wheelbase", wheelbase)?;
        if !wheel_separation.is_finite() || wheel_separation < 0.0 {
            return Err(RathaError::InvalidGeometry(format!(
                "wheel_separation must be >= 0, got {}",
                wheel_separation
            )));
        }

        Ok(Self {
            wheel_radius,
            left_wheel_radius: None,
            wheel_separation,
            wheelbase,
        })
    }

    /// Give the left traction wheel its own radius.
    ///
    /// [`wheel_radius`](Self::wheel_radius) then applies to the right wheel
    /// (and to the single-wheel layout).
    pub fn with_left_wheel_radius(mut self, left_wheel_radius: f64) -> Result<Self> {
        check_positive("left_wheel_radius", left_wheel_radius)?;
        self.left_wheel_radius = Some(left_wheel_radius);
        Ok(self)
    }

    /// Radius of the single traction wheel, or of the right one.
    #[inline]
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    #[inline]
    pub fn right_wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    #[inline]
    pub fn left_wheel_radius(&self) -> f64 {
        self.left_wheel_radius.unwrap_or(self.wheel_radius)
    }

    #[inline]
    pub fn wheel_separation(&self) -> f64 {
        self.wheel_separation
    }

    #[inline]
    pub fn wheelbase(&self) -> f64 {
        self.wheelbase
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RathaError::InvalidGeometry(format!(
            "{} must be > 0, got {}",
            name, value
        )))
    }
}
