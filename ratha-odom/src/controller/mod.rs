//! Steering controller: per-tick orchestration around the odometry core.
//!
//! Each control tick the controller
//!
//! 1. updates odometry from wheel feedback (position or velocity), or from
//!    the previous command when running open loop,
//! 2. converts the latest reference twist into steering/traction setpoints,
//!    commanding a stop once the reference is older than the timeout,
//! 3. returns a [`ControllerState`] snapshot for the caller to publish.
//!
//! Threading, hardware I/O and message transport stay with the caller.

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::RathaConfig;
use crate::core::types::{Pose2D, Twist2D};
use crate::error::{RathaError, Result};
use crate::kinematics::{
    KinematicLayout, KinematicModel, SteeringCommand, VehicleGeometry, WheelSample,
};
use crate::odometry::{SteeringOdometry, SteeringOdometryConfig, UpdateOutcome};

/// Controller behaviour settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Wheel layout used for inverse kinematics.
    pub layout: KinematicLayout,

    /// Traction feedback is absolute position (true) or velocity (false).
    pub position_feedback: bool,

    /// Integrate the commanded twist instead of wheel feedback.
    pub open_loop: bool,

    /// Maximum reference age in seconds. 0 disables the timeout.
    pub reference_timeout_secs: f64,

    /// Factor applied to steering feedback (sign/scale calibration).
    pub steer_pos_multiplier: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            layout: KinematicLayout::Bicycle,
            position_feedback: true,
            open_loop: false,
            reference_timeout_secs: 0.0,
            steer_pos_multiplier: 1.0,
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.reference_timeout_secs.is_finite() || self.reference_timeout_secs < 0.0 {
            return Err(RathaError::InvalidParameter(format!(
                "reference_timeout_secs must be >= 0, got {}",
                self.reference_timeout_secs
            )));
        }
        if !self.steer_pos_multiplier.is_finite() {
            return Err(RathaError::InvalidParameter(
                "steer_pos_multiplier must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Snapshot of one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerState {
    /// Tick time in microseconds.
    pub timestamp_us: u64,
    /// Odometry pose after this tick.
    pub pose: Pose2D,
    /// Smoothed odometry twist after this tick.
    pub twist: Twist2D,
    /// Body twist being commanded (zero when no valid reference).
    pub command_twist: Twist2D,
    /// Actuator setpoints for `command_twist`.
    pub command: SteeringCommand,
    /// Odometry update status, `None` when no feedback was supplied.
    pub odometry: Option<UpdateOutcome>,
}

#[derive(Debug, Clone, Copy)]
struct Reference {
    twist: Twist2D,
    stamp_us: u64,
}

/// Steering controller for bicycle and tricycle layouts.
#[derive(Debug, Clone)]
pub struct SteeringController {
    config: ControllerConfig,
    odometry: SteeringOdometry,
    reference: Option<Reference>,
    /// Set once the current reference has been reported stale.
    reference_expired: bool,
    last_command_twist: Twist2D,
}

impl SteeringController {
    pub fn new(
        config: ControllerConfig,
        geometry: VehicleGeometry,
        odometry_config: SteeringOdometryConfig,
    ) -> Result<Self> {
        config.validate()?;
        let model = KinematicModel::new(config.layout, geometry);
        let odometry = SteeringOdometry::new(model, odometry_config)?;

        info!(
            "{} steering controller configured ({} feedback{})",
            config.layout,
            if config.position_feedback {
                "position"
            } else {
                "velocity"
            },
            if config.open_loop { ", open loop" } else { "" }
        );

        Ok(Self {
            config,
            odometry,
            reference: None,
            reference_expired: false,
            last_command_twist: Twist2D::zero(),
        })
    }

    /// Build from a loaded configuration file.
    pub fn from_config(config: &RathaConfig) -> Result<Self> {
        Self::new(config.controller, config.geometry()?, config.odometry)
    }

    /// Accept a new reference twist.
    ///
    /// A `stamp_us` of 0 means "unstamped" and is replaced by `now_us`.
    /// Returns false if the reference was rejected (non-finite, or already
    /// older than the timeout).
    pub fn set_reference(&mut self, twist: Twist2D, stamp_us: u64, now_us: u64) -> bool {
        if !twist.is_finite() {
            warn!("Ignoring non-finite reference {:?}", twist);
            return false;
        }

        let stamp_us = if stamp_us == 0 {
            warn!("Reference timestamp missing, using current time");
            now_us
        } else {
            stamp_us
        };

        if self.is_stale(stamp_us, now_us) {
            error!(
                "Reference stamped {:.6}s is {:.6}s old, more than the allowed timeout ({:.4}s)",
                stamp_us as f64 / 1e6,
                age_secs(stamp_us, now_us),
                self.config.reference_timeout_secs
            );
            return false;
        }

        self.reference = Some(Reference { twist, stamp_us });
        self.reference_expired = false;
        true
    }

    /// Run one control tick.
    ///
    /// # Arguments
    /// * `now_us` - Current time in microseconds
    /// * `period_secs` - Time since the previous tick in seconds
    /// * `feedback` - Wheel feedback for this tick, if available
    pub fn update(
        &mut self,
        now_us: u64,
        period_secs: f64,
        feedback: Option<&WheelSample>,
    ) -> ControllerState {
        let odometry = if self.config.open_loop {
            Some(
                self.odometry
                    .update_open_loop(self.last_command_twist, period_secs),
            )
        } else {
            feedback.map(|sample| self.update_from_feedback(sample, period_secs))
        };

        let command_twist = self.active_reference(now_us).unwrap_or_default();
        let command = self.odometry.twist_to_steering(command_twist);
        self.last_command_twist = command_twist;

        ControllerState {
            timestamp_us: now_us,
            pose: self.odometry.pose(),
            twist: self.odometry.twist(),
            command_twist,
            command,
            odometry,
        }
    }

    fn update_from_feedback(&mut self, sample: &WheelSample, period_secs: f64) -> UpdateOutcome {
        let sample = WheelSample {
            traction: sample.traction,
            steering: sample.steering.scaled(self.config.steer_pos_multiplier),
        };

        if self.config.position_feedback {
            self.odometry.update_from_position(&sample, period_secs)
        } else {
            self.odometry.update_from_velocity(&sample, period_secs)
        }
    }

    /// Reference twist if one exists and is still fresh.
    fn active_reference(&mut self, now_us: u64) -> Option<Twist2D> {
        let reference = self.reference?;

        if self.is_stale(reference.stamp_us, now_us) {
            if !self.reference_expired {
                warn!(
                    "Reference timed out after {:.3}s, commanding stop",
                    age_secs(reference.stamp_us, now_us)
                );
                self.reference_expired = true;
            }
            return None;
        }

        Some(reference.twist)
    }

    fn is_stale(&self, stamp_us: u64, now_us: u64) -> bool {
        let timeout = self.config.reference_timeout_secs;
        timeout > 0.0 && age_secs(stamp_us, now_us) > timeout
    }

    /// Reset odometry and drop the reference and last command.
    pub fn reset(&mut self) {
        debug!("Steering controller reset");
        self.odometry.reset();
        self.reference = None;
        self.reference_expired = false;
        self.last_command_twist = Twist2D::zero();
    }

    #[inline]
    pub fn odometry(&self) -> &SteeringOdometry {
        &self.odometry
    }

    /// Mutable access for geometry / window changes at runtime.
    #[inline]
    pub fn odometry_mut(&mut self) -> &mut SteeringOdometry {
        &mut self.odometry
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

#[inline]
fn age_secs(stamp_us: u64, now_us: u64) -> f64 {
    now_us.saturating_sub(stamp_us) as f64 / 1e6
}
