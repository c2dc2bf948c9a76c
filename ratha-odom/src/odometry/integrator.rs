//! Steering odometry: pose and smoothed velocity from wheel feedback.
//!
//! Three entry points differ only in how the instantaneous body twist is
//! obtained; all of them end in the same tail (smoothing + pose
//! integration):
//!
//! | Entry point              | Twist source                                   |
//! |--------------------------|------------------------------------------------|
//! | `update_from_position`   | Encoder positions differenced over `dt`        |
//! | `update_from_velocity`   | Encoder rates                                  |
//! | `update_open_loop`       | Commanded twist, no sensing                    |
//!
//! # Integration
//!
//! - **Exact**: closed-form constant-curvature arc. No drift on circular
//!   motion regardless of step size.
//! - **RungeKutta2**: midpoint heading. Used as the fallback when the
//!   angular displacement of a tick is at most [`EPSILON`], where the arc
//!   radius `linear / angular` degenerates.
//!
//! Heading is accumulated without wraparound.

use clap::ValueEnum;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::rolling_mean::RollingMean;
use crate::core::math::{EPSILON, MIN_VELOCITY_INTERVAL};
use crate::core::types::{Pose2D, Twist2D};
use crate::error::{RathaError, Result};
use crate::kinematics::{
    KinematicModel, SteeringCommand, Traction, VehicleGeometry, WheelSample,
};

/// Pose integration scheme.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    /// Closed-form arc, midpoint fallback for near-zero rotation.
    #[default]
    Exact,

    /// Midpoint (2nd-order Runge-Kutta) on every tick.
    RungeKutta2,
}

/// Result of one odometry update call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UpdateOutcome {
    /// Pose and velocity advanced.
    Updated,
    /// Pose advanced; the interval was too short to estimate velocity, so
    /// the smoothed twist is unchanged.
    PoseOnly,
    /// First position sample stored; nothing to difference against yet.
    Initialized,
    /// Elapsed time was zero, negative or not finite. State untouched.
    InvalidInterval,
    /// A feedback value, or the twist derived from it, was NaN or
    /// infinite. State untouched.
    NonFiniteInput,
}

impl UpdateOutcome {
    /// True if the pose moved.
    #[inline]
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated | UpdateOutcome::PoseOnly)
    }
}

/// Configuration for steering odometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringOdometryConfig {
    /// Number of samples in the linear/angular velocity rolling mean.
    pub velocity_rolling_window_size: usize,

    /// Pose integration scheme.
    pub integration: IntegrationMethod,
}

impl Default for SteeringOdometryConfig {
    fn default() -> Self {
        Self {
            velocity_rolling_window_size: 10,
            integration: IntegrationMethod::Exact,
        }
    }
}

impl SteeringOdometryConfig {
    pub fn validate(&self) -> Result<()> {
        check_window(self.velocity_rolling_window_size)
    }
}

/// Odometry integrator for steered vehicles.
///
/// Not thread-safe: owned by the control loop and updated once per tick.
///
/// # Example
///
/// ```
/// use ratha_odom::{
///     KinematicLayout, KinematicModel, SteeringOdometry, SteeringOdometryConfig,
///     VehicleGeometry, WheelSample,
/// };
///
/// let geometry = VehicleGeometry::new(0.45, 0.0, 3.24644).unwrap();
/// let model = KinematicModel::new(KinematicLayout::Bicycle, geometry);
/// let mut odom = SteeringOdometry::new(model, SteeringOdometryConfig::default()).unwrap();
///
/// // First position sample only initializes the differencing state
/// assert!(!odom.update_from_position(&WheelSample::single(0.0, 0.0), 0.01).is_updated());
/// assert!(odom.update_from_position(&WheelSample::single(0.1, 0.0), 0.01).is_updated());
/// assert!(odom.x() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SteeringOdometry {
    model: KinematicModel,
    config: SteeringOdometryConfig,

    timestamp_us: u64,
    pose: Pose2D,
    linear: f64,
    angular: f64,

    /// Last traction positions in rad, `None` until the first position sample.
    previous_position: Option<Traction>,

    linear_acc: RollingMean,
    angular_acc: RollingMean,
}

impl SteeringOdometry {
    /// Create an integrator at the origin.
    pub fn new(model: KinematicModel, config: SteeringOdometryConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "{} odometry: window {}, {:?} integration",
            model.layout(),
            config.velocity_rolling_window_size,
            config.integration
        );

        Ok(Self {
            model,
            config,
            timestamp_us: 0,
            pose: Pose2D::identity(),
            linear: 0.0,
            angular: 0.0,
            previous_position: None,
            linear_acc: RollingMean::new(config.velocity_rolling_window_size),
            angular_acc: RollingMean::new(config.velocity_rolling_window_size),
        })
    }

    /// Reset all state and set the reference timestamp.
    pub fn init(&mut self, timestamp_us: u64) {
        self.reset();
        self.timestamp_us = timestamp_us;
    }

    /// Update from absolute traction encoder positions (rad).
    ///
    /// Wheel rates are `(position - previous) / dt`. The first sample (or a
    /// sample whose traction shape differs from the previous one) is stored
    /// and reported as [`UpdateOutcome::Initialized`] without producing a
    /// velocity.
    pub fn update_from_position(&mut self, sample: &WheelSample, dt: f64) -> UpdateOutcome {
        if let Some(rejected) = reject(dt, sample.is_finite()) {
            return rejected;
        }

        let Some(previous) = self.previous_position else {
            debug!("Position odometry initialized");
            self.previous_position = Some(sample.traction);
            return UpdateOutcome::Initialized;
        };
        let Some(wheel_velocity) = sample
            .traction
            .zip_with(previous, |cur, prev| (cur - prev) / dt)
        else {
            warn!("Traction feedback changed shape, restarting position differencing");
            self.previous_position = Some(sample.traction);
            return UpdateOutcome::Initialized;
        };

        let twist = self.model.forward(wheel_velocity, sample.steering.angle());
        let outcome = self.update_odometry(twist, dt);
        if outcome != UpdateOutcome::NonFiniteInput {
            self.previous_position = Some(sample.traction);
        }
        outcome
    }

    /// Update from traction encoder rates (rad/s).
    pub fn update_from_velocity(&mut self, sample: &WheelSample, dt: f64) -> UpdateOutcome {
        if let Some(rejected) = reject(dt, sample.is_finite()) {
            return rejected;
        }

        let twist = self.model.forward(sample.traction, sample.steering.angle());
        self.update_odometry(twist, dt)
    }

    /// Update from a body twist supplied directly (typically the last
    /// command), bypassing the kinematic model.
    pub fn update_open_loop(&mut self, twist: Twist2D, dt: f64) -> UpdateOutcome {
        if let Some(rejected) = reject(dt, twist.is_finite()) {
            return rejected;
        }

        self.update_odometry(twist, dt)
    }

    /// Common tail: integrate the tick's displacement and smooth the twist.
    ///
    /// A derived twist or displacement that is not finite (e.g. a position
    /// step over a vanishing `dt`) is rejected before any state changes.
    /// Ticks shorter than [`MIN_VELOCITY_INTERVAL`] still move the pose but
    /// leave the velocity estimate alone.
    fn update_odometry(&mut self, twist: Twist2D, dt: f64) -> UpdateOutcome {
        let linear = twist.linear * dt;
        let angular = twist.angular * dt;
        if !(twist.is_finite() && linear.is_finite() && angular.is_finite()) {
            trace!("Skipping odometry update: derived twist {:?} over dt = {}", twist, dt);
            return UpdateOutcome::NonFiniteInput;
        }

        self.integrate(linear, angular);
        self.timestamp_us = self
            .timestamp_us
            .saturating_add((dt * 1_000_000.0).round() as u64);

        if dt < MIN_VELOCITY_INTERVAL {
            trace!("Interval {}s too short for a velocity estimate", dt);
            return UpdateOutcome::PoseOnly;
        }

        self.linear_acc.push(twist.linear);
        self.angular_acc.push(twist.angular);
        self.linear = self.linear_acc.mean();
        self.angular = self.angular_acc.mean();

        UpdateOutcome::Updated
    }

    /// Advance the pose by one tick's displacement.
    ///
    /// # Arguments
    /// * `linear` - Linear displacement in meters (Vx · dt)
    /// * `angular` - Angular displacement in radians (ω · dt)
    fn integrate(&mut self, linear: f64, angular: f64) {
        match self.config.integration {
            IntegrationMethod::Exact if angular.abs() > EPSILON => {
                let heading_old = self.pose.theta;
                let radius = linear / angular;
                self.pose.theta += angular;
                self.pose.x += radius * (self.pose.theta.sin() - heading_old.sin());
                self.pose.y -= radius * (self.pose.theta.cos() - heading_old.cos());
            }
            _ => {
                let direction = self.pose.theta + angular * 0.5;
                self.pose.x += linear * direction.cos();
                self.pose.y += linear * direction.sin();
                self.pose.theta += angular;
            }
        }
    }

    /// Actuator setpoints for a desired body twist. Does not touch state.
    #[inline]
    pub fn twist_to_steering(&self, twist: Twist2D) -> SteeringCommand {
        self.model.inverse(twist)
    }

    /// Replace the geometry and clear the velocity history.
    pub fn set_geometry(&mut self, geometry: VehicleGeometry) {
        debug!(
            "Geometry set: radius {:.4}m, separation {:.4}m, wheelbase {:.4}m",
            geometry.wheel_radius(),
            geometry.wheel_separation(),
            geometry.wheelbase()
        );
        self.model.set_geometry(geometry);
        self.reset_accumulators();
    }

    /// Resize the velocity rolling window. Clears the velocity history.
    pub fn set_velocity_rolling_window_size(&mut self, window: usize) -> Result<()> {
        check_window(window)?;
        self.config.velocity_rolling_window_size = window;
        self.reset_accumulators();
        Ok(())
    }

    pub fn set_integration_method(&mut self, method: IntegrationMethod) {
        self.config.integration = method;
    }

    /// Zero pose and velocity, clear smoothing history and position memory.
    ///
    /// The timestamp is kept; use [`init`](Self::init) to also move it.
    pub fn reset(&mut self) {
        self.pose = Pose2D::identity();
        self.linear = 0.0;
        self.angular = 0.0;
        self.previous_position = None;
        self.reset_accumulators();
    }

    fn reset_accumulators(&mut self) {
        let window = self.config.velocity_rolling_window_size;
        if self.linear_acc.window() == window {
            self.linear_acc.clear();
            self.angular_acc.clear();
        } else {
            self.linear_acc = RollingMean::new(window);
            self.angular_acc = RollingMean::new(window);
        }
    }

    /// Heading in radians (unbounded).
    #[inline]
    pub fn heading(&self) -> f64 {
        self.pose.theta
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.pose.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.pose.y
    }

    /// Smoothed linear velocity in m/s.
    #[inline]
    pub fn linear(&self) -> f64 {
        self.linear
    }

    /// Smoothed angular velocity in rad/s.
    #[inline]
    pub fn angular(&self) -> f64 {
        self.angular
    }

    #[inline]
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// Smoothed body twist.
    #[inline]
    pub fn twist(&self) -> Twist2D {
        Twist2D::new(self.linear, self.angular)
    }

    /// Timestamp of the last update (or of `init`) in microseconds.
    #[inline]
    pub fn timestamp_us(&self) -> u64 {
        self.timestamp_us
    }

    #[inline]
    pub fn model(&self) -> &KinematicModel {
        &self.model
    }

    #[inline]
    pub fn config(&self) -> &SteeringOdometryConfig {
        &self.config
    }

    /// Rolling accumulator behind [`linear`](Self::linear).
    #[inline]
    pub fn linear_accumulator(&self) -> &RollingMean {
        &self.linear_acc
    }

    /// Rolling accumulator behind [`angular`](Self::angular).
    #[inline]
    pub fn angular_accumulator(&self) -> &RollingMean {
        &self.angular_acc
    }
}

/// Early-exit status for an unusable tick.
#[inline]
fn reject(dt: f64, inputs_finite: bool) -> Option<UpdateOutcome> {
    if !dt.is_finite() || dt <= 0.0 {
        trace!("Skipping odometry update: dt = {}", dt);
        return Some(UpdateOutcome::InvalidInterval);
    }
    if !inputs_finite {
        trace!("Skipping odometry update: non-finite input");
        return Some(UpdateOutcome::NonFiniteInput);
    }
    None
}

fn check_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(RathaError::InvalidParameter(
            "velocity_rolling_window_size must be >= 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::KinematicLayout;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn bicycle_odometry(integration: IntegrationMethod) -> SteeringOdometry {
        let geometry = VehicleGeometry::new(0.5, 0.0, 2.0).unwrap();
        let model = KinematicModel::new(KinematicLayout::Bicycle, geometry);
        SteeringOdometry::new(
            model,
            SteeringOdometryConfig {
                integration,
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn tricycle_odometry() -> SteeringOdometry {
        let geometry = VehicleGeometry::new(0.5, 0.6, 2.0).unwrap();
        let model = KinematicModel::new(KinematicLayout::Tricycle, geometry);
        SteeringOdometry::new(model, SteeringOdometryConfig::default()).unwrap()
    }

    fn assert_at_origin(odom: &SteeringOdometry) {
        assert_eq!(odom.x(), 0.0);
        assert_eq!(odom.y(), 0.0);
        assert_eq!(odom.heading(), 0.0);
        assert_eq!(odom.linear(), 0.0);
        assert_eq!(odom.angular(), 0.0);
    }

    #[test]
    fn test_first_position_sample_initializes() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);

        let outcome = odom.update_from_position(&WheelSample::single(12.0, 0.3), 0.01);

        assert_eq!(outcome, UpdateOutcome::Initialized);
        assert!(!outcome.is_updated());
        assert_at_origin(&odom);
        assert!(odom.linear_accumulator().is_empty());
    }

    #[test]
    fn test_position_update_differences_samples() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);

        odom.update_from_position(&WheelSample::single(1.0, 0.0), 0.1);
        let outcome = odom.update_from_position(&WheelSample::single(1.2, 0.0), 0.1);

        // 0.2 rad over 0.1 s at 0.5 m radius = 1 m/s
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_relative_eq!(odom.linear(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(odom.x(), 0.1, epsilon = 1e-12);
        assert_eq!(odom.y(), 0.0);
    }

    #[test]
    fn test_non_positive_dt_is_rejected() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.update_from_position(&WheelSample::single(0.0, 0.0), 0.1);

        for dt in [0.0, -0.1, f64::NAN] {
            let sample = WheelSample::single(5.0, 0.2);
            assert_eq!(
                odom.update_from_position(&sample, dt),
                UpdateOutcome::InvalidInterval
            );
            assert_eq!(
                odom.update_from_velocity(&sample, dt),
                UpdateOutcome::InvalidInterval
            );
            assert_eq!(
                odom.update_open_loop(Twist2D::new(1.0, 1.0), dt),
                UpdateOutcome::InvalidInterval
            );
        }
        assert_at_origin(&odom);

        // Position memory was not overwritten by the rejected samples
        odom.update_from_position(&WheelSample::single(0.2, 0.0), 0.1);
        assert_relative_eq!(odom.linear(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);

        assert_eq!(
            odom.update_from_velocity(&WheelSample::single(f64::NAN, 0.0), 0.1),
            UpdateOutcome::NonFiniteInput
        );
        assert_eq!(
            odom.update_open_loop(Twist2D::new(1.0, f64::INFINITY), 0.1),
            UpdateOutcome::NonFiniteInput
        );
        assert_at_origin(&odom);
    }

    #[test]
    fn test_velocity_update_needs_no_history() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);

        let outcome = odom.update_from_velocity(&WheelSample::single(2.0, 0.0), 0.5);

        assert!(outcome.is_updated());
        assert_relative_eq!(odom.x(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(odom.linear(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_position_and_velocity_paths_agree() {
        let mut by_position = tricycle_odometry();
        let mut by_velocity = tricycle_odometry();
        let dt = 0.02;
        let (mut right, mut left) = (0.0, 0.0);

        by_position.update_from_position(&WheelSample::dual(right, left, 0.25), dt);
        for i in 0..200 {
            let (right_rate, left_rate) = (2.0 + 0.01 * i as f64, 1.8);
            right += right_rate * dt;
            left += left_rate * dt;

            by_position.update_from_position(&WheelSample::dual(right, left, 0.25), dt);
            by_velocity.update_from_velocity(&WheelSample::dual(right_rate, left_rate, 0.25), dt);
        }

        assert_relative_eq!(by_position.x(), by_velocity.x(), epsilon = 1e-9);
        assert_relative_eq!(by_position.y(), by_velocity.y(), epsilon = 1e-9);
        assert_relative_eq!(by_position.heading(), by_velocity.heading(), epsilon = 1e-9);
    }

    #[test]
    fn test_straight_line_schemes_identical() {
        let mut exact = bicycle_odometry(IntegrationMethod::Exact);
        let mut rk2 = bicycle_odometry(IntegrationMethod::RungeKutta2);

        for i in 0..50 {
            let twist = Twist2D::new(0.3 + 0.05 * i as f64, 0.0);
            exact.update_open_loop(twist, 0.05);
            rk2.update_open_loop(twist, 0.05);
        }

        assert_eq!(exact.pose(), rk2.pose());
    }

    #[test]
    fn test_exact_circle_closes() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        let twist = Twist2D::new(1.0, 0.5);
        let steps = 16;
        let dt = 2.0 * PI / twist.angular / steps as f64;

        for _ in 0..steps {
            odom.update_open_loop(twist, dt);
        }

        assert_relative_eq!(odom.x(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(odom.y(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(odom.heading(), 2.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_exact_arc_matches_geometry() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);

        // Quarter circle of radius 2 in one tick
        odom.update_open_loop(Twist2D::new(PI, PI / 2.0), 1.0);

        assert_relative_eq!(odom.x(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(odom.y(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(odom.heading(), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rk2_uses_midpoint_heading() {
        let mut odom = bicycle_odometry(IntegrationMethod::RungeKutta2);

        // Same quarter circle as above; RK2 moves along the chord at π/4
        // with the full arc length instead of the chord length
        odom.update_open_loop(Twist2D::new(PI, PI / 2.0), 1.0);

        let leg = PI * (PI / 4.0).cos();
        assert_relative_eq!(odom.x(), leg, epsilon = 1e-12);
        assert_relative_eq!(odom.y(), leg, epsilon = 1e-12);
        assert_relative_eq!(odom.heading(), PI / 2.0, epsilon = 1e-12);
        assert!((odom.x() - 2.0).abs() > 0.1);
    }

    #[test]
    fn test_pure_rotation_returns_to_start() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        let twist = Twist2D::new(0.0, 0.8);
        let steps = 25;
        let dt = 2.0 * PI / twist.angular / steps as f64;

        for _ in 0..steps {
            odom.update_open_loop(twist, dt);
        }

        assert_relative_eq!(odom.x(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(odom.y(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_heading_accumulates_without_wrap() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        for _ in 0..40 {
            odom.update_open_loop(Twist2D::new(0.5, PI / 5.0), 1.0);
        }
        assert_relative_eq!(odom.heading(), 8.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn test_velocity_is_smoothed() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.set_velocity_rolling_window_size(3).unwrap();

        for linear in [1.0, 2.0, 3.0, 4.0] {
            odom.update_open_loop(Twist2D::new(linear, 0.1 * linear), 0.1);
        }

        assert_relative_eq!(odom.linear(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(odom.angular(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_window_resize_clears_history() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.update_open_loop(Twist2D::new(5.0, 0.0), 0.1);

        odom.set_velocity_rolling_window_size(4).unwrap();
        assert!(odom.linear_accumulator().is_empty());
        assert_eq!(odom.linear_accumulator().window(), 4);

        odom.update_open_loop(Twist2D::new(1.0, 0.0), 0.1);
        assert_eq!(odom.linear(), 1.0);

        assert!(odom.set_velocity_rolling_window_size(0).is_err());
        assert_eq!(odom.config().velocity_rolling_window_size, 4);
    }

    #[test]
    fn test_reset_zeroes_state() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.update_from_position(&WheelSample::single(0.0, 0.2), 0.1);
        odom.update_from_position(&WheelSample::single(1.0, 0.2), 0.1);
        assert!(odom.x() > 0.0);

        odom.reset();
        assert_at_origin(&odom);
        assert_eq!(odom.linear_accumulator().mean(), 0.0);
        assert_eq!(odom.angular_accumulator().mean(), 0.0);

        // Idempotent
        odom.reset();
        assert_at_origin(&odom);

        // Position memory is gone too
        assert_eq!(
            odom.update_from_position(&WheelSample::single(2.0, 0.2), 0.1),
            UpdateOutcome::Initialized
        );
    }

    #[test]
    fn test_shape_change_reinitializes() {
        let mut odom = tricycle_odometry();
        odom.update_from_position(&WheelSample::single(0.0, 0.0), 0.1);

        let outcome = odom.update_from_position(&WheelSample::dual(1.0, 1.0, 0.0), 0.1);

        assert_eq!(outcome, UpdateOutcome::Initialized);
        assert_at_origin(&odom);
    }

    #[test]
    fn test_timestamp_tracks_updates() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.init(1_000_000);
        assert_eq!(odom.timestamp_us(), 1_000_000);

        odom.update_open_loop(Twist2D::new(1.0, 0.0), 0.01);
        odom.update_open_loop(Twist2D::new(1.0, 0.0), 0.0);
        assert_eq!(odom.timestamp_us(), 1_010_000);
    }

    #[test]
    fn test_set_geometry_clears_history() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.update_from_velocity(&WheelSample::single(2.0, 0.0), 0.1);

        odom.set_geometry(VehicleGeometry::new(0.25, 0.0, 2.0).unwrap());
        assert!(odom.linear_accumulator().is_empty());

        odom.update_from_velocity(&WheelSample::single(2.0, 0.0), 0.1);
        assert_relative_eq!(odom.linear(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_vanishing_interval_leaves_state_intact() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.update_from_position(&WheelSample::single(0.0, 0.1), 0.01);

        // 1 rad over a subnormal interval is an infinite wheel rate
        let outcome = odom.update_from_position(&WheelSample::single(1.0, 0.1), 1e-310);
        assert_eq!(outcome, UpdateOutcome::NonFiniteInput);
        assert_at_origin(&odom);
        assert!(odom.linear_accumulator().is_empty());

        // Differencing continues from the last accepted sample
        for k in 1..=12 {
            let sample = WheelSample::single(0.02 * k as f64, 0.0);
            assert_eq!(odom.update_from_position(&sample, 0.01), UpdateOutcome::Updated);
        }
        assert_relative_eq!(odom.linear(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(odom.x(), 0.12, epsilon = 1e-9);
        assert_eq!(odom.heading(), 0.0);
    }

    #[test]
    fn test_overflowing_displacement_is_rejected() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);

        let outcome = odom.update_from_velocity(&WheelSample::single(f64::MAX, 0.0), 10.0);
        assert_eq!(outcome, UpdateOutcome::NonFiniteInput);

        let outcome = odom.update_open_loop(Twist2D::new(0.0, f64::MAX), 4.0);
        assert_eq!(outcome, UpdateOutcome::NonFiniteInput);
        assert_at_origin(&odom);
    }

    #[test]
    fn test_short_interval_moves_pose_only() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.update_from_position(&WheelSample::single(0.0, 0.0), 0.01);

        // 1 mrad of jitter over 1 ns would read as 500 km/s
        let outcome = odom.update_from_position(&WheelSample::single(0.001, 0.0), 1e-9);
        assert_eq!(outcome, UpdateOutcome::PoseOnly);
        assert!(outcome.is_updated());
        assert_relative_eq!(odom.x(), 0.0005, epsilon = 1e-12);
        assert_eq!(odom.linear(), 0.0);
        assert!(odom.linear_accumulator().is_empty());

        let outcome = odom.update_from_position(&WheelSample::single(0.002, 0.0), 0.01);
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_relative_eq!(odom.linear(), 0.05, epsilon = 1e-9);
        assert_relative_eq!(odom.x(), 0.001, epsilon = 1e-12);

        let outcome = odom.update_open_loop(Twist2D::new(2.0, 0.0), MIN_VELOCITY_INTERVAL * 0.5);
        assert_eq!(outcome, UpdateOutcome::PoseOnly);
        assert_relative_eq!(odom.x(), 0.001 + MIN_VELOCITY_INTERVAL, epsilon = 1e-12);
        assert_eq!(odom.linear_accumulator().len(), 1);
    }

    #[test]
    fn test_exact_rk2_switch_is_continuous() {
        // Arc radius reaches 1e6 m at the switch; a large starting heading
        // costs precision in the heading increment itself
        for (start_heading, tolerance) in [(0.0, 1e-9), (1000.0, 1e-6)] {
            for rotation in [EPSILON * 0.999, EPSILON * 1.001] {
                let mut poses = Vec::new();
                for integration in [IntegrationMethod::Exact, IntegrationMethod::RungeKutta2] {
                    let mut odom = bicycle_odometry(integration);
                    odom.update_open_loop(Twist2D::new(0.0, start_heading), 1.0);
                    odom.update_open_loop(Twist2D::new(1.0, rotation), 1.0);
                    poses.push(odom.pose());
                }

                let (exact, rk2) = (poses[0], poses[1]);
                assert_relative_eq!(exact.x, rk2.x, epsilon = tolerance);
                assert_relative_eq!(exact.y, rk2.y, epsilon = tolerance);
                assert_eq!(exact.theta, rk2.theta);
                assert_relative_eq!(exact.distance(&rk2), 0.0, epsilon = tolerance);
            }
        }
    }

    #[test]
    fn test_switch_integration_method() {
        let mut odom = bicycle_odometry(IntegrationMethod::Exact);
        odom.update_open_loop(Twist2D::new(PI, PI / 2.0), 1.0);
        assert_relative_eq!(odom.x(), 2.0, epsilon = 1e-12);

        odom.set_integration_method(IntegrationMethod::RungeKutta2);
        assert_eq!(odom.config().integration, IntegrationMethod::RungeKutta2);

        // Second quarter turn along the π/4 + π/2 chord
        odom.update_open_loop(Twist2D::new(PI, PI / 2.0), 1.0);
        let direction = 3.0 * PI / 4.0;
        assert_relative_eq!(odom.x(), 2.0 + PI * direction.cos(), epsilon = 1e-12);
        assert_relative_eq!(odom.y(), 2.0 + PI * direction.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let geometry = VehicleGeometry::new(0.5, 0.0, 2.0).unwrap();
        let model = KinematicModel::new(KinematicLayout::Bicycle, geometry);
        let config = SteeringOdometryConfig {
            velocity_rolling_window_size: 0,
            ..Default::default()
        };
        assert!(SteeringOdometry::new(model, config).is_err());
    }
}
