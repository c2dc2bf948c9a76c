//! Numeric thresholds shared by the kinematic model and the integrator.

/// Near-zero threshold used on both sides of the kinematics.
///
/// - Integrator: a tick whose angular displacement is at most this (rad)
///   is integrated with the midpoint scheme instead of the closed-form arc.
/// - Inverse kinematics: a desired linear speed below this (m/s) is treated
///   as turn-in-place and substituted by this value in the steering angle.
///
/// One constant for both keeps the switch points consistent.
pub const EPSILON: f64 = 1e-6;

/// Shortest tick (s) that feeds the velocity estimate.
///
/// Shorter ticks still advance the pose, but a wheel-rate difference over
/// them is dominated by encoder jitter and is kept out of the rolling mean.
pub const MIN_VELOCITY_INTERVAL: f64 = 1e-4;
