//! Odometry estimation layer.
//!
//! # Components
//!
//! - [`SteeringOdometry`]: Pose + smoothed twist from position, velocity or
//!   open-loop input
//! - [`RollingMean`]: Fixed-capacity moving average used for velocity smoothing

mod integrator;
mod rolling_mean;

pub use integrator::{IntegrationMethod, SteeringOdometry, SteeringOdometryConfig, UpdateOutcome};
pub use rolling_mean::RollingMean;
