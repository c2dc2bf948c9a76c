//! RathaOdom - Odometry and Ackermann kinematics for steered vehicles
//!
//! Estimates planar pose and smoothed velocity for car-like vehicles whose
//! yaw comes from a steered axle, and converts desired body twists into
//! steering/traction setpoints.
//!
//! # Layouts
//!
//! - **Bicycle**: one traction wheel and one steering angle (a car folded
//!   onto its centerline)
//! - **Tricycle**: two traction wheels separated by a track width, one
//!   virtual steering angle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   controller/                       │  ← Orchestration
//! │       (reference timeout, open loop, commands)      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    odometry/                        │  ← Estimation
//! │        (rolling mean, exact / RK2 integration)      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   kinematics/                       │  ← Vehicle model
//! │      (geometry, wheel samples, forward/inverse)     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      core/                          │  ← Foundation
//! │                (types, thresholds)                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Simulate a constant-curvature drive with the default vehicle
//! cargo run --release -- --linear 1.0 --angular 0.2 --duration 10
//!
//! # Tricycle layout from a config file
//! cargo run --release -- --config ratha.toml --layout tricycle
//! ```

// Layer 1: Core foundation (no internal deps)
pub mod core;

// Layer 2: Vehicle model (depends on core)
pub mod kinematics;

// Layer 3: Odometry (depends on core, kinematics)
pub mod odometry;

// Layer 4: Controller (depends on all layers)
pub mod controller;

pub mod config;
pub mod error;

pub use crate::config::{GeometryConfig, RathaConfig};
pub use crate::controller::{ControllerConfig, ControllerState, SteeringController};
pub use crate::core::math::{EPSILON, MIN_VELOCITY_INTERVAL};
pub use crate::core::types::{Pose2D, Twist2D};
pub use crate::error::{RathaError, Result};
pub use crate::kinematics::{
    KinematicLayout, KinematicModel, Steering, SteeringCommand, Traction, VehicleGeometry,
    WheelSample,
};
pub use crate::odometry::{
    IntegrationMethod, RollingMean, SteeringOdometry, SteeringOdometryConfig, UpdateOutcome,
};
