//! Kinematic model layer.
//!
//! Converts between wheel space (traction wheel rates, steering angle) and
//! the body twist `(Vx, ω)` for the supported wheel layouts.
//!
//! # Components
//!
//! - [`VehicleGeometry`]: Validated radius / separation / wheelbase
//! - [`WheelSample`]: One tick of traction + steering feedback
//! - [`KinematicModel`]: Forward and inverse kinematics for a [`KinematicLayout`]

mod geometry;
mod model;
mod sample;

pub use geometry::VehicleGeometry;
pub use model::{KinematicLayout, KinematicModel};
pub use sample::{Steering, SteeringCommand, Traction, WheelSample};
