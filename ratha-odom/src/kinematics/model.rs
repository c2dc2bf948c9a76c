//! Forward and inverse kinematics for steered vehicles.
//!
//! # Model
//!
//! The steered axle carries a virtual traction point at distance `L`
//! (wheelbase) ahead of the fixed axle. Its velocity points along the
//! steering angle δ, so with traction-point speed `v_c`:
//!
//! ```text
//! Vx = v_c · cos δ
//! ω  = v_c · sin δ / L      (= Vx · tan δ / L)
//! ```
//!
//! The dual (tricycle) layout puts two traction wheels on the steered axle
//! line at ±separation/2 around the traction point. That line passes through
//! the instantaneous center of rotation, so the wheels trace radii
//! `R ∓ separation/2` and roll without scrub at
//!
//! ```text
//! v_right = v_c + ω · separation / 2
//! v_left  = v_c − ω · separation / 2
//! ```
//!
//! With separation 0 both wheels run at `v_c` and the dual layout is the
//! single-wheel layout.
//!
//! Wheels on the fixed (rear) axle would instead need the ratio
//! `(R + s/2) / (R − s/2)` with `R = L / tan δ`, which diverges once steering
//! is tight enough that `R` reaches `s/2`, including every turn-in-place
//! command. The steered-axle placement keeps
//! both wheel speeds finite for every commanded twist and makes the forward
//! mean independent of δ, so that placement is the one modelled here.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::geometry::VehicleGeometry;
use super::sample::{SteeringCommand, Traction};
use crate::core::math::EPSILON;
use crate::core::types::Twist2D;

/// Available wheel layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinematicLayout {
    /// One steered axle, one effective traction wheel.
    Bicycle,

    /// One steered axle, two traction wheels separated by the track width.
    Tricycle,
}

impl fmt::Display for KinematicLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicLayout::Bicycle => write!(f, "Bicycle"),
            KinematicLayout::Tricycle => write!(f, "Tricycle"),
        }
    }
}

/// Kinematic model for a configured layout and geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicModel {
    layout: KinematicLayout,
    geometry: VehicleGeometry,
}

impl KinematicModel {
    pub fn new(layout: KinematicLayout, geometry: VehicleGeometry) -> Self {
        Self { layout, geometry }
    }

    #[inline]
    pub fn layout(&self) -> KinematicLayout {
        self.layout
    }

    #[inline]
    pub fn geometry(&self) -> &VehicleGeometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: VehicleGeometry) {
        self.geometry = geometry;
    }

    /// Body twist from traction wheel angular velocities and steering angle.
    ///
    /// Accepts either traction shape regardless of the configured layout;
    /// dual readings are combined into the traction-point speed.
    pub fn forward(&self, wheel_velocity: Traction, steering_angle: f64) -> Twist2D {
        let speed = self.traction_point_speed(wheel_velocity);
        Twist2D::new(
            speed * steering_angle.cos(),
            speed * steering_angle.sin() / self.geometry.wheelbase(),
        )
    }

    /// Linear speed of the virtual traction point in m/s.
    ///
    /// For dual wheels this is the mean wheel speed: the ±ω·separation/2
    /// turning-radius terms of the two wheels cancel.
    fn traction_point_speed(&self, wheel_velocity: Traction) -> f64 {
        match wheel_velocity {
            Traction::Single(velocity) => velocity * self.geometry.wheel_radius(),
            Traction::Dual { right, left } => {
                (right * self.geometry.right_wheel_radius()
                    + left * self.geometry.left_wheel_radius())
                    * 0.5
            }
        }
    }

    /// Steering angle and traction setpoints for a desired body twist.
    ///
    /// Near-zero linear speed (|Vx| < [`EPSILON`]) with non-zero yaw rate is
    /// a turn in place: the angle becomes `atan(ω·L / EPSILON)`, close to
    /// ±π/2 with the sign of ω, and the traction speed is chosen so the
    /// forward model reproduces ω.
    pub fn inverse(&self, twist: Twist2D) -> SteeringCommand {
        let wheelbase = self.geometry.wheelbase();
        let Twist2D { linear, angular } = twist;

        let (steering_angle, speed) = if linear.abs() < EPSILON {
            if angular == 0.0 {
                (0.0, linear)
            } else {
                let yaw_term = angular * wheelbase;
                ((yaw_term / EPSILON).atan(), EPSILON.hypot(yaw_term))
            }
        } else {
            let angle = (angular * wheelbase / linear).atan();
            (angle, linear / angle.cos())
        };

        let traction = match self.layout {
            KinematicLayout::Bicycle => Traction::Single(speed / self.geometry.wheel_radius()),
            KinematicLayout::Tricycle => {
                let differential = angular * self.geometry.wheel_separation() * 0.5;
                Traction::Dual {
                    right: (speed + differential) / self.geometry.right_wheel_radius(),
                    left: (speed - differential) / self.geometry.left_wheel_radius(),
                }
            }
        };

        SteeringCommand {
            steering_angle,
            traction,
        }
    }
}
