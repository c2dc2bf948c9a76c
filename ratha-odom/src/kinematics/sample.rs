//! Wheel-space quantities: traction readings/commands and steering angles.

use serde::{Deserialize, Serialize};

/// Per-wheel traction quantity.
///
/// The unit depends on context: absolute encoder position (rad) for
/// position feedback, angular velocity (rad/s) for velocity feedback and
/// for inverse-kinematics commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Traction {
    /// One effective traction wheel (bicycle layout).
    Single(f64),
    /// Two traction wheels separated by the track width (tricycle layout).
    Dual { right: f64, left: f64 },
}

impl Traction {
    /// Apply `f` to each wheel value.
    #[inline]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Traction::Single(value) => Traction::Single(f(value)),
            Traction::Dual { right, left } => Traction::Dual {
                right: f(right),
                left: f(left),
            },
        }
    }

    /// Combine wheel-by-wheel with a reading of the same shape.
    ///
    /// Returns `None` if one is single and the other dual.
    #[inline]
    pub fn zip_with(self, other: Traction, f: impl Fn(f64, f64) -> f64) -> Option<Self> {
        match (self, other) {
            (Traction::Single(a), Traction::Single(b)) => Some(Traction::Single(f(a, b))),
            (
                Traction::Dual { right, left },
                Traction::Dual {
                    right: other_right,
                    left: other_left,
                },
            ) => Some(Traction::Dual {
                right: f(right, other_right),
                left: f(left, other_left),
            }),
            _ => None,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        match *self {
            Traction::Single(value) => value.is_finite(),
            Traction::Dual { right, left } => right.is_finite() && left.is_finite(),
        }
    }
}

/// Steering feedback for the steered axle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Steering {
    /// One angle for the whole (virtual) steered axle, radians.
    Common(f64),
    /// Independent right/left steering joints, radians.
    PerSide { right: f64, left: f64 },
}

impl Steering {
    /// Effective virtual-axle steering angle.
    ///
    /// Per-side feedback is reduced to the arithmetic mean of both joints.
    #[inline]
    pub fn angle(&self) -> f64 {
        match *self {
            Steering::Common(angle) => angle,
            Steering::PerSide { right, left } => (right + left) * 0.5,
        }
    }

    /// Multiply every joint angle by a calibration factor.
    #[inline]
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Steering::Common(angle) => Steering::Common(angle * factor),
            Steering::PerSide { right, left } => Steering::PerSide {
                right: right * factor,
                left: left * factor,
            },
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        match *self {
            Steering::Common(angle) => angle.is_finite(),
            Steering::PerSide { right, left } => right.is_finite() && left.is_finite(),
        }
    }
}

/// One tick of wheel feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelSample {
    pub traction: Traction,
    pub steering: Steering,
}

impl WheelSample {
    /// Single traction wheel with a common steering angle.
    pub fn single(traction: f64, steering: f64) -> Self {
        Self {
            traction: Traction::Single(traction),
            steering: Steering::Common(steering),
        }
    }

    /// Dual traction wheels with a common steering angle.
    pub fn dual(right: f64, left: f64, steering: f64) -> Self {
        Self {
            traction: Traction::Dual { right, left },
            steering: Steering::Common(steering),
        }
    }

    /// Dual traction wheels with per-side steering angles.
    pub fn dual_per_side(right: f64, left: f64, steer_right: f64, steer_left: f64) -> Self {
        Self {
            traction: Traction::Dual { right, left },
            steering: Steering::PerSide {
                right: steer_right,
                left: steer_left,
            },
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.traction.is_finite() && self.steering.is_finite()
    }
}

/// Inverse-kinematics output: actuator setpoints for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringCommand {
    /// Steered axle angle in radians, in (-π/2, π/2).
    pub steering_angle: f64,
    /// Traction wheel angular velocity setpoint(s) in rad/s.
    pub traction: Traction,
}
