//! Body-frame velocity.

use serde::{Deserialize, Serialize};

/// Body twist: linear speed along the heading and yaw rate.
///
/// Uses ROS REP-103 convention: positive linear is forward, positive
/// angular is counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist2D {
    /// Linear velocity in m/s
    pub linear: f64,
    /// Angular velocity in rad/s
    pub angular: f64,
}

impl Twist2D {
    #[inline]
    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    /// Zero twist (vehicle at rest).
    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.linear.is_finite() && self.angular.is_finite()
    }
}
