//! Vehicle pose in the fixed odometry frame.

use serde::{Deserialize, Serialize};

/// Vehicle pose in 2D space.
///
/// Position (x, y) in meters and heading (theta) in radians.
///
/// Unlike scan-matching poses, theta here is NOT normalized: the odometry
/// integrator accumulates heading without wraparound, so a vehicle that
/// drives two full circles reports a heading of 4π. Callers that need a
/// canonical range wrap it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Heading in radians (unbounded)
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose. Theta is stored as given.
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Pose at the origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Euclidean distance between the positions of two poses.
    #[inline]
    pub fn distance(&self, other: &Pose2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
