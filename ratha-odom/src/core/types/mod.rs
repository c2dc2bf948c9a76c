//! Core data types.

mod pose;
mod twist;

pub use pose::Pose2D;
pub use twist::Twist2D;
