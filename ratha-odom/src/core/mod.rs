//! Core foundation layer.
//!
//! - [`types`]: Pose and twist types shared by every other layer
//! - [`math`]: Numeric thresholds

pub mod math;
pub mod types;

pub use types::{Pose2D, Twist2D};
