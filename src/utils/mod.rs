//! Utility modules shared across estimators
//!
//! - Stats: means and cyclic resizing of seasonal profiles

pub mod stats;

pub use stats::{mean, resize_cyclic};
