//! Recommendation Engine
//!
//! - `climate.rs` - climate label classification
//! - `recommendations.rs` - climate, water-management and eco advice

pub mod climate;
pub mod recommendations;

pub use climate::ClimateClass;
pub use recommendations::{advise, eco_tips, regional_summary, water_management_tips, RegionalSummary};
