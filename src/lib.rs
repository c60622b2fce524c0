//! Crop Yield & Irrigation Water-Loss Estimator
//!
//! Estimates crop yield and seasonal irrigation loss from historical crop
//! records and regional rainfall profiles.
//!
//! - `data`: read-only reference store (crop + region records)
//! - `model/`: OLS yield predictor and water-loss simulator
//! - `advice/`: climate and water-management recommendations
//! - `config`: environment-driven configuration
//!
//! All estimators borrow the store immutably and keep no state between calls.
//! The only mutable input is the [`RandomSource`] handed to the simulator.

pub mod advice;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod utils;

// Re-export commonly used types
pub use advice::{advise, eco_tips, regional_summary, water_management_tips, ClimateClass};
pub use config::EstimatorConfig;
pub use data::{CropRecord, ReferenceDataStore, RegionRecord};
pub use error::{EstimationError, Result};
pub use model::{
    IrrigationMethod, RandomSource, RngSource, SoilType, WaterLossSeries, WaterLossSimulator,
    YieldEstimate, YieldInputs, YieldPredictor,
};
