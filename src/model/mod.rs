//! Estimation models
//!
//! - `regression`: centered OLS with an SVD pseudo-inverse
//! - `yield_predictor`: yield point estimate + heuristic 95% band
//! - `water_loss`: 12-month rainfall / irrigation-loss simulation

pub mod regression;
pub mod yield_predictor;
pub mod water_loss;

pub use regression::LinearModel;
pub use yield_predictor::{
    predict_for_record, PlantingForecast, YieldEstimate, YieldInputs, YieldPredictor, Z_95,
};
pub use water_loss::{
    monthly_rainfall, simulate_region, IrrigationMethod, MonthlyWaterBalance, RandomSource,
    RngSource, SoilType, WaterLossSeries, WaterLossSimulator, MONTHS,
};
