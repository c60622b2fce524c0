//! Yield Predictor
//!
//! Fits a multivariate linear model of yield against water use, fertilizer and
//! a soil factor, then projects the yield for the caller's growing conditions.
//!
//! **Design matrix** (one row per historical observation):
//!   `[water_use_i, fertilizer_i, soil_quality * 0.1]`
//!
//! The soil factor comes from the query, not from history, so it is the same on
//! every training row. After centering it becomes a zero column and the
//! pseudo-inverse gives it a zero coefficient.
//!
//! **Interval**: `point ± 1.96 × RMSE`, where RMSE is measured on the training
//! rows. This is a normal-approximation band, not a regression prediction
//! interval.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::regression::LinearModel;
use crate::data::{CropRecord, ReferenceDataStore};
use crate::error::{check_range, EstimationError, Result};
use crate::utils::mean;

/// z-score for a two-sided 95% normal band
pub const Z_95: f64 = 1.96;

/// soil_factor = soil_quality × SOIL_FACTOR_SCALE
const SOIL_FACTOR_SCALE: f64 = 0.1;

/// Fraction of average water use saved per unit of irrigation inefficiency
const IRRIGATION_WATER_SENSITIVITY: f64 = 0.02;

/// Yield added per soil-quality point by the trend forecast
const TREND_SOIL_BONUS: f64 = 0.05;

/// Minimum observations for a least-squares fit
const MIN_OBSERVATIONS: usize = 2;

/// Caller-supplied growing conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldInputs {
    /// Soil quality score, 1-100
    pub soil_quality: f64,

    /// Extra fertilizer on top of the historical mean (kg/acre), ≥ 0
    pub fertilizer_boost: f64,

    /// Irrigation efficiency, 0.5-1.0
    pub irrigation_efficiency: f64,
}

impl YieldInputs {
    pub fn validate(&self) -> Result<()> {
        check_range("soil_quality", self.soil_quality, 1.0, 100.0)?;
        check_range("fertilizer_boost", self.fertilizer_boost, 0.0, f64::MAX)?;
        check_range("irrigation_efficiency", self.irrigation_efficiency, 0.5, 1.0)?;
        Ok(())
    }

    pub fn soil_factor(&self) -> f64 {
        self.soil_quality * SOIL_FACTOR_SCALE
    }
}

impl Default for YieldInputs {
    fn default() -> Self {
        YieldInputs {
            soil_quality: 70.0,
            fertilizer_boost: 0.0,
            irrigation_efficiency: 0.9,
        }
    }
}

/// Point estimate with its heuristic 95% band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldEstimate {
    pub crop: String,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
    /// Root-mean-square training residual
    pub rmse: f64,
    /// Coefficients for [water_use, fertilizer, soil_factor]
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl YieldEstimate {
    pub fn interval_width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Trend-based projection used by the planting planner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantingForecast {
    pub crop: String,
    pub farm_size_acres: f64,
    /// Projected yield for the next season (units/acre)
    pub projected_yield: f64,
}

/// Yield prediction over a read-only reference store
#[derive(Debug, Clone, Copy)]
pub struct YieldPredictor<'a> {
    store: &'a ReferenceDataStore,
}

impl<'a> YieldPredictor<'a> {
    pub fn new(store: &'a ReferenceDataStore) -> Self {
        YieldPredictor { store }
    }

    /// Predict yield for `crop_id` under the given conditions.
    ///
    /// Fails with `UnknownCrop`, `InvalidInput` or `InsufficientHistory`.
    pub fn predict(&self, crop_id: &str, inputs: &YieldInputs) -> Result<YieldEstimate> {
        let crop = self.store.get_crop(crop_id)?;
        predict_for_record(crop, inputs)
    }

    /// Predict every crop in the store, ordered by crop id.
    pub fn predict_all(&self, inputs: &YieldInputs) -> Vec<(String, Result<YieldEstimate>)> {
        self.store
            .list_crop_ids()
            .par_iter()
            .map(|id| (id.to_string(), self.predict(id, inputs)))
            .collect()
    }

    /// Project next season's yield from the historical trend alone.
    ///
    /// Fits yield against observation index, evaluates at the next index and
    /// adds `soil_quality × 0.05`.
    pub fn trend_forecast(
        &self,
        crop_id: &str,
        soil_quality: f64,
        farm_size_acres: f64,
    ) -> Result<PlantingForecast> {
        let crop = self.store.get_crop(crop_id)?;
        check_range("soil_quality", soil_quality, 1.0, 100.0)?;
        if !farm_size_acres.is_finite() || farm_size_acres <= 0.0 {
            return Err(EstimationError::invalid(
                "farm_size_acres",
                format!("{} must be a positive number", farm_size_acres),
            ));
        }
        ensure_history(crop)?;

        let rows: Vec<Vec<f64>> = (0..crop.observations()).map(|i| vec![i as f64]).collect();
        let model = LinearModel::fit(&rows, &crop.yield_series)?;
        let next_index = crop.observations() as f64;
        let projected_yield = model.predict(&[next_index]) + soil_quality * TREND_SOIL_BONUS;

        tracing::debug!(
            "Trend forecast for {}: slope={:.4}, projected={:.4}",
            crop.id,
            model.coefficients[0],
            projected_yield
        );

        Ok(PlantingForecast {
            crop: crop.id.clone(),
            farm_size_acres,
            projected_yield,
        })
    }
}

/// Fit the model on one crop's history and evaluate it at the caller's inputs.
pub fn predict_for_record(crop: &CropRecord, inputs: &YieldInputs) -> Result<YieldEstimate> {
    inputs.validate()?;
    ensure_history(crop)?;

    let soil_factor = inputs.soil_factor();

    // STEP 1: Design matrix with the soil factor broadcast across history
    let rows: Vec<Vec<f64>> = crop
        .water_use_series
        .iter()
        .zip(&crop.fertilizer_series)
        .map(|(&water, &fertilizer)| vec![water, fertilizer, soil_factor])
        .collect();

    // STEP 2: Fit
    let model = LinearModel::fit(&rows, &crop.yield_series)?;

    // STEP 3: Prediction row for the query conditions
    let avg_water_use = mean(&crop.water_use_series)
        * (1.0 - (1.0 - inputs.irrigation_efficiency) * IRRIGATION_WATER_SENSITIVITY);
    let avg_fertilizer = mean(&crop.fertilizer_series) + inputs.fertilizer_boost;
    let point = model.predict(&[avg_water_use, avg_fertilizer, soil_factor]);

    // STEP 4: Heuristic band from training error
    let rmse = model.rmse(&rows, &crop.yield_series);
    let half_width = Z_95 * rmse;

    tracing::debug!(
        "Yield for {}: point={:.4}, rmse={:.4} (water={:.2}, fertilizer={:.2}, soil={:.2})",
        crop.id,
        point,
        rmse,
        avg_water_use,
        avg_fertilizer,
        soil_factor
    );

    Ok(YieldEstimate {
        crop: crop.id.clone(),
        point,
        lower: point - half_width,
        upper: point + half_width,
        rmse,
        coefficients: model.coefficients,
        intercept: model.intercept,
    })
}

fn ensure_history(crop: &CropRecord) -> Result<()> {
    if crop.observations() < MIN_OBSERVATIONS {
        return Err(EstimationError::InsufficientHistory {
            crop: crop.id.clone(),
            observations: crop.observations(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wheat_inputs() -> YieldInputs {
        YieldInputs {
            soil_quality: 70.0,
            fertilizer_boost: 5.0,
            irrigation_efficiency: 0.9,
        }
    }

    #[test]
    fn test_wheat_reference_fit() {
        let store = ReferenceDataStore::builtin();
        let estimate = YieldPredictor::new(&store).predict("wheat", &wheat_inputs()).unwrap();

        assert_relative_eq!(estimate.coefficients[0], -0.052251250694830, epsilon = 1e-9);
        assert_relative_eq!(estimate.coefficients[1], 3.971650917176209, epsilon = 1e-9);
        assert_relative_eq!(estimate.coefficients[2], 0.0, epsilon = 1e-9);
        assert_relative_eq!(estimate.intercept, 121.27015008337969, epsilon = 1e-7);

        assert_relative_eq!(estimate.point, 326.8998465814342, epsilon = 1e-8);
        assert_relative_eq!(estimate.rmse, 0.7492816645193419, epsilon = 1e-9);
        assert_relative_eq!(estimate.lower, 325.4312545189763, epsilon = 1e-8);
        assert_relative_eq!(estimate.upper, 328.3684386438921, epsilon = 1e-8);
    }

    #[test]
    fn test_interval_brackets_point() {
        let store = ReferenceDataStore::builtin();
        let predictor = YieldPredictor::new(&store);
        for id in store.list_crop_ids() {
            let e = predictor.predict(id, &YieldInputs::default()).unwrap();
            assert!(e.lower <= e.point && e.point <= e.upper, "{}: {:?}", id, e);
            assert_relative_eq!(e.interval_width(), 2.0 * Z_95 * e.rmse, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_soil_quality_does_not_move_point() {
        let store = ReferenceDataStore::builtin();
        let predictor = YieldPredictor::new(&store);
        let poor = predictor
            .predict("corn", &YieldInputs { soil_quality: 1.0, ..YieldInputs::default() })
            .unwrap();
        let rich = predictor
            .predict("corn", &YieldInputs { soil_quality: 100.0, ..YieldInputs::default() })
            .unwrap();
        assert_relative_eq!(poor.point, rich.point, epsilon = 1e-8);
    }

    #[test]
    fn test_rejects_out_of_range_inputs() {
        let store = ReferenceDataStore::builtin();
        let predictor = YieldPredictor::new(&store);
        let cases = [
            YieldInputs { soil_quality: 0.0, ..wheat_inputs() },
            YieldInputs { soil_quality: 101.0, ..wheat_inputs() },
            YieldInputs { fertilizer_boost: -1.0, ..wheat_inputs() },
            YieldInputs { irrigation_efficiency: 0.4, ..wheat_inputs() },
            YieldInputs { irrigation_efficiency: f64::NAN, ..wheat_inputs() },
        ];
        for inputs in cases {
            let err = predictor.predict("wheat", &inputs).unwrap_err();
            assert!(matches!(err, EstimationError::InvalidInput { .. }), "{:?}", inputs);
        }
    }

    #[test]
    fn test_single_observation_is_insufficient() {
        let crop = CropRecord {
            id: "oats".into(),
            yield_series: vec![200.0],
            water_use_series: vec![300.0],
            fertilizer_series: vec![40.0],
        };
        assert_eq!(
            predict_for_record(&crop, &YieldInputs::default()).unwrap_err(),
            EstimationError::InsufficientHistory { crop: "oats".into(), observations: 1 }
        );
    }

    #[test]
    fn test_two_observations_fit() {
        let crop = CropRecord {
            id: "oats".into(),
            yield_series: vec![200.0, 220.0],
            water_use_series: vec![300.0, 320.0],
            fertilizer_series: vec![40.0, 42.0],
        };
        let e = predict_for_record(&crop, &YieldInputs::default()).unwrap();
        assert!(e.point.is_finite());
        assert_relative_eq!(e.rmse, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_trend_forecast() {
        let store = ReferenceDataStore::builtin();
        let forecast = YieldPredictor::new(&store).trend_forecast("wheat", 60.0, 12.5).unwrap();
        // yields 300,320,290,310,315 over 0..5: slope 2, intercept 303; at x=5 → 313
        assert_relative_eq!(forecast.projected_yield, 313.0 + 60.0 * 0.05, epsilon = 1e-9);
        assert_eq!(forecast.farm_size_acres, 12.5);
        assert_eq!(forecast.crop, "wheat");
    }

    #[test]
    fn test_trend_forecast_validation() {
        let store = ReferenceDataStore::builtin();
        let predictor = YieldPredictor::new(&store);
        assert!(matches!(
            predictor.trend_forecast("wheat", 50.0, 0.0),
            Err(EstimationError::InvalidInput { field: "farm_size_acres", .. })
        ));
        assert!(matches!(
            predictor.trend_forecast("kale", 50.0, 1.0),
            Err(EstimationError::UnknownCrop(_))
        ));
    }
}
