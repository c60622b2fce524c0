//! Reference Data Store
//!
//! Holds the immutable historical crop records and regional climate records the
//! estimators read from. The store is validated once at construction and never
//! mutated afterwards, so it can be shared freely across threads.
//!
//! Three sources are supported:
//! - `builtin()` - the fixed demonstration dataset
//! - `from_json_file()` - a `{ "crops": [...], "regions": [...] }` document
//! - `from_csv_dir()` - `crops.csv` + `regions.csv` with pipe-separated series

use std::fs;
use std::path::Path;

use anyhow::Context;
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};

/// Historical observations for one crop type.
///
/// The three series are index-aligned: observation `i`'s yield corresponds to
/// observation `i`'s water use and fertilizer application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecord {
    /// Crop key (e.g., "wheat")
    pub id: String,

    /// Yield per observation (units/acre)
    pub yield_series: Vec<f64>,

    /// Water used per observation (mm)
    pub water_use_series: Vec<f64>,

    /// Fertilizer applied per observation (kg/acre)
    pub fertilizer_series: Vec<f64>,
}

impl CropRecord {
    /// Number of historical observations
    pub fn observations(&self) -> usize {
        self.yield_series.len()
    }

    fn validate(&self) -> Result<()> {
        let n = self.yield_series.len();
        if n == 0 {
            return Err(EstimationError::InvalidDataset(format!(
                "crop '{}' has no observations",
                self.id
            )));
        }
        if self.water_use_series.len() != n || self.fertilizer_series.len() != n {
            return Err(EstimationError::InvalidDataset(format!(
                "crop '{}' series lengths differ (yield {}, water use {}, fertilizer {})",
                self.id,
                n,
                self.water_use_series.len(),
                self.fertilizer_series.len()
            )));
        }
        let all_finite = self.yield_series.iter()
            .chain(&self.water_use_series)
            .chain(&self.fertilizer_series)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(EstimationError::InvalidDataset(format!(
                "crop '{}' contains non-finite values",
                self.id
            )));
        }
        Ok(())
    }
}

/// Rainfall and climate profile for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Region key (e.g., "north")
    pub id: String,

    /// Annual precipitation (mm)
    pub annual_rainfall: f64,

    /// Free-form climate label ("arid", "temperate", "humid", "semi-arid", ...)
    pub climate: String,

    /// Mean annual temperature (°C)
    pub average_temperature: f64,

    /// Rainfall per season (4 values) or per month (12 values), mm
    pub seasonal_rainfall: Vec<f64>,
}

impl RegionRecord {
    fn validate(&self) -> Result<()> {
        let len = self.seasonal_rainfall.len();
        if len != 4 && len != 12 {
            return Err(EstimationError::InvalidDataset(format!(
                "region '{}' has {} seasonal rainfall values, expected 4 or 12",
                self.id, len
            )));
        }
        if !self.annual_rainfall.is_finite()
            || !self.average_temperature.is_finite()
            || self.seasonal_rainfall.iter().any(|v| !v.is_finite())
        {
            return Err(EstimationError::InvalidDataset(format!(
                "region '{}' contains non-finite values",
                self.id
            )));
        }
        Ok(())
    }
}

/// On-disk JSON layout
#[derive(Debug, Serialize, Deserialize)]
struct DatasetDocument {
    crops: Vec<CropRecord>,
    regions: Vec<RegionRecord>,
}

/// Read-only store of crop and region records
#[derive(Debug, Clone)]
pub struct ReferenceDataStore {
    crops: FxHashMap<String, CropRecord>,
    regions: FxHashMap<String, RegionRecord>,
}

impl ReferenceDataStore {
    /// Build a store from records, validating every record.
    ///
    /// Duplicate ids are rejected rather than silently overwritten.
    pub fn new(crops: Vec<CropRecord>, regions: Vec<RegionRecord>) -> Result<Self> {
        let mut crop_map = FxHashMap::default();
        for crop in crops {
            crop.validate()?;
            if crop_map.contains_key(&crop.id) {
                return Err(EstimationError::InvalidDataset(format!("duplicate crop '{}'", crop.id)));
            }
            crop_map.insert(crop.id.clone(), crop);
        }

        let mut region_map = FxHashMap::default();
        for region in regions {
            region.validate()?;
            if region_map.contains_key(&region.id) {
                return Err(EstimationError::InvalidDataset(format!(
                    "duplicate region '{}'",
                    region.id
                )));
            }
            region_map.insert(region.id.clone(), region);
        }

        Ok(ReferenceDataStore { crops: crop_map, regions: region_map })
    }

    /// The fixed demonstration dataset
    pub fn builtin() -> Self {
        let crops = vec![
            crop(
                "wheat",
                &[300.0, 320.0, 290.0, 310.0, 315.0],
                &[400.0, 380.0, 410.0, 395.0, 405.0],
                &[50.0, 55.0, 48.0, 53.0, 54.0],
            ),
            crop(
                "corn",
                &[500.0, 520.0, 480.0, 510.0, 530.0],
                &[600.0, 590.0, 620.0, 605.0, 610.0],
                &[70.0, 74.0, 66.0, 72.0, 75.0],
            ),
            crop(
                "rice",
                &[450.0, 470.0, 440.0, 465.0, 460.0],
                &[900.0, 880.0, 920.0, 890.0, 905.0],
                &[60.0, 64.0, 58.0, 63.0, 62.0],
            ),
        ];

        let regions = vec![
            region("north", 1000.0, "temperate", 15.0, &[300.0, 250.0, 200.0, 250.0]),
            region("south", 500.0, "arid", 28.0, &[150.0, 100.0, 50.0, 200.0]),
            region("east", 800.0, "humid", 22.0, &[200.0, 250.0, 200.0, 150.0]),
            region("west", 600.0, "semi-arid", 20.0, &[200.0, 150.0, 100.0, 150.0]),
        ];

        // Hardcoded records satisfy every invariant checked by `new`
        let crops = crops.into_iter().map(|c| (c.id.clone(), c)).collect();
        let regions = regions.into_iter().map(|r| (r.id.clone(), r)).collect();
        ReferenceDataStore { crops, regions }
    }

    /// Load a JSON dataset document
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset file: {:?}", path))?;

        let doc: DatasetDocument = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse dataset JSON: {:?}", path))?;

        let store = Self::new(doc.crops, doc.regions)?;
        tracing::info!(
            "Loaded dataset {:?}: {} crops, {} regions",
            path,
            store.crops.len(),
            store.regions.len()
        );
        Ok(store)
    }

    /// Load `crops.csv` and `regions.csv` from a directory
    ///
    /// Series columns hold pipe-separated numbers, e.g. `300|320|290`.
    pub fn from_csv_dir(dir: &Path) -> anyhow::Result<Self> {
        let crops = Self::load_crops(&dir.join("crops.csv"))?;
        let regions = Self::load_regions(&dir.join("regions.csv"))?;

        let store = Self::new(crops, regions)?;
        tracing::info!(
            "Loaded CSV dataset from {:?}: {} crops, {} regions",
            dir,
            store.crops.len(),
            store.regions.len()
        );
        Ok(store)
    }

    fn load_crops(path: &Path) -> anyhow::Result<Vec<CropRecord>> {
        let df = read_csv(path)?;

        let ids = string_column(&df, "crop")?;
        let yields = string_column(&df, "yield")?;
        let water = string_column(&df, "water_use")?;
        let fertilizer = string_column(&df, "fertilizer")?;

        let ids = ids.str()?;
        let yields = yields.str()?;
        let water = water.str()?;
        let fertilizer = fertilizer.str()?;

        let mut crops = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let id = ids.get(idx)
                .with_context(|| format!("Row {} of {:?} has no crop id", idx, path))?;

            crops.push(CropRecord {
                id: id.to_string(),
                yield_series: parse_series(yields.get(idx).unwrap_or(""))
                    .with_context(|| format!("Bad yield series for crop '{}'", id))?,
                water_use_series: parse_series(water.get(idx).unwrap_or(""))
                    .with_context(|| format!("Bad water_use series for crop '{}'", id))?,
                fertilizer_series: parse_series(fertilizer.get(idx).unwrap_or(""))
                    .with_context(|| format!("Bad fertilizer series for crop '{}'", id))?,
            });
        }

        Ok(crops)
    }

    fn load_regions(path: &Path) -> anyhow::Result<Vec<RegionRecord>> {
        let df = read_csv(path)?;

        let ids = string_column(&df, "region")?;
        let climate = string_column(&df, "climate")?;
        let seasonal = string_column(&df, "seasonal_rainfall")?;
        let rainfall = float_column(&df, "annual_rainfall")?;
        let temperature = float_column(&df, "average_temperature")?;

        let ids = ids.str()?;
        let climate = climate.str()?;
        let seasonal = seasonal.str()?;
        let rainfall = rainfall.f64()?;
        let temperature = temperature.f64()?;

        let mut regions = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let id = ids.get(idx)
                .with_context(|| format!("Row {} of {:?} has no region id", idx, path))?;

            regions.push(RegionRecord {
                id: id.to_string(),
                annual_rainfall: rainfall.get(idx)
                    .with_context(|| format!("Region '{}' is missing annual_rainfall", id))?,
                climate: climate.get(idx).unwrap_or("").to_string(),
                average_temperature: temperature.get(idx)
                    .with_context(|| format!("Region '{}' is missing average_temperature", id))?,
                seasonal_rainfall: parse_series(seasonal.get(idx).unwrap_or(""))
                    .with_context(|| format!("Bad seasonal_rainfall for region '{}'", id))?,
            });
        }

        Ok(regions)
    }

    pub fn get_crop(&self, id: &str) -> Result<&CropRecord> {
        self.crops.get(id)
            .ok_or_else(|| EstimationError::UnknownCrop(id.to_string()))
    }

    pub fn get_region(&self, id: &str) -> Result<&RegionRecord> {
        self.regions.get(id)
            .ok_or_else(|| EstimationError::UnknownRegion(id.to_string()))
    }

    /// Crop ids, sorted
    pub fn list_crop_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.crops.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Region ids, sorted
    pub fn list_region_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ReferenceDataStore {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn crop(id: &str, yields: &[f64], water: &[f64], fertilizer: &[f64]) -> CropRecord {
    CropRecord {
        id: id.to_string(),
        yield_series: yields.to_vec(),
        water_use_series: water.to_vec(),
        fertilizer_series: fertilizer.to_vec(),
    }
}

fn region(id: &str, rainfall: f64, climate: &str, temperature: f64, seasonal: &[f64]) -> RegionRecord {
    RegionRecord {
        id: id.to_string(),
        annual_rainfall: rainfall,
        climate: climate.to_string(),
        average_temperature: temperature,
        seasonal_rainfall: seasonal.to_vec(),
    }
}

fn read_csv(path: &Path) -> anyhow::Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to load CSV: {:?}", path))
}

/// Fetch a column as strings; single-value series would otherwise infer as numeric
fn string_column(df: &DataFrame, name: &str) -> anyhow::Result<Column> {
    df.column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::String)
        .with_context(|| format!("Column '{}' cannot be read as text", name))
}

fn float_column(df: &DataFrame, name: &str) -> anyhow::Result<Column> {
    df.column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))
}

/// Parse "300|320|290" into numbers
fn parse_series(raw: &str) -> anyhow::Result<Vec<f64>> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().with_context(|| format!("'{}' is not a number", s)))
        .collect()
}
