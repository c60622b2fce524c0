// Estimation Report Binary
//
// Runs the yield predictor, water-loss simulator and recommendation engine for
// one crop/region pair and prints a JSON report.
//
// Usage: estimate <crop> <region> [irrigation_method] [soil_type] [farm_size_acres]
// Yield inputs, seed and dataset come from AGRI_* environment variables.

use agri_estimator::model::PlantingForecast;
use agri_estimator::{
    advise, eco_tips, regional_summary, water_management_tips, EstimatorConfig,
    IrrigationMethod, RngSource, SoilType, WaterLossSimulator, YieldPredictor,
};
use anyhow::Context;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agri_estimator=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        anyhow::bail!(
            "usage: estimate <crop> <region> [irrigation_method] [soil_type] [farm_size_acres]"
        );
    }
    let crop = &args[0];
    let region_id = &args[1];
    let irrigation = args.get(2).map(String::as_str).unwrap_or("drip");
    let soil = args.get(3).map(String::as_str).unwrap_or("loam");
    let farm_size: f64 = match args.get(4) {
        Some(raw) => raw.parse().with_context(|| format!("Invalid farm size: {}", raw))?,
        None => 1.0,
    };

    let config = EstimatorConfig::from_env();
    tracing::info!("Configuration: {:?}", config);

    let store = config.load_store()?;
    let predictor = YieldPredictor::new(&store);
    let simulator = WaterLossSimulator::new(&store);

    let estimate = predictor
        .predict(crop, &config.yield_inputs)
        .with_context(|| format!("Yield prediction failed for '{}'", crop))?;

    let forecast: PlantingForecast = predictor
        .trend_forecast(crop, config.yield_inputs.soil_quality, farm_size)
        .with_context(|| format!("Trend forecast failed for '{}'", crop))?;

    let mut rng = RngSource::seeded(config.seed);
    let water = simulator
        .simulate(region_id, irrigation, soil, &mut rng)
        .with_context(|| format!("Water-loss simulation failed for '{}'", region_id))?;

    let region = store.get_region(region_id)?;

    let report = json!({
        "inputs": config.yield_inputs,
        "yield": estimate,
        "planting": forecast,
        "water_loss": water,
        "region": regional_summary(region),
        "advice": advise(region),
        "water_management": water_management_tips(
            IrrigationMethod::from_name(irrigation),
            SoilType::from_name(soil),
        ),
        "eco_tips": eco_tips(),
    });

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
