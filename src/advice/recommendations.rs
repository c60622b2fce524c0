//! Advice Generation
//!
//! Maps climate and irrigation/soil classifications to short advisory strings.
//! Every function here is total: unknown inputs fall through to generic advice.

use serde::Serialize;

use super::climate::ClimateClass;
use crate::data::RegionRecord;
use crate::model::{IrrigationMethod, SoilType};

/// Soil infiltration below which soil-improvement advice is added
const LOW_INFILTRATION_THRESHOLD: f64 = 0.8;

const ECO_TIPS: [&str; 4] = [
    "Compost organic waste to improve soil health.",
    "Practice crop rotation to reduce pests.",
    "Adopt renewable energy sources for irrigation.",
    "Minimize tilling to maintain soil structure.",
];

/// Climate-specific advice for a region, in display order.
pub fn advise(region: &RegionRecord) -> Vec<String> {
    let tips: &[&str] = match ClimateClass::from_label(&region.climate) {
        ClimateClass::Arid => &[
            "Harvest rainwater to supplement irrigation in dry months.",
            "Plant drought-resistant crop varieties.",
        ],
        ClimateClass::Temperate | ClimateClass::Humid => &[
            "Install smart soil-moisture sensors to schedule irrigation.",
            "Mulch soil to retain moisture and suppress weeds.",
        ],
        ClimateClass::Unclassified => &[
            "Use seasonal rainfall forecasts to plan planting and irrigation.",
            "Apply conservation techniques for soil moisture retention.",
        ],
    };

    tips.iter().map(|tip| tip.to_string()).collect()
}

/// Suggestions for cutting irrigation loss with the given method and soil.
pub fn water_management_tips(method: IrrigationMethod, soil: SoilType) -> Vec<String> {
    let mut tips = Vec::new();

    if method != IrrigationMethod::Drip {
        tips.push("Use drip irrigation to reduce water waste.".to_string());
    }
    tips.push("Mulch soil to retain moisture.".to_string());
    tips.push("Harvest rainwater for irrigation.".to_string());

    if soil.infiltration() < LOW_INFILTRATION_THRESHOLD {
        tips.push("Work organic matter into the soil to improve infiltration.".to_string());
    }

    tips
}

/// General sustainability tips, independent of region
pub fn eco_tips() -> &'static [&'static str] {
    &ECO_TIPS
}

/// Localized water data for one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSummary {
    pub region: String,
    pub annual_rainfall: f64,
    pub climate: String,
    pub climate_class: ClimateClass,
    pub average_temperature: f64,
    pub advice: Vec<String>,
}

pub fn regional_summary(region: &RegionRecord) -> RegionalSummary {
    RegionalSummary {
        region: region.id.clone(),
        annual_rainfall: region.annual_rainfall,
        climate: region.climate.clone(),
        climate_class: ClimateClass::from_label(&region.climate),
        average_temperature: region.average_temperature,
        advice: advise(region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ReferenceDataStore;

    #[test]
    fn test_arid_advice() {
        let store = ReferenceDataStore::builtin();
        let advice = advise(store.get_region("south").unwrap());
        assert!(advice.iter().any(|a| a.contains("rainwater")));
        assert!(advice.iter().any(|a| a.contains("drought-resistant")));
    }

    #[test]
    fn test_temperate_and_humid_advice() {
        let store = ReferenceDataStore::builtin();
        for id in ["north", "east"] {
            let advice = advise(store.get_region(id).unwrap());
            assert!(advice.iter().any(|a| a.contains("sensors")), "{}", id);
            assert!(advice.iter().any(|a| a.contains("Mulch")), "{}", id);
        }
    }

    #[test]
    fn test_generic_advice() {
        let store = ReferenceDataStore::builtin();
        let advice = advise(store.get_region("west").unwrap());
        assert!(advice[0].contains("seasonal rainfall forecasts"));
    }

    #[test]
    fn test_water_management_tips() {
        let drip = water_management_tips(IrrigationMethod::Drip, SoilType::Loam);
        assert_eq!(drip.len(), 2);
        assert!(!drip.iter().any(|t| t.contains("drip")));

        let sandy = water_management_tips(IrrigationMethod::Sprinkler, SoilType::Sandy);
        assert_eq!(sandy.len(), 3);
        assert!(sandy[0].contains("drip irrigation"));

        let flood = water_management_tips(IrrigationMethod::Other, SoilType::Clay);
        assert_eq!(flood.len(), 4);
        assert!(flood[3].contains("organic matter"));
    }

    #[test]
    fn test_regional_summary() {
        let store = ReferenceDataStore::builtin();
        let summary = regional_summary(store.get_region("south").unwrap());
        assert_eq!(summary.climate_class, ClimateClass::Arid);
        assert_eq!(summary.annual_rainfall, 500.0);
        assert_eq!(summary.advice.len(), 2);
        assert_eq!(eco_tips().len(), 4);
    }
}
