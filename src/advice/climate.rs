//! Climate Classification
//!
//! Groups free-form regional climate labels into the classes the
//! recommendation engine distinguishes. Unknown labels are not an error; they
//! land in `Unclassified` and get the generic advice.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateClass {
    /// Low rainfall, high evaporation
    Arid,

    /// Mild, adequate rainfall year-round
    Temperate,

    /// Warm with high rainfall
    Humid,

    /// Everything else ("semi-arid", "mediterranean", empty, ...)
    Unclassified,
}

impl ClimateClass {
    /// Case-insensitive match on the region's climate label
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "arid" => ClimateClass::Arid,
            "temperate" => ClimateClass::Temperate,
            "humid" => ClimateClass::Humid,
            _ => ClimateClass::Unclassified,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ClimateClass::Arid => "Arid",
            ClimateClass::Temperate => "Temperate",
            ClimateClass::Humid => "Humid",
            ClimateClass::Unclassified => "Unclassified",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(ClimateClass::from_label("arid"), ClimateClass::Arid);
        assert_eq!(ClimateClass::from_label(" Temperate"), ClimateClass::Temperate);
        assert_eq!(ClimateClass::from_label("HUMID"), ClimateClass::Humid);
        assert_eq!(ClimateClass::from_label("semi-arid"), ClimateClass::Unclassified);
        assert_eq!(ClimateClass::from_label(""), ClimateClass::Unclassified);
    }
}
