//! Regional carbon emission estimation

/// kg CO2 per kWh by grid region
const EMISSION_FACTORS: &[(&str, f64)] = &[("US", 0.4), ("EU", 0.3), ("IN", 0.8), ("CN", 0.6)];

/// Fallback factor for unknown region codes (US grid average)
pub const DEFAULT_EMISSION_FACTOR: f64 = 0.4;

/// Emission factor for a region code, falling back to the default
pub fn emission_factor(region: &str) -> f64 {
    EMISSION_FACTORS
        .iter()
        .find(|(code, _)| *code == region)
        .map(|(_, factor)| *factor)
        .unwrap_or(DEFAULT_EMISSION_FACTOR)
}

/// Estimated emissions in kg CO2 for a consumption figure
pub fn estimate_carbon(consumption_kwh: f64, region: &str) -> f64 {
    consumption_kwh * emission_factor(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_regions() {
        assert_eq!(estimate_carbon(100.0, "US"), 40.0);
        assert_eq!(estimate_carbon(100.0, "EU"), 30.0);
        assert_eq!(estimate_carbon(100.0, "IN"), 80.0);
        assert_eq!(estimate_carbon(100.0, "CN"), 60.0);
    }

    #[test]
    fn test_unknown_region_falls_back() {
        assert_eq!(estimate_carbon(100.0, "XX"), 40.0);
        assert_eq!(estimate_carbon(100.0, ""), 40.0);
    }

    #[test]
    fn test_zero_consumption() {
        assert_eq!(estimate_carbon(0.0, "IN"), 0.0);
    }
}
