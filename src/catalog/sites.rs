//! Reference sites with annual irradiance and optimal array geometry.

use serde::{Deserialize, Serialize};

/// One reference location.
///
/// `optimal_azimuth` is 180° (south-facing) for northern-hemisphere sites
/// and 0° (north-facing) for southern-hemisphere sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteRecord {
    /// Lookup key, e.g. `"phoenix"`.
    pub key: String,
    pub name: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Annual global horizontal irradiance (kWh/m²/yr).
    pub ghi: f64,
    /// Optimal tilt (degrees from horizontal).
    pub optimal_tilt: f64,
    /// Optimal azimuth (degrees, 0 = north).
    pub optimal_azimuth: f64,
    /// Average daily peak sun hours.
    pub peak_sun_hours: f64,
}

impl SiteRecord {
    pub fn is_southern_hemisphere(&self) -> bool {
        self.latitude < 0.0
    }
}

#[allow(clippy::too_many_arguments)]
fn site(
    key: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
    ghi: f64,
    optimal_tilt: f64,
    optimal_azimuth: f64,
    peak_sun_hours: f64,
) -> SiteRecord {
    SiteRecord {
        key: key.to_string(),
        name: name.to_string(),
        latitude,
        longitude,
        ghi,
        optimal_tilt,
        optimal_azimuth,
        peak_sun_hours,
    }
}

/// Built-in site catalog.
#[rustfmt::skip]
pub fn builtin_sites() -> Vec<SiteRecord> {
    vec![
        site("new_york", "New York, NY", 40.7128, -74.0060, 1400.0, 33.0, 180.0, 4.0),
        site("los_angeles", "Los Angeles, CA", 34.0522, -118.2437, 1900.0, 34.0, 180.0, 5.2),
        site("chicago", "Chicago, IL", 41.8781, -87.6298, 1350.0, 38.0, 180.0, 3.8),
        site("houston", "Houston, TX", 29.7604, -95.3698, 1650.0, 28.0, 180.0, 4.5),
        site("phoenix", "Phoenix, AZ", 33.4484, -112.0740, 2200.0, 33.0, 180.0, 6.0),
        site("miami", "Miami, FL", 25.7617, -80.1918, 1750.0, 25.0, 180.0, 4.8),
        site("denver", "Denver, CO", 39.7392, -104.9903, 1800.0, 38.0, 180.0, 5.0),
        site("seattle", "Seattle, WA", 47.6062, -122.3321, 1200.0, 44.0, 180.0, 3.3),
        site("sydney", "Sydney, NSW", -33.87, 151.21, 1800.0, 34.0, 0.0, 4.9),
        site("melbourne", "Melbourne, VIC", -37.81, 144.96, 1550.0, 38.0, 0.0, 4.2),
        site("brisbane", "Brisbane, QLD", -27.47, 153.03, 1900.0, 27.0, 0.0, 5.2),
        site("perth", "Perth, WA", -31.95, 115.86, 1980.0, 32.0, 0.0, 5.4),
        site("adelaide", "Adelaide, SA", -34.93, 138.60, 1680.0, 35.0, 0.0, 4.6),
        site("canberra", "Canberra, ACT", -35.28, 149.13, 1760.0, 35.0, 0.0, 4.8),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azimuth_follows_hemisphere() {
        for s in builtin_sites() {
            let expected = if s.is_southern_hemisphere() { 0.0 } else { 180.0 };
            assert_eq!(s.optimal_azimuth, expected, "{}", s.key);
        }
    }
}
