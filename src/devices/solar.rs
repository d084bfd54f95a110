use rand::Rng;

use crate::sim::types::{Season, Weather};

/// Annual GHI the generation model is normalized to (kWh/m²/yr).
pub const BASELINE_GHI: f64 = 2200.0;
/// Hour of peak generation.
pub const PEAK_HOUR: f64 = 12.0;
/// Spread constant of the Gaussian day curve.
pub const GAUSSIAN_SPREAD: f64 = 18.0;

/// Daylight window and seasonal scaling of generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonProfile {
    pub sunrise_hour: f64,
    pub sunset_hour: f64,
    /// Seasonal scaling of the peak (summer = 1.0).
    pub peak_factor: f64,
    /// Lower bound of the partly-cloudy jitter.
    pub cloud_variability: f64,
}

impl SeasonProfile {
    pub fn for_season(season: Season) -> Self {
        let (sunrise_hour, sunset_hour, peak_factor, cloud_variability) = match season {
            Season::Summer => (5.5, 18.5, 1.0, 0.95),
            Season::Spring => (6.0, 18.0, 0.9, 0.85),
            Season::Winter => (7.0, 17.0, 0.7, 0.8),
        };
        Self {
            sunrise_hour,
            sunset_hour,
            peak_factor,
            cloud_variability,
        }
    }

    /// Returns true if `hour` lies within `[sunrise, sunset]`.
    pub fn is_daylight(&self, hour: f64) -> bool {
        hour >= self.sunrise_hour && hour <= self.sunset_hour
    }
}

/// Fixed multiplier of a sky condition, before any jitter.
pub fn weather_factor(weather: Weather) -> f64 {
    match weather {
        Weather::Clear => 1.0,
        Weather::PartlyCloudy => 0.75,
        Weather::Overcast => 0.3,
    }
}

/// Bell curve over the day, 1.0 at noon.
pub fn day_curve(hour: f64) -> f64 {
    let from_peak = hour - PEAK_HOUR;
    (-(from_peak * from_peak) / GAUSSIAN_SPREAD).exp()
}

/// Hourly PV generation for one day's conditions.
///
/// Generation is zero outside the season's daylight window and otherwise
/// `peak_power * day_curve * peak_factor * weather * ghi_ratio`. Partly
/// cloudy hours are further scaled by a uniform draw from
/// `[cloud_variability, 1)`; this is the only use of the random source.
#[derive(Debug, Clone)]
pub struct SolarPv {
    /// Array power at the noon peak under clear sky (W).
    pub peak_power_w: f64,
    /// Site effective GHI relative to [`BASELINE_GHI`].
    pub ghi_ratio: f64,
    pub weather: Weather,
    pub profile: SeasonProfile,
}

impl SolarPv {
    /// Creates a generator for one day's conditions.
    ///
    /// # Arguments
    ///
    /// * `peak_power_w` - Array power (W); negative values are clamped to zero
    /// * `ghi_ratio` - Effective site GHI over the 2200 kWh/m²/yr baseline
    /// * `weather` - Sky condition for the day
    /// * `season` - Selects the daylight window and peak factor
    pub fn new(peak_power_w: f64, ghi_ratio: f64, weather: Weather, season: Season) -> Self {
        Self {
            peak_power_w: peak_power_w.max(0.0),
            ghi_ratio,
            weather,
            profile: SeasonProfile::for_season(season),
        }
    }

    /// Generation (W) during `hour`.
    pub fn generation_w(&self, hour: usize, rng: &mut impl Rng) -> f64 {
        let h = hour as f64;
        if !self.profile.is_daylight(h) {
            return 0.0;
        }

        let mut watts = self.peak_power_w
            * day_curve(h)
            * self.profile.peak_factor
            * weather_factor(self.weather);

        if self.weather == Weather::PartlyCloudy {
            let floor = self.profile.cloud_variability;
            watts *= floor + rng.random::<f64>() * (1.0 - floor);
        }

        (watts * self.ghi_ratio).max(0.0)
    }
}
