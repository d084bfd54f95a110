//! Core simulation types: conditions, run parameters, and the hourly series.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::devices::battery::BatterySpec;
use crate::devices::solar::BASELINE_GHI;

/// Number of hourly steps in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Sky condition applied to the whole simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    PartlyCloudy,
    Overcast,
}

impl Weather {
    /// Phrase used in the conditions insight.
    pub fn description(self) -> &'static str {
        match self {
            Self::Clear => "clear sky conditions",
            Self::PartlyCloudy => "partly cloudy conditions",
            Self::Overcast => "overcast conditions",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::PartlyCloudy => "partly_cloudy",
            Self::Overcast => "overcast",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clear" => Ok(Self::Clear),
            "partly_cloudy" | "partly-cloudy" => Ok(Self::PartlyCloudy),
            "overcast" => Ok(Self::Overcast),
            other => Err(format!(
                "unknown weather \"{other}\" (expected clear, partly_cloudy, overcast)"
            )),
        }
    }
}

/// Season driving daylight hours and the load multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Summer,
    Spring,
    Winter,
}

impl Season {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summer => "summer",
            Self::Spring => "spring",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summer" => Ok(Self::Summer),
            "spring" => Ok(Self::Spring),
            "winter" => Ok(Self::Winter),
            other => Err(format!(
                "unknown season \"{other}\" (expected summer, spring, winter)"
            )),
        }
    }
}

/// Everything one simulated day depends on, apart from the random source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    pub weather: Weather,
    pub season: Season,
    /// Nameplate array power used as the generation peak (W).
    pub array_peak_power_w: f64,
    /// Site effective GHI over the 2200 kWh/m²/yr baseline.
    pub ghi_ratio: f64,
    pub battery: BatterySpec,
}

impl SimulationParams {
    /// Builds parameters from an effective GHI (kWh/m²/yr).
    pub fn new(
        weather: Weather,
        season: Season,
        array_peak_power_w: f64,
        effective_ghi: f64,
        battery: BatterySpec,
    ) -> Self {
        Self {
            weather,
            season,
            array_peak_power_w,
            ghi_ratio: effective_ghi / BASELINE_GHI,
            battery,
        }
    }
}

/// One simulated hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourRecord {
    pub hour: usize,
    pub generation_w: f64,
    pub load_w: f64,
    /// SOC at the end of the hour (%).
    pub battery_soc_pct: f64,
}

impl HourRecord {
    pub fn net_w(&self) -> f64 {
        self.generation_w - self.load_w
    }
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h={:>2} | gen={:>6.0} W  load={:>5.0} W  net={:>+7.0} W | SoC={:>3.0}%",
            self.hour,
            self.generation_w,
            self.load_w,
            self.net_w(),
            self.battery_soc_pct,
        )
    }
}

/// Hourly generation, load, and battery SOC for hours 0..23.
///
/// Values are kept unrounded; rounding is left to display and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSeries {
    pub generation_w: [f64; HOURS_PER_DAY],
    pub load_w: [f64; HOURS_PER_DAY],
    pub battery_soc_pct: [f64; HOURS_PER_DAY],
}

impl SimulationSeries {
    /// Builds a series from per-hour records.
    ///
    /// Hours outside 0..23 are ignored.
    pub fn from_records(records: &[HourRecord]) -> Self {
        let mut series = Self {
            generation_w: [0.0; HOURS_PER_DAY],
            load_w: [0.0; HOURS_PER_DAY],
            battery_soc_pct: [0.0; HOURS_PER_DAY],
        };
        for r in records.iter().filter(|r| r.hour < HOURS_PER_DAY) {
            series.generation_w[r.hour] = r.generation_w;
            series.load_w[r.hour] = r.load_w;
            series.battery_soc_pct[r.hour] = r.battery_soc_pct;
        }
        series
    }

    pub fn hour(&self, hour: usize) -> Option<HourRecord> {
        (hour < HOURS_PER_DAY).then(|| HourRecord {
            hour,
            generation_w: self.generation_w[hour],
            load_w: self.load_w[hour],
            battery_soc_pct: self.battery_soc_pct[hour],
        })
    }

    pub fn hours(&self) -> impl Iterator<Item = HourRecord> + '_ {
        (0..HOURS_PER_DAY).filter_map(|h| self.hour(h))
    }
}
