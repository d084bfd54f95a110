//! Rule-based advisories over a day's summary.

use std::fmt;

use serde::Serialize;

use super::summary::SimulationSummary;
use super::types::{Season, Weather};

/// Battery cycling below this is considered gentle.
const LOW_CYCLES: f64 = 0.3;
/// Battery cycling above this suggests an undersized bank.
const HIGH_CYCLES: f64 = 0.8;
/// SOC (%) below which the bank is deemed over-discharged.
const MIN_RECOMMENDED_SOC_PCT: f64 = 30.0;

/// One advisory about a simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    Conditions { weather: Weather, season: Season },
    EnergyExcess { kwh: f64 },
    BatteryAdequate,
    ResilientInPoorWeather,
    EnergyDeficit { kwh: f64 },
    AddPanels,
    WeatherImpact,
    WinterConditions,
    WinterBackup,
    SummerConditions,
    SummerAcDemand,
    LowCycling,
    HighCycling,
    NormalCycling,
    Efficiency { pct: f64 },
    LowSoc,
    ManageLoads,
    PeakLoadExceedsGeneration { peak_load_w: f64, peak_generation_w: f64 },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conditions { weather, season } => write!(
                f,
                "Simulation based on {} in {season}",
                weather.description()
            ),
            Self::EnergyExcess { kwh } => {
                write!(f, "System generates {kwh:.1} kWh excess energy daily")
            }
            Self::BatteryAdequate => {
                f.write_str("Battery bank adequately sized for load requirements")
            }
            Self::ResilientInPoorWeather => {
                f.write_str("Good performance despite poor weather conditions")
            }
            Self::EnergyDeficit { kwh } => {
                write!(f, "System has {kwh:.1} kWh daily energy deficit")
            }
            Self::AddPanels => f.write_str(
                "Consider adding more solar panels - deficit even in optimal conditions",
            ),
            Self::WeatherImpact => f.write_str("Poor weather significantly impacts performance"),
            Self::WinterConditions => f.write_str(
                "Winter simulation shows reduced solar generation and increased heating loads",
            ),
            Self::WinterBackup => f.write_str("Consider backup power source for winter months"),
            Self::SummerConditions => f.write_str(
                "Summer simulation shows peak solar generation but high cooling loads",
            ),
            Self::SummerAcDemand => {
                f.write_str("AC loads create significant energy demand in summer")
            }
            Self::LowCycling => f.write_str("Low battery cycling extends battery life"),
            Self::HighCycling => {
                f.write_str("High battery cycling - consider larger battery bank")
            }
            Self::NormalCycling => f.write_str("Battery cycling is within acceptable range"),
            Self::Efficiency { pct } => write!(f, "System efficiency: {pct:.1}%"),
            Self::LowSoc => f.write_str("Battery SOC drops below recommended minimum (30%)"),
            Self::ManageLoads => {
                f.write_str("Consider load management or battery capacity increase")
            }
            Self::PeakLoadExceedsGeneration {
                peak_load_w,
                peak_generation_w,
            } => write!(
                f,
                "Peak load ({peak_load_w:.0}W) exceeds maximum generation ({peak_generation_w:.0}W)"
            ),
        }
    }
}

/// Classifies a day into an ordered list of advisories.
///
/// Order: conditions, energy balance, season, battery cycling, efficiency,
/// minimum SOC, peak load.
pub fn generate_insights(
    summary: &SimulationSummary,
    weather: Weather,
    season: Season,
) -> Vec<Insight> {
    let mut insights = vec![Insight::Conditions { weather, season }];
    let net = summary.net_energy_kwh;

    if net > 0.0 {
        insights.push(Insight::EnergyExcess { kwh: net });
        insights.push(Insight::BatteryAdequate);
        if weather == Weather::Overcast {
            insights.push(Insight::ResilientInPoorWeather);
        }
    } else {
        insights.push(Insight::EnergyDeficit { kwh: net.abs() });
        insights.push(if weather == Weather::Clear {
            Insight::AddPanels
        } else {
            Insight::WeatherImpact
        });
    }

    match season {
        Season::Winter => {
            insights.push(Insight::WinterConditions);
            if net < 0.0 {
                insights.push(Insight::WinterBackup);
            }
        }
        Season::Summer => {
            insights.push(Insight::SummerConditions);
            if summary.total_consumption_kwh > summary.total_generation_kwh {
                insights.push(Insight::SummerAcDemand);
            }
        }
        Season::Spring => {}
    }

    insights.push(if summary.battery_cycles < LOW_CYCLES {
        Insight::LowCycling
    } else if summary.battery_cycles > HIGH_CYCLES {
        Insight::HighCycling
    } else {
        Insight::NormalCycling
    });

    insights.push(Insight::Efficiency {
        pct: summary.efficiency_pct,
    });

    if summary.min_soc_pct < MIN_RECOMMENDED_SOC_PCT {
        insights.push(Insight::LowSoc);
        insights.push(Insight::ManageLoads);
    }

    if summary.peak_load_w > summary.peak_generation_w && weather == Weather::Clear {
        insights.push(Insight::PeakLoadExceedsGeneration {
            peak_load_w: summary.peak_load_w,
            peak_generation_w: summary.peak_generation_w,
        });
    }

    insights
}
