//! Post-hoc statistics computed from a simulated day.

use std::fmt;

use serde::Serialize;

use super::types::SimulationSeries;

/// Battery equivalent full cycles over a SOC sequence.
///
/// Sums every decrease between consecutive values and divides by 100, so one
/// cycle is 100 percentage points of cumulative discharge. Increases are
/// ignored. Sequences shorter than two values yield 0.
pub fn battery_cycles(soc_pct: &[f64]) -> f64 {
    let discharged: f64 = soc_pct
        .windows(2)
        .map(|w| (w[0] - w[1]).max(0.0))
        .sum();
    discharged / 100.0
}

/// Aggregate figures for one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_generation_kwh: f64,
    pub total_consumption_kwh: f64,
    /// Generation minus consumption (kWh).
    pub net_energy_kwh: f64,
    pub battery_cycles: f64,
    pub min_soc_pct: f64,
    pub peak_generation_w: f64,
    pub peak_load_w: f64,
    /// `(generation - |net|) / generation * 100`, 0 without generation.
    pub efficiency_pct: f64,
}

impl SimulationSummary {
    pub fn from_series(series: &SimulationSeries) -> Self {
        let total_generation_kwh = series.generation_w.iter().sum::<f64>() / 1000.0;
        let total_consumption_kwh = series.load_w.iter().sum::<f64>() / 1000.0;
        let net_energy_kwh = total_generation_kwh - total_consumption_kwh;

        let efficiency_pct = if total_generation_kwh > 0.0 {
            (total_generation_kwh - net_energy_kwh.abs()) / total_generation_kwh * 100.0
        } else {
            0.0
        };

        Self {
            total_generation_kwh,
            total_consumption_kwh,
            net_energy_kwh,
            battery_cycles: battery_cycles(&series.battery_soc_pct),
            min_soc_pct: series
                .battery_soc_pct
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min),
            peak_generation_w: series.generation_w.iter().copied().fold(0.0, f64::max),
            peak_load_w: series.load_w.iter().copied().fold(0.0, f64::max),
            efficiency_pct,
        }
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Daily Summary ---")?;
        writeln!(f, "Generation:        {:.1} kWh", self.total_generation_kwh)?;
        writeln!(f, "Consumption:       {:.1} kWh", self.total_consumption_kwh)?;
        writeln!(f, "Net energy:        {:.1} kWh", self.net_energy_kwh)?;
        writeln!(f, "Battery cycles:    {:.2}", self.battery_cycles)?;
        writeln!(f, "Minimum SoC:       {:.0}%", self.min_soc_pct)?;
        writeln!(
            f,
            "Peak gen / load:   {:.0} W / {:.0} W",
            self.peak_generation_w, self.peak_load_w
        )?;
        write!(f, "Efficiency:        {:.1}%", self.efficiency_pct)
    }
}
