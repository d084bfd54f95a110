//! Series/parallel aggregation and temperature derating of a PV array.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::ModuleSpec;

/// Cell temperature at Standard Test Conditions (°C).
pub const STC_CELL_TEMP_C: f64 = 25.0;

/// Cell temperatures the linear derating model is realistic for (°C).
pub const REALISTIC_CELL_TEMP_C: RangeInclusive<f64> = -40.0..=90.0;

/// User-chosen string layout and operating cell temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayTopology {
    /// Modules per string (>= 1).
    pub series: u32,
    /// Strings in parallel (>= 1).
    pub parallel: u32,
    /// Operating cell temperature (°C).
    pub cell_temperature_c: f64,
}

impl Default for ArrayTopology {
    fn default() -> Self {
        Self {
            series: 2,
            parallel: 3,
            cell_temperature_c: STC_CELL_TEMP_C,
        }
    }
}

impl ArrayTopology {
    /// Builds a topology from raw user input.
    ///
    /// Counts below 1 become 1 and a non-finite temperature becomes the
    /// STC temperature. This is the only place raw counts are coerced.
    pub fn from_inputs(series: i64, parallel: i64, cell_temperature_c: f64) -> Self {
        let count = |n: i64| u32::try_from(n.max(1)).unwrap_or(u32::MAX);
        Self {
            series: count(series),
            parallel: count(parallel),
            cell_temperature_c: if cell_temperature_c.is_finite() {
                cell_temperature_c
            } else {
                STC_CELL_TEMP_C
            },
        }
    }

    /// Module count, saturating at `u32::MAX`.
    pub fn total_modules(&self) -> u32 {
        self.series.saturating_mul(self.parallel)
    }
}

/// Electrical characteristics of the assembled array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayOutput {
    pub total_modules: u32,
    /// Operating voltage at maximum power (V).
    pub voltage: f64,
    /// Operating current at maximum power (A).
    pub current: f64,
    /// Nameplate power at STC (W).
    pub power: f64,
    /// Open-circuit voltage (V).
    pub voc: f64,
    /// Short-circuit current (A).
    pub isc: f64,
    /// Power at the operating cell temperature (W); equals `power` at 25 °C.
    pub derated_power: f64,
}

impl ArrayOutput {
    /// Returns true if the derated power differs from nameplate.
    pub fn is_derated(&self) -> bool {
        self.derated_power != self.power
    }
}

impl fmt::Display for ArrayOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} modules | {:.1} V  {:.2} A  {:.0} W | Voc={:.1} V  Isc={:.2} A",
            self.total_modules, self.voltage, self.current, self.power, self.voc, self.isc
        )?;
        if self.is_derated() {
            write!(f, " | derated={:.0} W", self.derated_power)?;
        }
        Ok(())
    }
}

/// Aggregates module ratings over `series` x `parallel`.
///
/// Voltage scales with the series count, current with the parallel count.
/// The module count saturates at `u32::MAX`. The returned `derated_power`
/// equals `power`; use [`array_output`] to apply a cell temperature.
pub fn compute_array_output(series: u32, parallel: u32, module: &ModuleSpec) -> ArrayOutput {
    let s = f64::from(series);
    let p = f64::from(parallel);
    let power = s * p * module.rated_power;
    ArrayOutput {
        total_modules: series.saturating_mul(parallel),
        voltage: s * module.vmp,
        current: p * module.imp,
        power,
        voc: s * module.voc,
        isc: p * module.isc,
        derated_power: power,
    }
}

/// Linear temperature derating of an STC power rating.
///
/// `derated = stc_power * (1 + coeff/100 * (cell_temp_c - 25))`. Identity at
/// 25 °C. Temperatures outside the realistic range are not rejected.
pub fn derate_power_for_temperature(
    stc_power: f64,
    cell_temp_c: f64,
    temp_coeff_pct_per_c: f64,
) -> f64 {
    let factor = 1.0 + (temp_coeff_pct_per_c / 100.0) * (cell_temp_c - STC_CELL_TEMP_C);
    stc_power * factor
}

/// Computes the array output for a topology, including temperature derating.
pub fn array_output(topology: &ArrayTopology, module: &ModuleSpec) -> ArrayOutput {
    let mut out = compute_array_output(topology.series, topology.parallel, module);
    let temp = topology.cell_temperature_c;
    if !REALISTIC_CELL_TEMP_C.contains(&temp) {
        warn!(cell_temperature_c = temp, "cell temperature outside realistic range");
    }
    if temp != STC_CELL_TEMP_C {
        out.derated_power = derate_power_for_temperature(out.power, temp, module.temp_coeff_power);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::modules::builtin_modules;

    fn spr350() -> ModuleSpec {
        builtin_modules().remove(0)
    }

    #[test]
    fn aggregation_is_exact_for_all_small_layouts() {
        for m in builtin_modules() {
            for s in 1..=12u32 {
                for p in 1..=8u32 {
                    let out = compute_array_output(s, p, &m);
                    assert_eq!(out.voltage, f64::from(s) * m.vmp);
                    assert_eq!(out.current, f64::from(p) * m.imp);
                    assert_eq!(out.power, f64::from(s) * f64::from(p) * m.rated_power);
                    assert_eq!(out.voc, f64::from(s) * m.voc);
                    assert_eq!(out.isc, f64::from(p) * m.isc);
                    assert_eq!(out.total_modules, s * p);
                }
            }
        }
    }

    #[test]
    fn two_by_three_spr350() {
        let out = compute_array_output(2, 3, &spr350());
        assert_eq!(out.total_modules, 6);
        assert!((out.voltage - 59.6).abs() < 1e-9);
        assert!((out.current - 35.25).abs() < 1e-9);
        assert_eq!(out.power, 2100.0);
        assert!((out.voc - 72.6).abs() < 1e-9);
        assert!((out.isc - 37.41).abs() < 1e-9);
        assert_eq!(out.derated_power, out.power);
    }

    #[test]
    fn derating_identity_at_stc() {
        for p in [0.0, 1.0, 350.0, 2100.0, 1.0e6] {
            for coeff in [-0.5, -0.29, 0.0, 0.06] {
                assert_eq!(derate_power_for_temperature(p, 25.0, coeff), p);
            }
        }
    }

    #[test]
    fn derating_is_linear_in_temperature() {
        let p = 2100.0;
        let d1 = derate_power_for_temperature(p, 35.0, -0.29) - p;
        let d2 = derate_power_for_temperature(p, 45.0, -0.29) - p;
        assert!((d2 - 2.0 * d1).abs() < 1e-9);
        let cold = derate_power_for_temperature(p, 15.0, -0.29) - p;
        assert!((cold + d1).abs() < 1e-9);
    }

    #[test]
    fn hot_cells_lose_power() {
        // 65 °C with -0.38 %/°C is about 85 % of rated.
        let derated = derate_power_for_temperature(1000.0, 65.0, -0.38);
        assert!((derated - 848.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_temperature_still_computes() {
        let derated = derate_power_for_temperature(1000.0, 400.0, -0.5);
        assert!(derated < 0.0);
    }

    #[test]
    fn topology_output_applies_derating() {
        let topo = ArrayTopology {
            cell_temperature_c: 45.0,
            ..ArrayTopology::default()
        };
        let out = array_output(&topo, &spr350());
        assert!(out.is_derated());
        assert!((out.derated_power - 2100.0 * (1.0 - 0.0029 * 20.0)).abs() < 1e-9);

        let stc = array_output(&ArrayTopology::default(), &spr350());
        assert!(!stc.is_derated());
        assert_eq!(stc.derated_power, stc.power);
    }

    #[test]
    fn from_inputs_clamps_counts() {
        let t = ArrayTopology::from_inputs(0, -4, 30.0);
        assert_eq!((t.series, t.parallel), (1, 1));
        assert_eq!(t.cell_temperature_c, 30.0);

        let t = ArrayTopology::from_inputs(4, 2, f64::NAN);
        assert_eq!((t.series, t.parallel), (4, 2));
        assert_eq!(t.cell_temperature_c, STC_CELL_TEMP_C);
        assert_eq!(t.total_modules(), 8);
    }

    #[test]
    fn huge_layouts_saturate_module_count() {
        let t = ArrayTopology::from_inputs(100_000, 100_000, 25.0);
        assert_eq!(t.total_modules(), u32::MAX);
        let out = array_output(&t, &spr350());
        assert_eq!(out.total_modules, u32::MAX);
        assert_eq!(out.power, 1.0e10 * 350.0);

        let t = ArrayTopology::from_inputs(i64::MAX, i64::MAX, 25.0);
        assert_eq!((t.series, t.parallel), (u32::MAX, u32::MAX));
        assert_eq!(array_output(&t, &spr350()).total_modules, u32::MAX);
    }

    #[test]
    fn display_mentions_derating_only_when_derated() {
        let stc = compute_array_output(2, 3, &spr350());
        assert!(!format!("{stc}").contains("derated"));
        let hot = array_output(
            &ArrayTopology {
                cell_temperature_c: 60.0,
                ..ArrayTopology::default()
            },
            &spr350(),
        );
        assert!(format!("{hot}").contains("derated"));
    }
}
