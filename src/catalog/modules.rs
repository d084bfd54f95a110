//! PV module electrical specifications.

use serde::{Deserialize, Serialize};

/// Nameplate electrical data for one PV module at STC (1000 W/m², 25 °C).
///
/// Field names follow the catalog data contract (`ratedPower`, `vmp`, ...)
/// when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleSpec {
    /// Manufacturer and model name.
    pub name: String,
    /// Rated power (W).
    #[serde(alias = "power")]
    pub rated_power: f64,
    /// Voltage at maximum power (V).
    pub vmp: f64,
    /// Current at maximum power (A).
    pub imp: f64,
    /// Open-circuit voltage (V).
    pub voc: f64,
    /// Short-circuit current (A).
    pub isc: f64,
    /// Power temperature coefficient (%/°C, negative for silicon).
    #[serde(alias = "tempCoeff")]
    pub temp_coeff_power: f64,
    /// Voltage temperature coefficient (%/°C).
    pub temp_coeff_voltage: f64,
    /// Current temperature coefficient (%/°C).
    pub temp_coeff_current: f64,
}

#[allow(clippy::too_many_arguments)]
fn module(
    name: &str,
    rated_power: f64,
    vmp: f64,
    imp: f64,
    voc: f64,
    isc: f64,
    temp_coeff_power: f64,
    temp_coeff_voltage: f64,
    temp_coeff_current: f64,
) -> ModuleSpec {
    ModuleSpec {
        name: name.to_string(),
        rated_power,
        vmp,
        imp,
        voc,
        isc,
        temp_coeff_power,
        temp_coeff_voltage,
        temp_coeff_current,
    }
}

/// Built-in module catalog, selected by index.
#[rustfmt::skip]
pub fn builtin_modules() -> Vec<ModuleSpec> {
    vec![
        module("SunPower SPR-350-WHT", 350.0, 29.8, 11.75, 36.3, 12.47, -0.29, -0.27, 0.06),
        module("LG NeON R LG365Q1C-A5", 365.0, 31.6, 11.55, 38.4, 12.26, -0.26, -0.25, 0.05),
        module("Canadian Solar CS3U-400MS", 400.0, 34.2, 11.70, 41.4, 12.53, -0.37, -0.31, 0.06),
        module("Jinko Tiger Pro JKM450M-60HL4-V", 450.0, 34.8, 12.93, 42.1, 13.78, -0.35, -0.28, 0.05),
        module("REC Alpha Pure-R REC405AA", 405.0, 34.6, 11.71, 41.8, 12.45, -0.28, -0.26, 0.04),
    ]
}
