//! Off-grid inverter specifications.

use serde::{Deserialize, Serialize};

use super::Category;

/// AC output ratings and DC input of an inverter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InverterSpec {
    /// Stable catalog id.
    pub id: u32,
    pub name: String,
    /// Continuous AC rating (W).
    pub continuous: f64,
    /// Maximum AC output (W).
    #[serde(rename = "maxACOutput", alias = "maxAcOutput")]
    pub max_ac_output: f64,
    /// Short-term surge rating (W).
    #[serde(alias = "surgeRating")]
    pub surge: f64,
    /// Nominal DC input voltage (V).
    pub input_voltage: u32,
    /// DC to AC conversion efficiency (0..1).
    pub efficiency: f64,
    pub category: Category,
    #[serde(default)]
    pub features: Vec<String>,
}

#[allow(clippy::too_many_arguments)]
fn inverter(
    id: u32,
    name: &str,
    continuous: f64,
    max_ac_output: f64,
    surge: f64,
    input_voltage: u32,
    efficiency: f64,
    category: Category,
    features: &[&str],
) -> InverterSpec {
    InverterSpec {
        id,
        name: name.to_string(),
        continuous,
        max_ac_output,
        surge,
        input_voltage,
        efficiency,
        category,
        features: features.iter().map(|s| s.to_string()).collect(),
    }
}

/// Built-in inverter catalog, ordered by id.
#[rustfmt::skip]
pub fn builtin_inverters() -> Vec<InverterSpec> {
    use Category::*;

    vec![
        inverter(1, "Victron Phoenix 12/800", 800.0, 800.0, 1600.0, 12, 0.92, Small,
            &["Pure Sine Wave", "Remote Control"]),
        inverter(2, "AIMS Power 1500W Pure Sine", 1500.0, 1500.0, 3000.0, 24, 0.90, Small,
            &["LCD Display", "USB Port"]),
        inverter(3, "Renogy 2000W Pure Sine Wave", 2000.0, 2000.0, 4000.0, 12, 0.91, Small,
            &["LCD Display", "Remote Control", "Overload Protection"]),
        inverter(4, "Victron MultiPlus 24/3000", 2500.0, 3000.0, 6000.0, 24, 0.94, Medium,
            &["Charger Function", "Transfer Switch", "VE.Bus"]),
        inverter(5, "Outback Power GS4048A", 4000.0, 4000.0, 11000.0, 48, 0.93, Medium,
            &["Grid-Tie Capability", "Battery Charger", "Generator Start"]),
        inverter(6, "Schneider XW Pro 6848", 4500.0, 5500.0, 13500.0, 48, 0.95, Medium,
            &["Grid Interactive", "MPPT Charger", "Load Control"]),
        inverter(7, "SMA Sunny Island 6.0H", 4600.0, 6000.0, 13800.0, 48, 0.95, Large,
            &["Battery Management", "Grid Forming", "Webconnect"]),
        inverter(8, "Victron Quattro 48/8000", 6500.0, 8000.0, 16000.0, 48, 0.94, Large,
            &["Dual AC Input", "Transfer Switch", "Parallel Operation"]),
        inverter(9, "Outback Power Radian GS8048A", 8000.0, 8000.0, 22000.0, 48, 0.94, Large,
            &["Grid-Tie with Battery Backup", "Sell-Back Capability", "Advanced Battery Charging"]),
        inverter(10, "SMA Sunny Tripower 15000TL", 15000.0, 15000.0, 18000.0, 600, 0.98, Commercial,
            &["Three-Phase", "OptiTrac+ MPPT", "Webconnect"]),
        inverter(11, "Fronius Primo 20.0-1", 20000.0, 20000.0, 22000.0, 800, 0.97, Commercial,
            &["SnapINverter Technology", "Integrated Data Monitoring", "Arc Fault Detection"]),
        inverter(12, "SolarEdge SE25K-US", 25000.0, 25000.0, 27500.0, 1000, 0.97, Commercial,
            &["Power Optimizers Compatible", "SafeDC", "Commercial Monitoring"]),
        inverter(13, "ABB PVS980-58-2000kW", 50000.0, 58000.0, 60000.0, 1500, 0.99, Utility,
            &["Central Inverter", "Medium Voltage", "ABB Ability"]),
        inverter(14, "SMA Sunny Central 2500-EV", 75000.0, 75000.0, 82500.0, 1500, 0.99, Utility,
            &["Medium Voltage", "OptiCool", "Utility Scale"]),
        inverter(15, "Power Electronics FS3400K", 100000.0, 100000.0, 110000.0, 1500, 0.99, Utility,
            &["Central Inverter", "MV Transformer Integrated", "Remote Monitoring"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surge_never_below_max_output() {
        for inv in builtin_inverters() {
            assert!(inv.surge >= inv.max_ac_output, "{}", inv.name);
            assert!(inv.max_ac_output >= inv.continuous, "{}", inv.name);
            assert!((0.0..=1.0).contains(&inv.efficiency));
        }
    }
}
