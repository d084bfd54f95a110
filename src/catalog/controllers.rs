//! MPPT charge controller specifications.

use serde::{Deserialize, Serialize};

use super::Category;

/// Electrical limits of an MPPT charge controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ControllerSpec {
    /// Stable catalog id.
    pub id: u32,
    pub name: String,
    /// Maximum PV input voltage (V).
    pub max_voltage: f64,
    /// Maximum current (A).
    pub max_current: f64,
    /// Maximum PV power (W).
    pub max_power: f64,
    /// Lower bound of the MPPT tracking window (V).
    pub mppt_min: f64,
    /// Upper bound of the MPPT tracking window (V).
    pub mppt_max: f64,
    /// Supported battery bank voltages as tags, e.g. `"48V"`.
    #[serde(rename = "batteryVoltage")]
    pub battery_voltages: Vec<String>,
    pub category: Category,
    #[serde(default)]
    pub features: Vec<String>,
}

impl ControllerSpec {
    /// Returns true if the controller lists `volts` (as `"<volts>V"`) among
    /// its supported battery voltages.
    pub fn supports_battery_voltage(&self, volts: u32) -> bool {
        let tag = format!("{volts}V");
        self.battery_voltages.iter().any(|v| *v == tag)
    }
}

#[allow(clippy::too_many_arguments)]
fn controller(
    id: u32,
    name: &str,
    max_voltage: f64,
    max_current: f64,
    max_power: f64,
    mppt: (f64, f64),
    battery_voltages: &[&str],
    category: Category,
    features: &[&str],
) -> ControllerSpec {
    ControllerSpec {
        id,
        name: name.to_string(),
        max_voltage,
        max_current,
        max_power,
        mppt_min: mppt.0,
        mppt_max: mppt.1,
        battery_voltages: battery_voltages.iter().map(|s| s.to_string()).collect(),
        category,
        features: features.iter().map(|s| s.to_string()).collect(),
    }
}

/// Built-in controller catalog, ordered by id.
#[rustfmt::skip]
pub fn builtin_controllers() -> Vec<ControllerSpec> {
    use Category::*;

    const VE: &[&str] = &["Bluetooth", "VE.Direct"];
    const LOW: &[&str] = &["12V", "24V"];
    const ALL: &[&str] = &["12V", "24V", "48V"];
    const HIGH: &[&str] = &["48V"];
    const UTILITY: &[&str] = &["1000V DC"];

    vec![
        controller(1, "Victron SmartSolar 75/15", 75.0, 15.0, 220.0, (18.0, 67.0), LOW, Small, VE),
        controller(2, "Victron SmartSolar 100/30", 100.0, 30.0, 440.0, (18.0, 92.0), ALL, Small, VE),
        controller(3, "Victron SmartSolar 100/50", 100.0, 50.0, 700.0, (18.0, 92.0), ALL, Small, VE),
        controller(4, "Victron SmartSolar 150/60", 150.0, 60.0, 850.0, (18.0, 142.0), ALL, Medium, VE),
        controller(5, "Victron SmartSolar 150/85", 150.0, 85.0, 1200.0, (18.0, 142.0), ALL, Medium, VE),
        controller(
            6,
            "Victron SmartSolar 250/100",
            250.0,
            100.0,
            1450.0,
            (18.0, 230.0),
            &["24V", "48V"],
            Medium,
            VE,
        ),
        controller(
            7,
            "Outback FlexMax 80",
            150.0,
            80.0,
            3000.0,
            (20.0, 145.0),
            ALL,
            Large,
            &["HUB Communication", "MATE3 Compatible"],
        ),
        controller(
            8,
            "Morningstar TriStar MPPT 600V",
            600.0,
            60.0,
            4500.0,
            (30.0, 550.0),
            ALL,
            Large,
            &["Ethernet", "Data Logging", "High Voltage"],
        ),
        controller(
            9,
            "SMA Sunny Boy Storage 3.7",
            500.0,
            50.0,
            3700.0,
            (125.0, 480.0),
            HIGH,
            Large,
            &["Battery Inverter", "SMA Sunny Portal"],
        ),
        controller(
            10,
            "Victron SmartSolar RS 450/100",
            450.0,
            100.0,
            5800.0,
            (80.0, 450.0),
            HIGH,
            Commercial,
            &["VE.Can", "VE.Direct", "Bluetooth"],
        ),
        controller(
            11,
            "SolarEdge SE5000H StorEdge",
            600.0,
            83.0,
            8200.0,
            (200.0, 500.0),
            HIGH,
            Commercial,
            &["Power Optimizers", "Monitoring", "Backup Power"],
        ),
        controller(
            12,
            "Fronius Symo GEN24 10.0 Plus",
            1000.0,
            100.0,
            10000.0,
            (200.0, 800.0),
            HIGH,
            Commercial,
            &["Hybrid Inverter", "Emergency Power", "Fronius Solar.web"],
        ),
        controller(
            13,
            "SMA Sunny Central 1500V",
            1500.0,
            100.0,
            15000.0,
            (580.0, 1500.0),
            UTILITY,
            Utility,
            &["Utility Scale", "Grid Management", "Remote Monitoring"],
        ),
        controller(
            14,
            "Huawei SUN2000-215KTL-H0",
            1500.0,
            143.0,
            21500.0,
            (200.0, 1500.0),
            UTILITY,
            Utility,
            &["AI-Powered AFCI", "FusionSolar", "Smart String Monitoring"],
        ),
        controller(
            15,
            "ABB TRIO-50.0-TL-OUTD",
            1500.0,
            167.0,
            25000.0,
            (350.0, 1500.0),
            UTILITY,
            Utility,
            &["Commercial Rooftop", "Remote Monitoring", "ABB Ability"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let ids: Vec<u32> = builtin_controllers().iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=15).collect::<Vec<_>>());
    }

    #[test]
    fn battery_voltage_tags() {
        let c = &builtin_controllers()[0];
        assert!(c.supports_battery_voltage(12));
        assert!(c.supports_battery_voltage(24));
        assert!(!c.supports_battery_voltage(48));
    }

    #[test]
    fn mppt_window_inside_voltage_limit() {
        for c in builtin_controllers() {
            assert!(c.mppt_min < c.mppt_max, "{}", c.name);
            assert!(c.mppt_max <= c.max_voltage, "{}", c.name);
        }
    }
}
