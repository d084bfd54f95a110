//! Fixed household load table.

use serde::{Deserialize, Serialize};

/// A DC appliance with its rated draw and daily run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DcLoad {
    pub name: String,
    /// Rated draw (W).
    pub power: f64,
    /// Run time per day (h).
    pub hours: f64,
}

impl DcLoad {
    /// Daily energy (Wh).
    pub fn daily_energy_wh(&self) -> f64 {
        self.power * self.hours
    }
}

/// Total AC load of the reference household (W).
pub const DEFAULT_AC_LOAD_W: f64 = 1400.0;

/// Running draw of the largest motor load, the water pump (W).
pub const DEFAULT_LARGEST_MOTOR_W: f64 = 750.0;

pub fn builtin_dc_loads() -> Vec<DcLoad> {
    [
        ("LED Lights", 50.0, 8.0),
        ("DC Fans", 25.0, 10.0),
        ("DC Refrigerator", 100.0, 12.0),
        ("Electronics", 30.0, 16.0),
    ]
    .into_iter()
    .map(|(name, power, hours)| DcLoad {
        name: name.to_string(),
        power,
        hours,
    })
    .collect()
}
