//! Whole-system compatibility checklist.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::state::SystemState;
use crate::catalog::Catalog;

/// Share of controller rated power the array may reach.
pub const CONTROLLER_OVERSIZE_ALLOWANCE: f64 = 1.2;
/// Assumed hours per day the loads run.
pub const DAILY_USE_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Success,
    Warning,
    Error,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "ok",
            Self::Warning => "warn",
            Self::Error => "error",
        })
    }
}

/// Which part of the system a check covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    ControllerSelected,
    MpptVoltage,
    MpptPower,
    InverterSelected,
    InverterOutput,
    BatteryVoltage,
    EnergyBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityCheck {
    pub kind: CheckKind,
    pub status: CheckStatus,
    pub message: String,
}

impl CompatibilityCheck {
    fn new(kind: CheckKind, status: CheckStatus, message: String) -> Self {
        Self {
            kind,
            status,
            message,
        }
    }
}

impl fmt::Display for CompatibilityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>5}] {}", self.status, self.message)
    }
}

/// Daily generation and consumption estimates (Wh/day).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBalance {
    pub generation_wh: f64,
    pub consumption_wh: f64,
}

impl EnergyBalance {
    /// `array_power * peak_sun_hours * efficiency / 100` against
    /// `(dc + ac) * 8`.
    pub fn of(state: &SystemState) -> Self {
        let m = &state.metrics;
        Self {
            generation_wh: m.array_power_w * m.peak_sun_hours * (m.system_efficiency_pct / 100.0),
            consumption_wh: state.loads.total_w() * DAILY_USE_HOURS,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.generation_wh >= self.consumption_wh
    }
}

/// Cross-checks the assembled system.
///
/// Checks, in order: controller MPPT window and power headroom (or a
/// missing-controller error), inverter AC headroom (or a missing-inverter
/// error), battery voltage when both are selected, and the daily energy
/// balance. No overall verdict is derived.
pub fn compatibility(state: &SystemState, catalog: &Catalog) -> Vec<CompatibilityCheck> {
    let mut checks = Vec::with_capacity(5);
    let array_power = state.metrics.array_power_w;
    let array_voltage = state.array.voltage;
    let controller = state.controller(catalog);
    let inverter = state.inverter(catalog);

    match controller {
        Some(c) => {
            if array_voltage >= c.mppt_min && array_voltage <= c.mppt_max {
                checks.push(CompatibilityCheck::new(
                    CheckKind::MpptVoltage,
                    CheckStatus::Success,
                    format!(
                        "MPPT voltage range compatible ({array_voltage:.1}V within {}V-{}V)",
                        c.mppt_min, c.mppt_max
                    ),
                ));
            } else {
                checks.push(CompatibilityCheck::new(
                    CheckKind::MpptVoltage,
                    CheckStatus::Error,
                    format!(
                        "MPPT voltage range incompatible ({array_voltage:.1}V outside {}V-{}V)",
                        c.mppt_min, c.mppt_max
                    ),
                ));
            }

            let limit = c.max_power * CONTROLLER_OVERSIZE_ALLOWANCE;
            if array_power <= limit {
                checks.push(CompatibilityCheck::new(
                    CheckKind::MpptPower,
                    CheckStatus::Success,
                    format!("MPPT power capacity adequate ({array_power:.0}W ≤ {limit:.0}W)"),
                ));
            } else {
                checks.push(CompatibilityCheck::new(
                    CheckKind::MpptPower,
                    CheckStatus::Warning,
                    format!("MPPT may be undersized ({array_power:.0}W > {limit:.0}W recommended)"),
                ));
            }
        }
        None => checks.push(CompatibilityCheck::new(
            CheckKind::ControllerSelected,
            CheckStatus::Error,
            "No MPPT controller selected".to_string(),
        )),
    }

    let ac_load = state.loads.ac_load_w;
    match inverter {
        Some(inv) if ac_load <= inv.max_ac_output => checks.push(CompatibilityCheck::new(
            CheckKind::InverterOutput,
            CheckStatus::Success,
            format!(
                "Inverter AC output adequate ({ac_load:.0}W ≤ {:.0}W)",
                inv.max_ac_output
            ),
        )),
        Some(inv) => checks.push(CompatibilityCheck::new(
            CheckKind::InverterOutput,
            CheckStatus::Error,
            format!(
                "Inverter AC output insufficient ({ac_load:.0}W > {:.0}W)",
                inv.max_ac_output
            ),
        )),
        None => checks.push(CompatibilityCheck::new(
            CheckKind::InverterSelected,
            CheckStatus::Error,
            "No inverter selected".to_string(),
        )),
    }

    if let (Some(c), Some(inv)) = (controller, inverter) {
        let volts = state.battery.voltage_v;
        let status = if c.supports_battery_voltage(volts) && inv.input_voltage == volts {
            CheckStatus::Success
        } else {
            CheckStatus::Warning
        };
        let message = match status {
            CheckStatus::Success => format!("Battery voltage compatible ({volts}V)"),
            _ => format!("Check battery voltage compatibility ({volts}V)"),
        };
        checks.push(CompatibilityCheck::new(CheckKind::BatteryVoltage, status, message));
    }

    let balance = EnergyBalance::of(state);
    let (gen_wh, use_wh) = (balance.generation_wh, balance.consumption_wh);
    checks.push(if balance.is_positive() {
        CompatibilityCheck::new(
            CheckKind::EnergyBalance,
            CheckStatus::Success,
            format!("Energy balance positive ({gen_wh:.0}Wh/day ≥ {use_wh:.0}Wh/day)"),
        )
    } else {
        CompatibilityCheck::new(
            CheckKind::EnergyBalance,
            CheckStatus::Warning,
            format!("Energy deficit ({gen_wh:.0}Wh/day < {use_wh:.0}Wh/day)"),
        )
    });

    debug!(
        checks = checks.len(),
        errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count(),
        "compatibility checked"
    );
    checks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::state::{Event, SystemSetup};

    fn state(controller_id: Option<u32>, inverter_id: Option<u32>) -> SystemState {
        let setup = SystemSetup {
            controller_id,
            inverter_id,
            ..SystemSetup::default()
        };
        SystemState::new(&Catalog::builtin(), setup).unwrap_or_else(|e| panic!("{e}"))
    }

    fn kinds_and_status(checks: &[CompatibilityCheck]) -> Vec<(CheckKind, CheckStatus)> {
        checks.iter().map(|c| (c.kind, c.status)).collect()
    }

    #[test]
    fn nothing_selected() {
        let checks = compatibility(&state(None, None), &Catalog::builtin());
        assert_eq!(
            kinds_and_status(&checks),
            vec![
                (CheckKind::ControllerSelected, CheckStatus::Error),
                (CheckKind::InverterSelected, CheckStatus::Error),
                (CheckKind::EnergyBalance, CheckStatus::Warning),
            ]
        );
        assert_eq!(checks[0].message, "No MPPT controller selected");
        assert_eq!(checks[1].message, "No inverter selected");
    }

    #[test]
    fn baseline_selection() {
        // 2100 W array, 150/60 controller (850 W), GS4048A inverter.
        let checks = compatibility(&state(Some(4), Some(5)), &Catalog::builtin());
        assert_eq!(
            kinds_and_status(&checks),
            vec![
                (CheckKind::MpptVoltage, CheckStatus::Success),
                (CheckKind::MpptPower, CheckStatus::Warning),
                (CheckKind::InverterOutput, CheckStatus::Success),
                (CheckKind::BatteryVoltage, CheckStatus::Success),
                (CheckKind::EnergyBalance, CheckStatus::Warning),
            ]
        );
        assert_eq!(
            checks[1].message,
            "MPPT may be undersized (2100W > 1020W recommended)"
        );
        assert_eq!(checks[3].message, "Battery voltage compatible (48V)");
    }

    #[test]
    fn inverter_voltage_mismatch_warns() {
        // Victron Phoenix 12/800 runs from 12 V; the bank is 48 V.
        let checks = compatibility(&state(Some(4), Some(1)), &Catalog::builtin());
        assert_eq!(
            kinds_and_status(&checks)[1..],
            [
                (CheckKind::MpptPower, CheckStatus::Warning),
                (CheckKind::InverterOutput, CheckStatus::Error),
                (CheckKind::BatteryVoltage, CheckStatus::Warning),
                (CheckKind::EnergyBalance, CheckStatus::Warning),
            ]
        );
    }

    #[test]
    fn mppt_window_error() {
        let catalog = Catalog::builtin();
        let (high_voltage, _) = state(Some(1), None)
            .apply(
                Event::ConfigureArray {
                    series: 4,
                    parallel: 1,
                    cell_temperature_c: 25.0,
                },
                &catalog,
            )
            .unwrap_or_else(|e| panic!("{e}"));
        let checks = compatibility(&high_voltage, &catalog);
        assert_eq!(checks[0].kind, CheckKind::MpptVoltage);
        assert_eq!(checks[0].status, CheckStatus::Error);
    }

    #[test]
    fn energy_balance_formula() {
        let s = state(None, None);
        let balance = EnergyBalance::of(&s);
        // 2100 W * 6 h * 0.76
        assert!((balance.generation_wh - 9576.0).abs() < 1e-6);
        assert_eq!(balance.consumption_wh, 1605.0 * 8.0);
        assert!(!balance.is_positive());
    }

    #[test]
    fn balance_depends_only_on_peak_sun_hours() {
        let catalog = Catalog::builtin();
        let (big, _) = state(None, None)
            .apply(
                Event::ConfigureArray {
                    series: 2,
                    parallel: 6,
                    cell_temperature_c: 25.0,
                },
                &catalog,
            )
            .unwrap_or_else(|e| panic!("{e}"));
        // Efficiency scales inversely with array power, so doubling the array
        // leaves daily energy unchanged: 4200 * 6 * 0.38 = 2100 * 6 * 0.76 = 9576 Wh.
        let small = EnergyBalance::of(&state(None, None));
        let balance = EnergyBalance::of(&big);
        assert!((balance.generation_wh - small.generation_wh).abs() < 1e-6);
        assert!(!balance.is_positive());
        let last = compatibility(&big, &catalog).pop();
        assert_eq!(last.map(|c| c.kind), Some(CheckKind::EnergyBalance));
    }
}
