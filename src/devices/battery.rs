use serde::{Deserialize, Serialize};

/// SOC at the start of a simulated day (%).
pub const INITIAL_SOC_PCT: f64 = 80.0;
/// Lowest SOC the bank is allowed to reach (%).
pub const MIN_SOC_PCT: f64 = 20.0;
/// Highest SOC (%).
pub const MAX_SOC_PCT: f64 = 100.0;

/// Nominal battery bank ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySpec {
    /// Bank voltage (V).
    pub voltage_v: u32,
    /// Capacity (Ah).
    pub capacity_ah: f64,
}

impl Default for BatterySpec {
    fn default() -> Self {
        Self {
            voltage_v: 48,
            capacity_ah: 400.0,
        }
    }
}

impl BatterySpec {
    /// Stored energy at 100 % SOC (kWh).
    pub fn capacity_kwh(&self) -> f64 {
        f64::from(self.voltage_v) * self.capacity_ah / 1000.0
    }
}

/// A battery bank tracked by state of charge.
///
/// Each hour the net power is converted to amp-hours at the bank voltage and
/// applied to the SOC, which is then clamped to `[20, 100]` %.
///
/// # Power Flow Convention
/// Positive net power charges the bank; negative discharges it.
#[derive(Debug, Clone)]
pub struct Battery {
    pub spec: BatterySpec,
    /// State of charge (%).
    pub soc_pct: f64,
}

impl Battery {
    /// Creates a bank at the initial 80 % SOC.
    pub fn new(spec: BatterySpec) -> Self {
        Self {
            spec,
            soc_pct: INITIAL_SOC_PCT,
        }
    }

    /// Applies one hour of net power (W) and returns the new SOC (%).
    ///
    /// `soc += net_w / voltage / capacity_ah * 100`, clamped. A step that
    /// would produce NaN leaves the SOC unchanged.
    pub fn apply_net_power(&mut self, net_w: f64) -> f64 {
        let amp_hours = net_w / f64::from(self.spec.voltage_v);
        let next = self.soc_pct + amp_hours / self.spec.capacity_ah * 100.0;
        if !next.is_nan() {
            self.soc_pct = next.clamp(MIN_SOC_PCT, MAX_SOC_PCT);
        }
        self.soc_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_initial_soc() {
        let b = Battery::new(BatterySpec::default());
        assert_eq!(b.soc_pct, 80.0);
    }

    #[test]
    fn capacity_in_kwh() {
        assert_eq!(BatterySpec::default().capacity_kwh(), 19.2);
    }

    #[test]
    fn net_power_moves_soc() {
        let mut b = Battery::new(BatterySpec::default());
        // 1920 W for an hour = 40 Ah = 10 % of 400 Ah
        let soc = b.apply_net_power(1920.0);
        assert!((soc - 90.0).abs() < 1e-9);
        let soc = b.apply_net_power(-3840.0);
        assert!((soc - 70.0).abs() < 1e-9);
    }

    #[test]
    fn soc_clamped_for_extreme_power() {
        let mut b = Battery::new(BatterySpec::default());
        assert_eq!(b.apply_net_power(1.0e12), MAX_SOC_PCT);
        assert_eq!(b.apply_net_power(f64::INFINITY), MAX_SOC_PCT);
        assert_eq!(b.apply_net_power(-1.0e12), MIN_SOC_PCT);
        assert_eq!(b.apply_net_power(f64::NEG_INFINITY), MIN_SOC_PCT);
    }

    #[test]
    fn nan_step_keeps_previous_soc() {
        let mut b = Battery::new(BatterySpec::default());
        assert_eq!(b.apply_net_power(f64::NAN), 80.0);
    }
}
