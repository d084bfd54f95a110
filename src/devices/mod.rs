//! Hourly device models driven by the daily simulation.

/// Seasonal household load profile.
pub mod baseload;
/// Battery bank state-of-charge model.
pub mod battery;
/// PV generation over the day.
pub mod solar;

pub use baseload::SeasonalLoad;
pub use battery::{Battery, BatterySpec};
pub use solar::SolarPv;
