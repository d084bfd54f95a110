//! Assembled system state and its compatibility checklist.

pub mod compat;
pub mod state;

pub use compat::{CheckKind, CheckStatus, CompatibilityCheck, EnergyBalance, compatibility};
pub use state::{DerivedMetrics, Event, Loads, Output, SystemSetup, SystemState};
