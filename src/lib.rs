//! Educational off-grid PV system sizing engine.
//!
//! Computes array electrical output, site irradiance performance, charge
//! controller and inverter sizing verdicts, a whole-system compatibility
//! checklist, and a 24-hour generation/load/battery simulation.

#[cfg(feature = "api")]
pub mod api;
pub mod array;
pub mod catalog;
pub mod config;
pub mod devices;
pub mod error;
pub mod evaluate;
pub mod io;
/// Daily simulation engine, summary, and insights.
pub mod sim;
pub mod site;
pub mod system;
