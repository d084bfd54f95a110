//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use pv_offgrid_sim::catalog::Catalog;
use pv_offgrid_sim::config::ScenarioConfig;
use pv_offgrid_sim::system::{SystemSetup, SystemState};

/// Seeded random source (seed 42).
pub fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Built-in catalog.
pub fn catalog() -> Catalog {
    Catalog::builtin()
}

/// Phoenix 2S x 3P SPR-350 system with nothing selected.
pub fn bare_system(catalog: &Catalog) -> SystemState {
    SystemState::new(catalog, SystemSetup::default()).unwrap()
}

/// System built from a named preset.
pub fn preset_system(name: &str, catalog: &Catalog) -> SystemState {
    let cfg = ScenarioConfig::from_preset(name).unwrap();
    SystemState::new(catalog, cfg.to_setup(catalog)).unwrap()
}
