//! Static equipment and site reference data.
//!
//! The built-in catalog mirrors the classroom equipment list. A custom
//! catalog can be loaded from TOML; any table left out falls back to the
//! built-in entries.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Charge controller specifications.
pub mod controllers;
/// Inverter specifications.
pub mod inverters;
pub mod loads;
/// PV module specifications.
pub mod modules;
/// Reference sites.
pub mod sites;

pub use controllers::ControllerSpec;
pub use inverters::InverterSpec;
pub use loads::DcLoad;
pub use modules::ModuleSpec;
pub use sites::SiteRecord;

/// Equipment size class, used for grouping in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Small,
    Medium,
    Large,
    Commercial,
    Utility,
}

/// All reference data the core reads from.
///
/// Lookups return `Option` rather than assuming a key exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default = "modules::builtin_modules")]
    modules: Vec<ModuleSpec>,
    #[serde(default = "controllers::builtin_controllers")]
    controllers: Vec<ControllerSpec>,
    #[serde(default = "inverters::builtin_inverters")]
    inverters: Vec<InverterSpec>,
    #[serde(default = "sites::builtin_sites")]
    sites: Vec<SiteRecord>,
    #[serde(default = "loads::builtin_dc_loads")]
    dc_loads: Vec<DcLoad>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Returns the built-in catalog.
    pub fn builtin() -> Self {
        Self {
            modules: modules::builtin_modules(),
            controllers: controllers::builtin_controllers(),
            inverters: inverters::builtin_inverters(),
            sites: sites::builtin_sites(),
            dc_loads: loads::builtin_dc_loads(),
        }
    }

    /// Parses and validates a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the file cannot be read, does not parse,
    /// or fails [`Catalog::validate`].
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a catalog from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on invalid TOML or invalid entries.
    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks structural constraints the evaluators rely on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.modules.is_empty() {
            return Err(invalid("modules", "at least one module is required"));
        }

        let mut ids = HashSet::new();
        for c in &self.controllers {
            if !ids.insert(c.id) {
                return Err(invalid(format!("controllers.{}", c.id), "duplicate id"));
            }
            if c.mppt_min > c.mppt_max {
                return Err(invalid(
                    format!("controllers.{}", c.id),
                    "mpptMin must be <= mpptMax",
                ));
            }
        }

        ids.clear();
        for inv in &self.inverters {
            if !ids.insert(inv.id) {
                return Err(invalid(format!("inverters.{}", inv.id), "duplicate id"));
            }
            if !(inv.efficiency > 0.0 && inv.efficiency <= 1.0) {
                return Err(invalid(
                    format!("inverters.{}", inv.id),
                    "efficiency must be in (0, 1]",
                ));
            }
        }

        let mut keys = HashSet::new();
        for s in &self.sites {
            if !keys.insert(s.key.as_str()) {
                return Err(invalid(format!("sites.{}", s.key), "duplicate key"));
            }
            if s.ghi <= 0.0 {
                return Err(invalid(format!("sites.{}", s.key), "ghi must be > 0"));
            }
        }

        Ok(())
    }

    pub fn module(&self, index: usize) -> Option<&ModuleSpec> {
        self.modules.get(index)
    }

    pub fn controller(&self, id: u32) -> Option<&ControllerSpec> {
        self.controllers.iter().find(|c| c.id == id)
    }

    pub fn inverter(&self, id: u32) -> Option<&InverterSpec> {
        self.inverters.iter().find(|i| i.id == id)
    }

    pub fn site(&self, key: &str) -> Option<&SiteRecord> {
        self.sites.iter().find(|s| s.key == key)
    }

    pub fn modules(&self) -> &[ModuleSpec] {
        &self.modules
    }

    pub fn controllers(&self) -> &[ControllerSpec] {
        &self.controllers
    }

    pub fn inverters(&self) -> &[InverterSpec] {
        &self.inverters
    }

    pub fn sites(&self) -> &[SiteRecord] {
        &self.sites
    }

    pub fn dc_loads(&self) -> &[DcLoad] {
        &self.dc_loads
    }

    /// Controllers of one size class, in id order.
    pub fn controllers_in(&self, category: Category) -> impl Iterator<Item = &ControllerSpec> {
        self.controllers
            .iter()
            .filter(move |c| c.category == category)
    }

    /// Combined rated draw of the DC load table (W).
    pub fn dc_load_total_w(&self) -> f64 {
        self.dc_loads.iter().map(|l| l.power).sum()
    }

    /// Combined daily energy of the DC load table (Wh).
    pub fn dc_daily_energy_wh(&self) -> f64 {
        self.dc_loads.iter().map(DcLoad::daily_energy_wh).sum()
    }
}

fn invalid(entry: impl Into<String>, message: &str) -> CatalogError {
    CatalogError::Invalid {
        entry: entry.into(),
        message: message.to_string(),
    }
}
