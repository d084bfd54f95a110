//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::array::{ArrayTopology, STC_CELL_TEMP_C};
use crate::catalog::Catalog;
use crate::catalog::loads::{DEFAULT_AC_LOAD_W, DEFAULT_LARGEST_MOTOR_W};
use crate::devices::BatterySpec;
use crate::error::{CatalogError, ConfigError};
use crate::sim::{Season, Weather};
use crate::system::{Loads, SystemSetup};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Optional catalog TOML replacing the built-in equipment tables.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub array: ArrayConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub equipment: EquipmentConfig,
    #[serde(default)]
    pub loads: LoadsConfig,
    #[serde(default)]
    pub battery: BatteryConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Module choice and string layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Index into the module catalog.
    pub module_index: usize,
    /// Modules per string (must be >= 1).
    pub series: i64,
    /// Parallel strings (must be >= 1).
    pub parallel: i64,
    /// Operating cell temperature (°C).
    pub cell_temperature_c: f64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            module_index: 0,
            series: 2,
            parallel: 3,
            cell_temperature_c: STC_CELL_TEMP_C,
        }
    }
}

/// Site and array geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site catalog key.
    pub location: String,
    /// Tilt (°); the site's optimum when omitted.
    pub tilt_deg: Option<f64>,
    /// Azimuth (°, 0 = north); the site's optimum when omitted.
    pub azimuth_deg: Option<f64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            location: "phoenix".to_string(),
            tilt_deg: None,
            azimuth_deg: None,
        }
    }
}

/// Selected controller and inverter ids.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EquipmentConfig {
    pub controller_id: Option<u32>,
    pub inverter_id: Option<u32>,
}

/// Household loads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadsConfig {
    /// Combined DC load (W); the catalog load table's total when omitted.
    pub dc_load_w: Option<f64>,
    /// Combined AC load (W).
    pub ac_load_w: f64,
    /// Running draw of the largest motor (W).
    pub largest_motor_w: f64,
}

impl Default for LoadsConfig {
    fn default() -> Self {
        Self {
            dc_load_w: None,
            ac_load_w: DEFAULT_AC_LOAD_W,
            largest_motor_w: DEFAULT_LARGEST_MOTOR_W,
        }
    }
}

/// Battery bank ratings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Bank voltage (V).
    pub voltage_v: u32,
    /// Capacity (Ah).
    pub capacity_ah: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        let spec = BatterySpec::default();
        Self {
            voltage_v: spec.voltage_v,
            capacity_ah: spec.capacity_ah,
        }
    }
}

/// Conditions for the simulated day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub weather: Weather,
    pub season: Season,
    /// Seed for the partly-cloudy jitter.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            weather: Weather::Clear,
            season: Season::Summer,
            seed: 42,
        }
    }
}

impl ScenarioConfig {
    /// Phoenix, 2S x 3P SPR-350, SmartSolar 150/60, GS4048A, clear summer.
    pub fn baseline() -> Self {
        Self {
            catalog: None,
            array: ArrayConfig::default(),
            site: SiteConfig::default(),
            equipment: EquipmentConfig {
                controller_id: Some(4),
                inverter_id: Some(5),
            },
            loads: LoadsConfig::default(),
            battery: BatteryConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }

    /// Seattle in an overcast winter with a wider array.
    pub fn cold_climate() -> Self {
        Self {
            array: ArrayConfig {
                series: 3,
                parallel: 4,
                cell_temperature_c: 10.0,
                ..ArrayConfig::default()
            },
            site: SiteConfig {
                location: "seattle".to_string(),
                ..SiteConfig::default()
            },
            equipment: EquipmentConfig {
                controller_id: Some(7),
                inverter_id: Some(6),
            },
            battery: BatteryConfig {
                capacity_ah: 600.0,
                ..BatteryConfig::default()
            },
            simulation: SimulationConfig {
                weather: Weather::Overcast,
                season: Season::Winter,
                ..SimulationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Sydney, north-facing, partly cloudy spring.
    pub fn southern() -> Self {
        Self {
            array: ArrayConfig {
                series: 3,
                parallel: 2,
                cell_temperature_c: 45.0,
                ..ArrayConfig::default()
            },
            site: SiteConfig {
                location: "sydney".to_string(),
                tilt_deg: Some(30.0),
                azimuth_deg: Some(0.0),
            },
            equipment: EquipmentConfig {
                controller_id: Some(5),
                inverter_id: Some(7),
            },
            simulation: SimulationConfig {
                weather: Weather::PartlyCloudy,
                season: Season::Spring,
                seed: 7,
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "cold_climate", "southern"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "cold_climate" => Ok(Self::cold_climate()),
            "southern" => Ok(Self::southern()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(
                "scenario",
                format!("cannot read \"{}\": {e}", path.display()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Loads the catalog the scenario refers to, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if a custom catalog cannot be loaded.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::from_toml_file(path),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Validates all fields against `catalog` and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self, catalog: &Catalog) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let a = &self.array;
        if a.series < 1 {
            errors.push(ConfigError::new("array.series", "must be >= 1"));
        }
        if a.parallel < 1 {
            errors.push(ConfigError::new("array.parallel", "must be >= 1"));
        }
        if catalog.module(a.module_index).is_none() {
            errors.push(ConfigError::new(
                "array.module_index",
                format!("must be < {}", catalog.modules().len()),
            ));
        }
        if !a.cell_temperature_c.is_finite() {
            errors.push(ConfigError::new("array.cell_temperature_c", "must be finite"));
        }

        let s = &self.site;
        if catalog.site(&s.location).is_none() {
            errors.push(ConfigError::new(
                "site.location",
                format!("unknown site \"{}\"", s.location),
            ));
        }
        if let Some(tilt) = s.tilt_deg
            && !(0.0..=90.0).contains(&tilt)
        {
            errors.push(ConfigError::new("site.tilt_deg", "must be in [0, 90]"));
        }
        if let Some(azimuth) = s.azimuth_deg
            && !(0.0..360.0).contains(&azimuth)
        {
            errors.push(ConfigError::new("site.azimuth_deg", "must be in [0, 360)"));
        }

        let e = &self.equipment;
        if let Some(id) = e.controller_id
            && catalog.controller(id).is_none()
        {
            errors.push(ConfigError::new(
                "equipment.controller_id",
                format!("unknown charge controller id {id}"),
            ));
        }
        if let Some(id) = e.inverter_id
            && catalog.inverter(id).is_none()
        {
            errors.push(ConfigError::new(
                "equipment.inverter_id",
                format!("unknown inverter id {id}"),
            ));
        }

        let l = &self.loads;
        for (field, value) in [
            ("loads.dc_load_w", l.dc_load_w.unwrap_or(0.0)),
            ("loads.ac_load_w", l.ac_load_w),
            ("loads.largest_motor_w", l.largest_motor_w),
        ] {
            if value.is_nan() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        let b = &self.battery;
        if b.voltage_v == 0 {
            errors.push(ConfigError::new("battery.voltage_v", "must be > 0"));
        }
        if b.capacity_ah.is_nan() || b.capacity_ah <= 0.0 {
            errors.push(ConfigError::new("battery.capacity_ah", "must be > 0"));
        }

        errors
    }

    /// Converts the scenario into the inputs of a [`crate::system::SystemState`].
    pub fn to_setup(&self, catalog: &Catalog) -> SystemSetup {
        SystemSetup {
            module_index: self.array.module_index,
            topology: ArrayTopology::from_inputs(
                self.array.series,
                self.array.parallel,
                self.array.cell_temperature_c,
            ),
            site_key: self.site.location.clone(),
            tilt_deg: self.site.tilt_deg,
            azimuth_deg: self.site.azimuth_deg,
            controller_id: self.equipment.controller_id,
            inverter_id: self.equipment.inverter_id,
            loads: Loads {
                dc_load_w: self
                    .loads
                    .dc_load_w
                    .unwrap_or_else(|| catalog.dc_load_total_w()),
                ac_load_w: self.loads.ac_load_w,
                largest_motor_w: self.loads.largest_motor_w,
            },
            battery: BatterySpec {
                voltage_v: self.battery.voltage_v,
                capacity_ah: self.battery.capacity_ah,
            },
            weather: self.simulation.weather,
            season: self.simulation.season,
        }
    }
}
