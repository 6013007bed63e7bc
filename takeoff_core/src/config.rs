//! # Configuration
//!
//! Estimator defaults and rate overrides, stored as TOML:
//!
//! ```toml
//! [defaults]
//! project_name = "Smith Residence"
//! estimator_name = "R. Lee"
//! concrete_zone = "Zone 3"
//! rebar_size = "#5"
//! markup_pct = 30.0
//!
//! [rates.concrete]
//! zone_1 = 190.0
//! zone_2 = 200.0
//! zone_3 = 210.0
//! zone_4 = 220.0
//! ```
//!
//! Lookup order: an explicit path, then `<config dir>/takeoff/config.toml`,
//! then built-in defaults. Every section is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::calculations::input::DEFAULT_MARKUP_PCT;
use crate::calculations::{ComponentSpec, ComponentType, PricingSelection, RebarOptions};
use crate::errors::{CalcError, CalcResult};
use crate::rates::{ConcreteZone, RateTable, RebarSize, VaporBarrierType, XpsRValue};

/// Application directory name under the platform config dir
pub const APP_DIR: &str = "takeoff";

/// Config file name
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TakeoffConfig {
    #[serde(default)]
    pub defaults: EstimateDefaults,

    /// Rate table; sections left out use the built-in prices
    #[serde(default)]
    pub rates: RateTable,
}

/// Starting values for new line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateDefaults {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub estimator_name: String,
    #[serde(default)]
    pub concrete_zone: ConcreteZone,
    #[serde(default)]
    pub rebar_size: RebarSize,
    #[serde(default = "default_markup_pct")]
    pub markup_pct: f64,
    #[serde(default = "default_true")]
    pub include_overage: bool,
    #[serde(default)]
    pub vapor_type: VaporBarrierType,
    #[serde(default)]
    pub xps_r_value: XpsRValue,
    /// Finish rate step; `None` takes the lowest step of the active table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_rate_sf: Option<f64>,
}

fn default_markup_pct() -> f64 {
    DEFAULT_MARKUP_PCT
}

fn default_true() -> bool {
    true
}

impl Default for EstimateDefaults {
    fn default() -> Self {
        EstimateDefaults {
            project_name: String::new(),
            estimator_name: String::new(),
            concrete_zone: ConcreteZone::default(),
            rebar_size: RebarSize::default(),
            markup_pct: DEFAULT_MARKUP_PCT,
            include_overage: true,
            vapor_type: VaporBarrierType::default(),
            xps_r_value: XpsRValue::default(),
            finish_rate_sf: None,
        }
    }
}

impl EstimateDefaults {
    /// Pricing selections seeded from these defaults
    pub fn pricing(&self, rates: &RateTable) -> PricingSelection {
        PricingSelection {
            concrete_zone: self.concrete_zone,
            markup_pct: self.markup_pct,
            finish_rate_sf: self.finish_rate_sf.unwrap_or_else(|| rates.default_finish_rate()),
            vapor_type: self.vapor_type,
            xps_r_value: self.xps_r_value,
        }
    }

    /// A blank spec for `component` carrying these defaults
    pub fn spec(&self, component: ComponentType, rates: &RateTable) -> ComponentSpec {
        ComponentSpec::new(component)
            .with_overage(self.include_overage)
            .with_rebar(RebarOptions {
                size: self.rebar_size,
                ..RebarOptions::default()
            })
            .with_pricing(self.pricing(rates))
    }
}

/// Overlay `patch` onto `base`, recursing into objects
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl TakeoffConfig {
    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Parse and validate a config from TOML
    pub fn from_toml_str(toml_str: &str) -> CalcResult<Self> {
        let config: TakeoffConfig = toml::from_str(toml_str)
            .map_err(|e| CalcError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> CalcResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read config", path.display().to_string(), e.to_string()))?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolve configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is tried; a missing file there means built-in defaults,
    /// and an unreadable one is logged and skipped.
    pub fn resolve(explicit: Option<&Path>) -> CalcResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => Ok(config),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable config, using defaults");
                    Ok(Self::default())
                }
            },
            _ => Ok(Self::default()),
        }
    }

    /// Check rate prices and default selections
    pub fn validate(&self) -> CalcResult<()> {
        self.rates.validate()?;

        let markup = self.defaults.markup_pct;
        if !markup.is_finite() || markup < 0.0 {
            return Err(CalcError::invalid_input(
                "defaults.markup_pct",
                markup.to_string(),
                "Markup cannot be negative",
            ));
        }
        if let Some(finish) = self.defaults.finish_rate_sf {
            self.rates.finish_rate(finish).map_err(|_| {
                CalcError::config(format!(
                    "defaults.finish_rate_sf {:.2} is not one of the finish rates",
                    finish
                ))
            })?;
        }
        Ok(())
    }

    /// Default spec for `component` under this config
    pub fn spec(&self, component: ComponentType) -> ComponentSpec {
        self.defaults.spec(component, &self.rates)
    }

    /// Build a spec from a JSON object, taking every field it leaves out
    /// from the configured defaults rather than the built-in ones.
    pub fn spec_from_json(&self, input: Value) -> CalcResult<ComponentSpec> {
        let component = input
            .get("component")
            .cloned()
            .ok_or_else(|| CalcError::missing_field("component"))?;
        let component: ComponentType = serde_json::from_value(component)?;

        let mut seeded = serde_json::to_value(self.spec(component))?;
        merge_json(&mut seeded, input);
        Ok(serde_json::from_value(seeded)?)
    }

    /// Render this config as TOML (for writing a starter file)
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_empty_config_is_default() {
        let config = TakeoffConfig::from_toml_str("").unwrap();
        assert_eq!(config.defaults.markup_pct, DEFAULT_MARKUP_PCT);
        assert!(config.defaults.include_overage);
        assert_eq!(&config.rates, RateTable::builtin());
    }

    #[test]
    fn test_defaults_and_rate_override() {
        let config = TakeoffConfig::from_toml_str(
            r##"
            [defaults]
            estimator_name = "R. Lee"
            concrete_zone = "Zone 4"
            rebar_size = "#5"
            markup_pct = 30.0
            include_overage = false

            [rates.xps]
            r_5 = 1.5
            r_10 = 3.0
            "##,
        )
        .unwrap();

        assert_eq!(config.defaults.estimator_name, "R. Lee");
        assert_eq!(config.defaults.concrete_zone, ConcreteZone::Zone4);
        assert_eq!(config.rates.xps_rate(XpsRValue::R10), 3.0);
        assert_eq!(config.rates.concrete, RateTable::builtin().concrete);

        let spec = config.spec(ComponentType::FoundationWall);
        assert!(!spec.include_overage);
        assert_eq!(spec.rebar.size, RebarSize::No5);
        assert_eq!(spec.pricing.markup_pct, 30.0);
    }

    #[test]
    fn test_finish_default_must_be_a_table_step() {
        let result = TakeoffConfig::from_toml_str(
            r#"
            [defaults]
            finish_rate_sf = 7.0
            "#,
        );
        assert!(matches!(result, Err(CalcError::ConfigError { .. })));
    }

    #[test]
    fn test_finish_table_alone_sets_finish_default() {
        let config = TakeoffConfig::from_toml_str("[rates.finish]\nrates = [9.0, 9.5]\n").unwrap();
        assert_eq!(config.defaults.finish_rate_sf, None);

        let spec = config.spec(ComponentType::FlatworkFinish);
        assert_eq!(spec.pricing.finish_rate_sf, 9.0);
        let seeded = config
            .spec_from_json(serde_json::json!({ "component": "Flatwork Finish", "length_ft": 10, "height_ft": 10 }))
            .unwrap();
        let record = crate::calculations::calculate(&crate::calculations::JobInfo::default(), &seeded, &config.rates).unwrap();
        assert!((record.finish_cost - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_spec_takes_configured_defaults() {
        let config = TakeoffConfig::from_toml_str(
            r##"
            [defaults]
            concrete_zone = "Zone 4"
            rebar_size = "#5"
            markup_pct = 40.0
            "##,
        )
        .unwrap();

        let spec = config
            .spec_from_json(serde_json::json!({
                "component": "Foundation Wall",
                "length_ft": 10,
                "height_ft": 8,
                "thickness_in": 8
            }))
            .unwrap();
        assert_eq!(spec.pricing.markup_pct, 40.0);
        assert_eq!(spec.pricing.concrete_zone, ConcreteZone::Zone4);
        assert_eq!(spec.rebar.size, RebarSize::No5);
        assert_eq!(spec.length_ft, 10.0);

        // Fields present in the JSON win, including nested ones
        let spec = config
            .spec_from_json(serde_json::json!({
                "component": "Foundation Wall",
                "pricing": { "markup_pct": 10.0 },
                "rebar": { "spacing_in": 16.0 }
            }))
            .unwrap();
        assert_eq!(spec.pricing.markup_pct, 10.0);
        assert_eq!(spec.pricing.concrete_zone, ConcreteZone::Zone4);
        assert_eq!(spec.rebar.spacing_in, Some(16.0));
        assert_eq!(spec.rebar.size, RebarSize::No5);
    }

    #[test]
    fn test_json_spec_needs_component() {
        let config = TakeoffConfig::default();
        let err = config.spec_from_json(serde_json::json!({ "length_ft": 10 })).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_malformed_config_rejected() {
        let result = TakeoffConfig::from_toml_str("[defaults\nmarkup_pct = ");
        assert_eq!(result.unwrap_err().error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let path = temp_dir().join("takeoff_missing_config.toml");
        let result = TakeoffConfig::resolve(Some(&path));
        assert_eq!(result.unwrap_err().error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TakeoffConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = TakeoffConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.rates, config.rates);
        assert_eq!(parsed.defaults.markup_pct, config.defaults.markup_pct);
    }
}
