//! # Rate Tables
//!
//! Material pricing lookups used by the estimator. The built-in table is
//! embedded from `data/rates.toml` and parsed once on first use; a config
//! file may replace any section (see [`crate::config`]).
//!
//! ## Pricing Selections
//!
//! | Selection            | Key                              | Unit  |
//! |----------------------|----------------------------------|-------|
//! | [`ConcreteZone`]     | Zone 1 .. Zone 4                 | $/CY  |
//! | [`RebarSize`]        | #3, #4, #5                       | $/LF  |
//! | finish rate          | 8.25 .. 10.00 in 0.25 steps      | $/SF  |
//! | [`VaporBarrierType`] | 10 mil, 15 mil, 6 mil, 4 mil     | $/SF  |
//! | [`XpsRValue`]        | R-5, R-10                        | $/SF  |
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::rates::{ConcreteZone, RateTable, RebarSize};
//!
//! let rates = RateTable::builtin();
//! assert_eq!(rates.concrete_rate(ConcreteZone::Zone2), 195.0);
//! assert_eq!(rates.rebar_rate(RebarSize::No4), 0.55);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Raw TOML for the built-in rate table
pub const BUILTIN_RATES_TOML: &str = include_str!("../data/rates.toml");

/// Finish rates closer than this are treated as the same table step
const FINISH_RATE_TOLERANCE: f64 = 1e-6;

static BUILTIN_RATES: Lazy<RateTable> = Lazy::new(|| {
    RateTable::from_toml_str(BUILTIN_RATES_TOML).expect("embedded data/rates.toml must parse")
});

// ============================================================================
// Selections
// ============================================================================

/// Ready-mix delivery zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConcreteZone {
    #[serde(rename = "Zone 1")]
    Zone1,
    #[default]
    #[serde(rename = "Zone 2")]
    Zone2,
    #[serde(rename = "Zone 3")]
    Zone3,
    #[serde(rename = "Zone 4")]
    Zone4,
}

impl ConcreteZone {
    /// All zones for selection lists
    pub const ALL: [ConcreteZone; 4] = [
        ConcreteZone::Zone1,
        ConcreteZone::Zone2,
        ConcreteZone::Zone3,
        ConcreteZone::Zone4,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteZone::Zone1 => "Zone 1",
            ConcreteZone::Zone2 => "Zone 2",
            ConcreteZone::Zone3 => "Zone 3",
            ConcreteZone::Zone4 => "Zone 4",
        }
    }

    /// Parse "Zone 3", "zone3", "z3" or just "3"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.to_lowercase().replace([' ', '_', '-'], "");
        let digit = normalized
            .trim_start_matches("zone")
            .trim_start_matches('z');
        match digit {
            "1" => Ok(ConcreteZone::Zone1),
            "2" => Ok(ConcreteZone::Zone2),
            "3" => Ok(ConcreteZone::Zone3),
            "4" => Ok(ConcreteZone::Zone4),
            _ => Err(CalcError::rate_not_found("concrete", s)),
        }
    }
}

impl std::fmt::Display for ConcreteZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Rebar bar size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RebarSize {
    #[serde(rename = "#3")]
    No3,
    #[default]
    #[serde(rename = "#4")]
    No4,
    #[serde(rename = "#5")]
    No5,
}

impl RebarSize {
    /// All bar sizes for selection lists
    pub const ALL: [RebarSize; 3] = [RebarSize::No3, RebarSize::No4, RebarSize::No5];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RebarSize::No3 => "#3",
            RebarSize::No4 => "#4",
            RebarSize::No5 => "#5",
        }
    }

    /// Parse "#4", "no4", "No. 4" or "4"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.to_lowercase().replace([' ', '.', '#'], "");
        match normalized.trim_start_matches("no") {
            "3" => Ok(RebarSize::No3),
            "4" => Ok(RebarSize::No4),
            "5" => Ok(RebarSize::No5),
            _ => Err(CalcError::rate_not_found("rebar", s)),
        }
    }
}

impl std::fmt::Display for RebarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Polyethylene vapor barrier sheet thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VaporBarrierType {
    #[default]
    #[serde(rename = "10 mil")]
    Mil10,
    #[serde(rename = "15 mil")]
    Mil15,
    #[serde(rename = "6 mil")]
    Mil6,
    #[serde(rename = "4 mil")]
    Mil4,
}

impl VaporBarrierType {
    /// All barrier types for selection lists
    pub const ALL: [VaporBarrierType; 4] = [
        VaporBarrierType::Mil10,
        VaporBarrierType::Mil15,
        VaporBarrierType::Mil6,
        VaporBarrierType::Mil4,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            VaporBarrierType::Mil10 => "10 mil",
            VaporBarrierType::Mil15 => "15 mil",
            VaporBarrierType::Mil6 => "6 mil",
            VaporBarrierType::Mil4 => "4 mil",
        }
    }

    /// Parse "10 mil", "10mil" or "10"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.to_lowercase().replace([' ', '-', '_'], "");
        match normalized.trim_end_matches("mil") {
            "10" => Ok(VaporBarrierType::Mil10),
            "15" => Ok(VaporBarrierType::Mil15),
            "6" => Ok(VaporBarrierType::Mil6),
            "4" => Ok(VaporBarrierType::Mil4),
            _ => Err(CalcError::rate_not_found("vapor_barrier", s)),
        }
    }
}

impl std::fmt::Display for VaporBarrierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// XPS board R-value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum XpsRValue {
    #[default]
    #[serde(rename = "R-5")]
    R5,
    #[serde(rename = "R-10")]
    R10,
}

impl XpsRValue {
    /// All R-values for selection lists
    pub const ALL: [XpsRValue; 2] = [XpsRValue::R5, XpsRValue::R10];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            XpsRValue::R5 => "R-5",
            XpsRValue::R10 => "R-10",
        }
    }

    /// Parse "R-10", "r10" or "10"
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.to_lowercase().replace([' ', '-', '_'], "");
        match normalized.trim_start_matches('r') {
            "5" => Ok(XpsRValue::R5),
            "10" => Ok(XpsRValue::R10),
            _ => Err(CalcError::rate_not_found("xps", s)),
        }
    }
}

impl std::fmt::Display for XpsRValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Rate Table
// ============================================================================

/// Concrete $/CY by zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteRates {
    pub zone_1: f64,
    pub zone_2: f64,
    pub zone_3: f64,
    pub zone_4: f64,
}

/// Rebar $/LF by bar size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarRates {
    pub no_3: f64,
    pub no_4: f64,
    pub no_5: f64,
}

/// Selectable flatwork finish rates ($/SF)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishRates {
    pub rates: Vec<f64>,
}

/// Vapor barrier $/SF by type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaporBarrierRates {
    pub mil_10: f64,
    pub mil_15: f64,
    pub mil_6: f64,
    pub mil_4: f64,
}

/// XPS $/SF by R-value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpsRates {
    pub r_5: f64,
    pub r_10: f64,
}

/// French drain material rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrainRates {
    /// Drain rock, $/CY
    pub rock_per_cy: f64,
    /// Filter fabric, $/LF
    pub fabric_per_lf: f64,
    /// Perforated pipe, $/LF
    pub pipe_per_lf: f64,
}

/// Complete pricing table.
///
/// Each section defaults to the built-in values, so a partial TOML document
/// (for example, only `[concrete]`) replaces just that section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default = "builtin_concrete")]
    pub concrete: ConcreteRates,
    #[serde(default = "builtin_rebar")]
    pub rebar: RebarRates,
    #[serde(default = "builtin_finish")]
    pub finish: FinishRates,
    #[serde(default = "builtin_vapor_barrier")]
    pub vapor_barrier: VaporBarrierRates,
    #[serde(default = "builtin_xps")]
    pub xps: XpsRates,
    #[serde(default = "builtin_drain")]
    pub drain: DrainRates,
}

fn builtin_concrete() -> ConcreteRates {
    BUILTIN_RATES.concrete.clone()
}

fn builtin_rebar() -> RebarRates {
    BUILTIN_RATES.rebar.clone()
}

fn builtin_finish() -> FinishRates {
    BUILTIN_RATES.finish.clone()
}

fn builtin_vapor_barrier() -> VaporBarrierRates {
    BUILTIN_RATES.vapor_barrier.clone()
}

fn builtin_xps() -> XpsRates {
    BUILTIN_RATES.xps.clone()
}

fn builtin_drain() -> DrainRates {
    BUILTIN_RATES.drain.clone()
}

impl Default for RateTable {
    fn default() -> Self {
        BUILTIN_RATES.clone()
    }
}

impl RateTable {
    /// The built-in table embedded from `data/rates.toml`
    pub fn builtin() -> &'static RateTable {
        &BUILTIN_RATES
    }

    /// Parse and validate a rate table from TOML.
    ///
    /// Sections missing from `toml_str` fall back to the built-in values.
    pub fn from_toml_str(toml_str: &str) -> CalcResult<Self> {
        let table: RateTable = toml::from_str(toml_str)
            .map_err(|e| CalcError::serialization(format!("Invalid rate table: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    /// Check that every price is finite and non-negative and that at least
    /// one finish rate is selectable.
    pub fn validate(&self) -> CalcResult<()> {
        let prices = [
            ("concrete.zone_1", self.concrete.zone_1),
            ("concrete.zone_2", self.concrete.zone_2),
            ("concrete.zone_3", self.concrete.zone_3),
            ("concrete.zone_4", self.concrete.zone_4),
            ("rebar.no_3", self.rebar.no_3),
            ("rebar.no_4", self.rebar.no_4),
            ("rebar.no_5", self.rebar.no_5),
            ("vapor_barrier.mil_10", self.vapor_barrier.mil_10),
            ("vapor_barrier.mil_15", self.vapor_barrier.mil_15),
            ("vapor_barrier.mil_6", self.vapor_barrier.mil_6),
            ("vapor_barrier.mil_4", self.vapor_barrier.mil_4),
            ("xps.r_5", self.xps.r_5),
            ("xps.r_10", self.xps.r_10),
            ("drain.rock_per_cy", self.drain.rock_per_cy),
            ("drain.fabric_per_lf", self.drain.fabric_per_lf),
            ("drain.pipe_per_lf", self.drain.pipe_per_lf),
        ];
        for (field, price) in prices {
            check_price(field, price)?;
        }

        if self.finish.rates.is_empty() {
            return Err(CalcError::invalid_input(
                "finish.rates",
                "[]",
                "At least one finish rate is required",
            ));
        }
        for rate in &self.finish.rates {
            check_price("finish.rates", *rate)?;
        }
        Ok(())
    }

    /// Concrete price per cubic yard for a zone
    pub fn concrete_rate(&self, zone: ConcreteZone) -> f64 {
        match zone {
            ConcreteZone::Zone1 => self.concrete.zone_1,
            ConcreteZone::Zone2 => self.concrete.zone_2,
            ConcreteZone::Zone3 => self.concrete.zone_3,
            ConcreteZone::Zone4 => self.concrete.zone_4,
        }
    }

    /// Rebar price per linear foot for a bar size
    pub fn rebar_rate(&self, size: RebarSize) -> f64 {
        match size {
            RebarSize::No3 => self.rebar.no_3,
            RebarSize::No4 => self.rebar.no_4,
            RebarSize::No5 => self.rebar.no_5,
        }
    }

    /// Vapor barrier price per square foot
    pub fn vapor_rate(&self, kind: VaporBarrierType) -> f64 {
        match kind {
            VaporBarrierType::Mil10 => self.vapor_barrier.mil_10,
            VaporBarrierType::Mil15 => self.vapor_barrier.mil_15,
            VaporBarrierType::Mil6 => self.vapor_barrier.mil_6,
            VaporBarrierType::Mil4 => self.vapor_barrier.mil_4,
        }
    }

    /// XPS price per square foot
    pub fn xps_rate(&self, r_value: XpsRValue) -> f64 {
        match r_value {
            XpsRValue::R5 => self.xps.r_5,
            XpsRValue::R10 => self.xps.r_10,
        }
    }

    /// Resolve a finish rate against the selectable steps.
    ///
    /// Returns the table value so downstream math never sees a rate that
    /// differs from the table by float noise.
    pub fn finish_rate(&self, requested: f64) -> CalcResult<f64> {
        self.finish
            .rates
            .iter()
            .copied()
            .find(|rate| (rate - requested).abs() < FINISH_RATE_TOLERANCE)
            .ok_or_else(|| CalcError::rate_not_found("finish", format!("{:.2}", requested)))
    }

    /// Lowest selectable finish rate
    pub fn default_finish_rate(&self) -> f64 {
        self.finish
            .rates
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }
}

fn check_price(field: &str, price: f64) -> CalcResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            price.to_string(),
            "Price must be a finite, non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_values() {
        let rates = RateTable::builtin();
        let zones: Vec<f64> = ConcreteZone::ALL.iter().map(|z| rates.concrete_rate(*z)).collect();
        assert_eq!(zones, vec![185.0, 195.0, 205.0, 215.0]);

        assert_eq!(rates.rebar_rate(RebarSize::No3), 0.45);
        assert_eq!(rates.rebar_rate(RebarSize::No5), 0.60);

        let vapor: Vec<f64> = VaporBarrierType::ALL.iter().map(|v| rates.vapor_rate(*v)).collect();
        assert_eq!(vapor, vec![0.18, 0.25, 0.12, 0.09]);

        assert_eq!(rates.xps_rate(XpsRValue::R5), 0.71);
        assert_eq!(rates.xps_rate(XpsRValue::R10), 1.41);
    }

    #[test]
    fn test_finish_steps() {
        let rates = RateTable::builtin();
        assert_eq!(rates.finish.rates.len(), 8);
        assert_eq!(rates.default_finish_rate(), 8.25);
        assert_eq!(rates.finish_rate(9.5).unwrap(), 9.5);
        assert_eq!(rates.finish_rate(10.0).unwrap(), 10.0);

        let err = rates.finish_rate(9.1).unwrap_err();
        assert_eq!(err.error_code(), "RATE_NOT_FOUND");
    }

    #[test]
    fn test_partial_override_keeps_other_sections() {
        let rates = RateTable::from_toml_str(
            r#"
            [concrete]
            zone_1 = 200.0
            zone_2 = 210.0
            zone_3 = 220.0
            zone_4 = 230.0
            "#,
        )
        .unwrap();
        assert_eq!(rates.concrete_rate(ConcreteZone::Zone1), 200.0);
        assert_eq!(rates.rebar, RateTable::builtin().rebar);
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = RateTable::from_toml_str(
            r#"
            [xps]
            r_5 = -1.0
            r_10 = 1.41
            "#,
        );
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(ConcreteZone::from_str_flexible("zone 3").unwrap(), ConcreteZone::Zone3);
        assert_eq!(ConcreteZone::from_str_flexible("4").unwrap(), ConcreteZone::Zone4);
        assert_eq!(RebarSize::from_str_flexible("#5").unwrap(), RebarSize::No5);
        assert_eq!(RebarSize::from_str_flexible("No. 3").unwrap(), RebarSize::No3);
        assert_eq!(VaporBarrierType::from_str_flexible("15 mil").unwrap(), VaporBarrierType::Mil15);
        assert_eq!(XpsRValue::from_str_flexible("R-10").unwrap(), XpsRValue::R10);
        assert!(XpsRValue::from_str_flexible("R-15").is_err());
    }

    #[test]
    fn test_selection_serialization() {
        assert_eq!(serde_json::to_string(&ConcreteZone::Zone1).unwrap(), "\"Zone 1\"");
        assert_eq!(serde_json::to_string(&RebarSize::No4).unwrap(), "\"#4\"");
        let r: XpsRValue = serde_json::from_str("\"R-10\"").unwrap();
        assert_eq!(r, XpsRValue::R10);
    }
}
