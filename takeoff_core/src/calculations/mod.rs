//! # Takeoff Calculations
//!
//! Every line item follows the same pattern:
//!
//! - [`ComponentSpec`] - Input parameters (JSON-serializable)
//! - [`ResultRecord`] - Calculated quantities and costs (JSON-serializable)
//! - [`calculate`] - Pure function dispatching on [`ComponentType`]
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::{calculate, ComponentSpec, ComponentType, JobInfo};
//! use takeoff_core::rates::RateTable;
//!
//! let job = JobInfo::new("Smith Residence", "R. Lee");
//! let wall = ComponentSpec::new(ComponentType::FoundationWall).with_dimensions(10.0, 8.0, 8.0);
//!
//! let record = calculate(&job, &wall, RateTable::builtin()).unwrap();
//! assert!((record.concrete_cy - 2.17).abs() < 0.01);
//! assert!((record.sale_price - record.total_cost * 1.25).abs() < 1e-9);
//! ```

pub mod concrete;
pub mod input;
pub mod record;
pub mod sitework;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::rates::RateTable;

pub use input::{ComponentSpec, JobInfo, PricingSelection, RebarOptions};
pub use record::{apply_markup, ResultRecord};

/// Component types the estimator knows how to take off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    #[serde(rename = "Foundation Wall")]
    FoundationWall,
    #[serde(rename = "Linear Footing")]
    LinearFooting,
    #[serde(rename = "Spread Footing")]
    SpreadFooting,
    #[serde(rename = "Interior Slab")]
    InteriorSlab,
    #[serde(rename = "Garage Slab")]
    GarageSlab,
    #[serde(rename = "Exterior Flatwork")]
    ExteriorFlatwork,
    #[serde(rename = "XPS Insulation")]
    XpsInsulation,
    #[serde(rename = "French Drain")]
    FrenchDrain,
    #[serde(rename = "Vapor Barrier")]
    VaporBarrier,
    #[serde(rename = "Flatwork Finish")]
    FlatworkFinish,
}

impl ComponentType {
    /// All component types in form order
    pub const ALL: [ComponentType; 10] = [
        ComponentType::FoundationWall,
        ComponentType::LinearFooting,
        ComponentType::SpreadFooting,
        ComponentType::InteriorSlab,
        ComponentType::GarageSlab,
        ComponentType::ExteriorFlatwork,
        ComponentType::XpsInsulation,
        ComponentType::FrenchDrain,
        ComponentType::VaporBarrier,
        ComponentType::FlatworkFinish,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentType::FoundationWall => "Foundation Wall",
            ComponentType::LinearFooting => "Linear Footing",
            ComponentType::SpreadFooting => "Spread Footing",
            ComponentType::InteriorSlab => "Interior Slab",
            ComponentType::GarageSlab => "Garage Slab",
            ComponentType::ExteriorFlatwork => "Exterior Flatwork",
            ComponentType::XpsInsulation => "XPS Insulation",
            ComponentType::FrenchDrain => "French Drain",
            ComponentType::VaporBarrier => "Vapor Barrier",
            ComponentType::FlatworkFinish => "Flatwork Finish",
        }
    }

    /// Parse from display names, kebab/snake case, or short codes
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '_'], "-").as_str() {
            "foundation-wall" | "wall" | "fw" => Ok(ComponentType::FoundationWall),
            "linear-footing" | "footing" | "lf" => Ok(ComponentType::LinearFooting),
            "spread-footing" | "pad" | "sf" => Ok(ComponentType::SpreadFooting),
            "interior-slab" | "slab" | "is" => Ok(ComponentType::InteriorSlab),
            "garage-slab" | "gs" => Ok(ComponentType::GarageSlab),
            "exterior-flatwork" | "flatwork" | "ef" => Ok(ComponentType::ExteriorFlatwork),
            "xps-insulation" | "xps" => Ok(ComponentType::XpsInsulation),
            "french-drain" | "drain" | "fd" => Ok(ComponentType::FrenchDrain),
            "vapor-barrier" | "vapor" | "vb" => Ok(ComponentType::VaporBarrier),
            "flatwork-finish" | "finish" | "ff" => Ok(ComponentType::FlatworkFinish),
            _ => Err(CalcError::invalid_input(
                "component",
                s,
                "Unknown component type",
            )),
        }
    }

    /// Whether this type produces concrete volume
    pub fn is_concrete(&self) -> bool {
        matches!(
            self,
            ComponentType::FoundationWall
                | ComponentType::LinearFooting
                | ComponentType::SpreadFooting
                | ComponentType::InteriorSlab
                | ComponentType::GarageSlab
                | ComponentType::ExteriorFlatwork
        )
    }

    /// Concrete waste multiplier applied when overage is enabled
    pub fn overage_factor(&self) -> f64 {
        match self {
            ComponentType::FoundationWall | ComponentType::LinearFooting | ComponentType::SpreadFooting => 1.10,
            ComponentType::InteriorSlab | ComponentType::GarageSlab | ComponentType::ExteriorFlatwork => 1.05,
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Calculate quantities, costs, and sale price for one component.
///
/// # Arguments
///
/// * `job` - Project and estimator names echoed onto the record
/// * `spec` - Component dimensions and selections
/// * `rates` - Active pricing table
///
/// # Returns
///
/// * `Ok(ResultRecord)` - Calculated record
/// * `Err(CalcError)` - Negative/non-finite input or an unknown finish rate
///
/// Identical inputs always produce identical records.
pub fn calculate(job: &JobInfo, spec: &ComponentSpec, rates: &RateTable) -> CalcResult<ResultRecord> {
    spec.validate()?;

    let mut record = ResultRecord::echo(job, spec);
    let area = spec.effective_area_sf();

    match spec.component {
        ComponentType::FoundationWall
        | ComponentType::InteriorSlab
        | ComponentType::GarageSlab
        | ComponentType::ExteriorFlatwork => {
            let takeoff = concrete::wall_or_slab(spec);
            record.area_sf = area;
            record.concrete_cy = takeoff.volume.0;
            record.rebar_lf = takeoff.rebar_lf;
            if spec.include_xps {
                record.xps_area_sf = area;
            }
        }
        ComponentType::LinearFooting => {
            let takeoff = concrete::linear_footing(spec);
            record.area_sf = area;
            record.concrete_cy = takeoff.volume.0;
            record.rebar_lf = takeoff.rebar_lf;
        }
        ComponentType::SpreadFooting => {
            let takeoff = concrete::spread_footing(spec);
            record.area_sf = area;
            record.concrete_cy = takeoff.volume.0;
        }
        ComponentType::XpsInsulation => {
            record.area_sf = area;
            record.xps_area_sf = area;
        }
        ComponentType::FrenchDrain => {
            let drain = sitework::french_drain(spec.length_ft, &rates.drain);
            record.drain_rock_cy = drain.rock.0;
            record.fabric_lf = drain.fabric_lf;
            record.pipe_lf = drain.pipe_lf;
            record.drain_cost = drain.cost;
        }
        ComponentType::VaporBarrier => {
            record.area_sf = area;
            record.vapor_cost = sitework::area_cost(area, rates.vapor_rate(spec.pricing.vapor_type));
        }
        ComponentType::FlatworkFinish => {
            let rate = rates.finish_rate(spec.pricing.finish_rate_sf)?;
            record.area_sf = area;
            record.finish_rate_sf = rate;
            record.finish_cost = sitework::area_cost(area, rate);
        }
    }

    record.xps_cost = sitework::area_cost(record.xps_area_sf, rates.xps_rate(spec.pricing.xps_r_value));
    record.concrete_cost = record.concrete_cy * rates.concrete_rate(spec.pricing.concrete_zone);
    record.rebar_cost = record.rebar_lf * rates.rebar_rate(spec.rebar.size);
    record.total_cost = record.raw_cost_sum();
    record.sale_price = apply_markup(record.total_cost, spec.pricing.markup_pct);

    debug!(
        component = %spec.component,
        label = %spec.label,
        concrete_cy = record.concrete_cy,
        rebar_lf = record.rebar_lf,
        total_cost = record.total_cost,
        sale_price = record.sale_price,
        "calculated takeoff line"
    );

    Ok(record)
}
