//! # Result Record
//!
//! One flat row per calculated line item. Every component type produces the
//! same shape; quantities that do not apply to a type are `0.0`.

use serde::{Deserialize, Serialize};

use crate::rates::{ConcreteZone, RebarSize, VaporBarrierType, XpsRValue};

use super::{ComponentSpec, ComponentType, JobInfo};

/// Calculated takeoff for one component.
///
/// All values are stored at full precision; rounding happens only when a
/// record is displayed or exported.
///
/// ## JSON Example
///
/// ```json
/// {
///   "project_name": "Smith Residence",
///   "estimator_name": "R. Lee",
///   "label": "W-1",
///   "component": "Foundation Wall",
///   "concrete_cy": 2.1728,
///   "rebar_lf": 172.0,
///   "concrete_cost": 423.70,
///   "rebar_cost": 94.60,
///   "total_cost": 518.30,
///   "sale_price": 647.88
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub project_name: String,
    pub estimator_name: String,
    pub label: String,
    pub component: ComponentType,

    // Echoed inputs
    pub length_ft: f64,
    pub height_ft: f64,
    pub thickness_in: f64,
    /// Area the pricing was based on (override or length x height)
    pub area_sf: f64,
    pub quantity: u32,
    pub include_overage: bool,
    pub include_xps: bool,
    pub concrete_zone: ConcreteZone,
    pub rebar_size: RebarSize,
    /// Spacing override in inches, if one was entered
    #[serde(default)]
    pub rebar_spacing_in: Option<f64>,
    /// Linear footing bar count, if one was entered
    #[serde(default)]
    pub bar_count: Option<u32>,
    pub vapor_type: VaporBarrierType,
    pub xps_r_value: XpsRValue,
    pub finish_rate_sf: f64,
    pub markup_pct: f64,

    // Quantities
    pub concrete_cy: f64,
    pub rebar_lf: f64,
    pub xps_area_sf: f64,
    pub drain_rock_cy: f64,
    pub fabric_lf: f64,
    pub pipe_lf: f64,

    // Costs
    pub xps_cost: f64,
    pub drain_cost: f64,
    pub vapor_cost: f64,
    pub finish_cost: f64,
    pub concrete_cost: f64,
    pub rebar_cost: f64,
    pub total_cost: f64,
    pub sale_price: f64,
}

impl ResultRecord {
    /// A record echoing `spec` with every computed field at zero
    pub(crate) fn echo(job: &JobInfo, spec: &ComponentSpec) -> Self {
        ResultRecord {
            project_name: job.project_name.clone(),
            estimator_name: job.estimator_name.clone(),
            label: spec.label.clone(),
            component: spec.component,
            length_ft: spec.length_ft,
            height_ft: spec.height_ft,
            thickness_in: spec.thickness_in,
            area_sf: 0.0,
            quantity: spec.quantity,
            include_overage: spec.include_overage,
            include_xps: spec.include_xps,
            concrete_zone: spec.pricing.concrete_zone,
            rebar_size: spec.rebar.size,
            rebar_spacing_in: spec.rebar.spacing_in,
            bar_count: spec.rebar.bar_count,
            vapor_type: spec.pricing.vapor_type,
            xps_r_value: spec.pricing.xps_r_value,
            finish_rate_sf: spec.pricing.finish_rate_sf,
            markup_pct: spec.pricing.markup_pct,
            concrete_cy: 0.0,
            rebar_lf: 0.0,
            xps_area_sf: 0.0,
            drain_rock_cy: 0.0,
            fabric_lf: 0.0,
            pipe_lf: 0.0,
            xps_cost: 0.0,
            drain_cost: 0.0,
            vapor_cost: 0.0,
            finish_cost: 0.0,
            concrete_cost: 0.0,
            rebar_cost: 0.0,
            total_cost: 0.0,
            sale_price: 0.0,
        }
    }

    /// Sum of every raw cost bucket
    pub fn raw_cost_sum(&self) -> f64 {
        self.concrete_cost + self.rebar_cost + self.xps_cost + self.drain_cost + self.vapor_cost + self.finish_cost
    }

    /// Sale price minus raw cost
    pub fn margin(&self) -> f64 {
        self.sale_price - self.total_cost
    }
}

/// Price with markup: `cost x (1 + markup_pct / 100)`
pub fn apply_markup(cost: f64, markup_pct: f64) -> f64 {
    cost * (1.0 + markup_pct / 100.0)
}
