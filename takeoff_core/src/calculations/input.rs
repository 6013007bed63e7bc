//! # Calculation Inputs
//!
//! [`ComponentSpec`] is everything the estimator needs for one line item:
//! the component type, its dimensions, rebar options, and the pricing
//! selections made on the form. [`JobInfo`] carries the project and
//! estimator names echoed onto every result.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "component": "Foundation Wall",
//!   "label": "W-1",
//!   "length_ft": 10.0,
//!   "height_ft": 8.0,
//!   "thickness_in": 8.0,
//!   "include_overage": true,
//!   "pricing": { "concrete_zone": "Zone 2", "markup_pct": 25.0 }
//! }
//! ```
//!
//! Every field except `component` has a default, so the JSON above is a
//! complete spec.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::rates::{ConcreteZone, RebarSize, VaporBarrierType, XpsRValue};

use super::ComponentType;

/// Default markup applied to raw cost (percent)
pub const DEFAULT_MARKUP_PCT: f64 = 25.0;

/// Default flatwork finish rate ($/SF), the lowest table step
pub const DEFAULT_FINISH_RATE_SF: f64 = 8.25;

/// Project-level names echoed onto every result record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    /// Project or job name
    pub project_name: String,
    /// Person preparing the takeoff
    pub estimator_name: String,
}

impl JobInfo {
    pub fn new(project_name: impl Into<String>, estimator_name: impl Into<String>) -> Self {
        JobInfo {
            project_name: project_name.into(),
            estimator_name: estimator_name.into(),
        }
    }
}

/// Rebar layout overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebarOptions {
    /// On-center spacing in inches, applied to both grid directions.
    /// `None` uses the component default.
    #[serde(default)]
    pub spacing_in: Option<f64>,

    /// Bar size (selects the $/LF rate)
    #[serde(default)]
    pub size: RebarSize,

    /// Continuous bars in a linear footing. `None` uses 2.
    #[serde(default)]
    pub bar_count: Option<u32>,
}

/// Pricing selections made for a line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSelection {
    #[serde(default)]
    pub concrete_zone: ConcreteZone,

    /// Markup over raw cost, in percent (25.0 = 25%)
    #[serde(default = "default_markup_pct")]
    pub markup_pct: f64,

    /// Finish rate in $/SF; must match a table step
    #[serde(default = "default_finish_rate_sf")]
    pub finish_rate_sf: f64,

    #[serde(default)]
    pub vapor_type: VaporBarrierType,

    #[serde(default)]
    pub xps_r_value: XpsRValue,
}

fn default_markup_pct() -> f64 {
    DEFAULT_MARKUP_PCT
}

fn default_finish_rate_sf() -> f64 {
    DEFAULT_FINISH_RATE_SF
}

fn default_quantity() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for PricingSelection {
    fn default() -> Self {
        PricingSelection {
            concrete_zone: ConcreteZone::default(),
            markup_pct: DEFAULT_MARKUP_PCT,
            finish_rate_sf: DEFAULT_FINISH_RATE_SF,
            vapor_type: VaporBarrierType::default(),
            xps_r_value: XpsRValue::default(),
        }
    }
}

/// Input for one takeoff line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// What is being estimated
    pub component: ComponentType,

    /// User label (e.g., "W-1", "North footing")
    #[serde(default)]
    pub label: String,

    /// Length in feet
    #[serde(default)]
    pub length_ft: f64,

    /// Height, depth, or width in feet depending on the component
    #[serde(default)]
    pub height_ft: f64,

    /// Thickness in inches
    #[serde(default)]
    pub thickness_in: f64,

    /// Area in square feet; replaces length x height when greater than zero
    #[serde(default)]
    pub area_override_sf: Option<f64>,

    /// Count of identical pieces (multiplies spread footing volume only)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Apply the component's waste overage to concrete volume
    #[serde(default = "default_true")]
    pub include_overage: bool,

    /// Add XPS over the component area (walls, slabs, flatwork)
    #[serde(default)]
    pub include_xps: bool,

    #[serde(default)]
    pub rebar: RebarOptions,

    #[serde(default)]
    pub pricing: PricingSelection,
}

impl ComponentSpec {
    /// Create a spec with zero dimensions and default options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::calculations::{ComponentSpec, ComponentType};
    ///
    /// let wall = ComponentSpec::new(ComponentType::FoundationWall)
    ///     .with_label("W-1")
    ///     .with_dimensions(10.0, 8.0, 8.0);
    /// assert_eq!(wall.quantity, 1);
    /// assert!(wall.include_overage);
    /// ```
    pub fn new(component: ComponentType) -> Self {
        ComponentSpec {
            component,
            label: String::new(),
            length_ft: 0.0,
            height_ft: 0.0,
            thickness_in: 0.0,
            area_override_sf: None,
            quantity: 1,
            include_overage: true,
            include_xps: false,
            rebar: RebarOptions::default(),
            pricing: PricingSelection::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set length (ft), height/depth (ft), and thickness (in)
    pub fn with_dimensions(mut self, length_ft: f64, height_ft: f64, thickness_in: f64) -> Self {
        self.length_ft = length_ft;
        self.height_ft = height_ft;
        self.thickness_in = thickness_in;
        self
    }

    pub fn with_area_override(mut self, area_sf: f64) -> Self {
        self.area_override_sf = Some(area_sf);
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_overage(mut self, include_overage: bool) -> Self {
        self.include_overage = include_overage;
        self
    }

    pub fn with_xps(mut self, include_xps: bool) -> Self {
        self.include_xps = include_xps;
        self
    }

    pub fn with_rebar(mut self, rebar: RebarOptions) -> Self {
        self.rebar = rebar;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingSelection) -> Self {
        self.pricing = pricing;
        self
    }

    /// Area used for area-priced quantities: the override when it is
    /// positive, otherwise length x height.
    pub fn effective_area_sf(&self) -> f64 {
        match self.area_override_sf {
            Some(area) if area > 0.0 => area,
            _ => self.length_ft * self.height_ft,
        }
    }

    /// Thickness converted to feet
    pub fn thickness_ft(&self) -> f64 {
        self.thickness_in / 12.0
    }

    /// Copy of this spec with every numeric entry clamped to a finite,
    /// non-negative value and quantity raised to at least 1.
    ///
    /// Form entry uses this so a stray minus sign reads as zero instead of
    /// failing the whole calculation.
    pub fn clamped(&self) -> Self {
        let mut spec = self.clone();
        spec.length_ft = clamp_non_negative(spec.length_ft);
        spec.height_ft = clamp_non_negative(spec.height_ft);
        spec.thickness_in = clamp_non_negative(spec.thickness_in);
        spec.area_override_sf = spec.area_override_sf.map(clamp_non_negative);
        spec.quantity = spec.quantity.max(1);
        spec.rebar.spacing_in = spec
            .rebar
            .spacing_in
            .map(clamp_non_negative)
            .filter(|s| *s > 0.0);
        spec.pricing.markup_pct = clamp_non_negative(spec.pricing.markup_pct);
        spec
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        check_dimension("length_ft", self.length_ft)?;
        check_dimension("height_ft", self.height_ft)?;
        check_dimension("thickness_in", self.thickness_in)?;
        if let Some(area) = self.area_override_sf {
            check_dimension("area_override_sf", area)?;
        }
        if self.quantity == 0 {
            return Err(CalcError::invalid_input(
                "quantity",
                "0",
                "Quantity must be at least 1",
            ));
        }
        if let Some(spacing) = self.rebar.spacing_in {
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(CalcError::invalid_input(
                    "rebar.spacing_in",
                    spacing.to_string(),
                    "Rebar spacing must be positive",
                ));
            }
        }
        let markup = self.pricing.markup_pct;
        if !markup.is_finite() || markup < 0.0 {
            return Err(CalcError::invalid_input(
                "pricing.markup_pct",
                markup.to_string(),
                "Markup cannot be negative",
            ));
        }
        Ok(())
    }
}

fn clamp_non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn check_dimension(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Dimensions cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let spec: ComponentSpec = serde_json::from_str(r#"{ "component": "Garage Slab" }"#).unwrap();
        assert_eq!(spec.component, ComponentType::GarageSlab);
        assert_eq!(spec.quantity, 1);
        assert!(spec.include_overage);
        assert!(!spec.include_xps);
        assert_eq!(spec.pricing.markup_pct, DEFAULT_MARKUP_PCT);
        assert_eq!(spec.rebar.size, RebarSize::No4);
    }

    #[test]
    fn test_effective_area() {
        let spec = ComponentSpec::new(ComponentType::InteriorSlab).with_dimensions(20.0, 30.0, 4.0);
        assert_eq!(spec.effective_area_sf(), 600.0);

        let overridden = spec.clone().with_area_override(450.0);
        assert_eq!(overridden.effective_area_sf(), 450.0);

        let zero_override = spec.with_area_override(0.0);
        assert_eq!(zero_override.effective_area_sf(), 600.0);
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let spec = ComponentSpec::new(ComponentType::FoundationWall).with_dimensions(-10.0, 8.0, 8.0);
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "length_ft"));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let spec = ComponentSpec::new(ComponentType::SpreadFooting).with_quantity(0);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_clamped_spec_validates() {
        let mut spec = ComponentSpec::new(ComponentType::FoundationWall)
            .with_dimensions(-10.0, f64::NAN, 8.0)
            .with_quantity(0);
        spec.rebar.spacing_in = Some(-12.0);
        spec.pricing.markup_pct = -5.0;

        let clamped = spec.clamped();
        assert_eq!(clamped.length_ft, 0.0);
        assert_eq!(clamped.height_ft, 0.0);
        assert_eq!(clamped.thickness_in, 8.0);
        assert_eq!(clamped.quantity, 1);
        assert_eq!(clamped.rebar.spacing_in, None);
        assert_eq!(clamped.pricing.markup_pct, 0.0);
        assert!(clamped.validate().is_ok());
    }
}
