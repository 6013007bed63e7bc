//! # Concrete Takeoff
//!
//! Volume and rebar quantities for concrete-bearing components: foundation
//! walls, slabs, exterior flatwork, and footings.
//!
//! ## Assumptions
//!
//! - Volume is net geometry / 27, then a waste overage: 10% for walls and
//!   footings, 5% for slabs and flatwork. Overage is never stacked.
//! - Wall and slab rebar is a two-way grid. Each bar gets a 2 ft lap
//!   allowance, and every grid gets four 1.5 ft corner bars.
//! - Linear footings carry continuous longitudinal bars (2 by default).
//! - Spread footing rebar is not taken off.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::concrete::rebar_grid_lf;
//!
//! // 10 ft x 8 ft wall, #4 @ 12" horizontal, 18" vertical
//! let lf = rebar_grid_lf(10.0, 8.0, 1.0, 1.5);
//! assert_eq!(lf, 172.0);
//! ```

use crate::units::{CubicYards, Feet, Inches, SqFt};

use super::{ComponentSpec, ComponentType};

/// Lap splice allowance added per bar (ft)
pub const LAP_ALLOWANCE_FT: f64 = 2.0;

/// Corner bars added to every wall or slab grid
pub const CORNER_BAR_COUNT: f64 = 4.0;

/// Length of each corner bar (ft)
pub const CORNER_BAR_LENGTH_FT: f64 = 1.5;

/// Default continuous bars in a linear footing
pub const DEFAULT_FOOTING_BARS: u32 = 2;

/// Wall horizontal bar spacing (in)
pub const WALL_HORIZONTAL_SPACING_IN: f64 = 12.0;

/// Wall vertical bar spacing (in)
pub const WALL_VERTICAL_SPACING_IN: f64 = 18.0;

/// Slab and flatwork spacing, each way (in)
pub const SLAB_SPACING_IN: f64 = 18.0;

/// Absorbs float noise so 8.0 / (16/12) counts 6 bars, not 7
const BAR_COUNT_EPSILON: f64 = 1e-9;

/// Concrete and rebar quantities for one line item
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConcreteTakeoff {
    /// Concrete volume including overage
    pub volume: CubicYards,
    /// Rebar linear feet including laps and corner bars
    pub rebar_lf: f64,
}

/// Number of bars at `spacing_ft` needed to cover `span_ft`
pub fn bar_count(span_ft: f64, spacing_ft: f64) -> f64 {
    if span_ft <= 0.0 || spacing_ft <= 0.0 {
        return 0.0;
    }
    (span_ft / spacing_ft - BAR_COUNT_EPSILON).ceil().max(0.0)
}

/// Two-way rebar grid over a `length_ft` x `height_ft` panel.
///
/// `spacing_across_height_ft` sets how many bars run the full length;
/// `spacing_across_length_ft` sets how many bars run the full height.
/// Returns 0 when either span is zero (no grid to place).
pub fn rebar_grid_lf(
    length_ft: f64,
    height_ft: f64,
    spacing_across_height_ft: f64,
    spacing_across_length_ft: f64,
) -> f64 {
    if length_ft <= 0.0 || height_ft <= 0.0 {
        return 0.0;
    }

    let long_bars = bar_count(height_ft, spacing_across_height_ft);
    let short_bars = bar_count(length_ft, spacing_across_length_ft);

    let run_lf = long_bars * length_ft + short_bars * height_ft;
    let lap_lf = (long_bars + short_bars) * LAP_ALLOWANCE_FT;
    let corner_lf = CORNER_BAR_COUNT * CORNER_BAR_LENGTH_FT;

    run_lf + lap_lf + corner_lf
}

/// Grid spacing in feet as (across height, across length) for a component.
/// An override applies to both directions.
fn grid_spacing_ft(component: ComponentType, override_in: Option<f64>) -> (f64, f64) {
    let (across_height_in, across_length_in) = match override_in {
        Some(spacing) => (spacing, spacing),
        None if component == ComponentType::FoundationWall => {
            (WALL_HORIZONTAL_SPACING_IN, WALL_VERTICAL_SPACING_IN)
        }
        None => (SLAB_SPACING_IN, SLAB_SPACING_IN),
    };
    (
        Feet::from(Inches(across_height_in)).0,
        Feet::from(Inches(across_length_in)).0,
    )
}

fn with_overage(volume: CubicYards, component: ComponentType, include_overage: bool) -> CubicYards {
    if include_overage {
        volume * component.overage_factor()
    } else {
        volume
    }
}

/// Foundation walls, interior/garage slabs, and exterior flatwork
pub fn wall_or_slab(spec: &ComponentSpec) -> ConcreteTakeoff {
    let area = spec.effective_area_sf();
    let net: CubicYards = (SqFt(area) * Feet(spec.thickness_ft())).into();
    let volume = with_overage(net, spec.component, spec.include_overage);

    let (across_height, across_length) = grid_spacing_ft(spec.component, spec.rebar.spacing_in);
    let rebar_lf = rebar_grid_lf(spec.length_ft, spec.height_ft, across_height, across_length);

    ConcreteTakeoff { volume, rebar_lf }
}

/// Continuous footing: `height_ft` is the footing width
pub fn linear_footing(spec: &ComponentSpec) -> ConcreteTakeoff {
    let section = Feet(spec.length_ft) * Feet(spec.height_ft);
    let net: CubicYards = (section * Feet(spec.thickness_ft())).into();
    let volume = with_overage(net, spec.component, spec.include_overage);

    let bars = spec.rebar.bar_count.unwrap_or(DEFAULT_FOOTING_BARS) as f64;
    let rebar_lf = if spec.length_ft > 0.0 {
        bars * spec.length_ft + bars * LAP_ALLOWANCE_FT
    } else {
        0.0
    };

    ConcreteTakeoff { volume, rebar_lf }
}

/// Isolated pad footings, `quantity` identical pieces
pub fn spread_footing(spec: &ComponentSpec) -> ConcreteTakeoff {
    let footprint = Feet(spec.length_ft) * Feet(spec.height_ft);
    let each: CubicYards = (footprint * Feet(spec.thickness_ft())).into();
    let net = each * spec.quantity as f64;

    ConcreteTakeoff {
        volume: with_overage(net, spec.component, spec.include_overage),
        rebar_lf: 0.0,
    }
}
