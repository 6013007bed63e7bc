//! # Sitework and Area-Priced Items
//!
//! French drains plus the items priced straight off an area: XPS board,
//! vapor barrier, and flatwork finish.

use crate::rates::DrainRates;
use crate::units::{CubicYards, Feet};

/// French drain trench width (ft)
pub const DRAIN_TRENCH_WIDTH_FT: f64 = 2.0;

/// French drain trench depth (ft)
pub const DRAIN_TRENCH_DEPTH_FT: f64 = 2.0;

/// Drain rock overage, applied regardless of the concrete overage toggle
pub const DRAIN_ROCK_OVERAGE: f64 = 1.10;

/// Quantities and raw cost for a French drain run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrainTakeoff {
    pub rock: CubicYards,
    pub fabric_lf: f64,
    pub pipe_lf: f64,
    pub cost: f64,
}

/// French drain over `length_ft` of fixed 2 ft x 2 ft trench
pub fn french_drain(length_ft: f64, rates: &DrainRates) -> DrainTakeoff {
    let cross_section = Feet(DRAIN_TRENCH_WIDTH_FT) * Feet(DRAIN_TRENCH_DEPTH_FT);
    let trench: CubicYards = (cross_section * Feet(length_ft)).into();
    let rock = trench * DRAIN_ROCK_OVERAGE;

    let fabric_lf = length_ft;
    let pipe_lf = length_ft;
    let cost = rock.0 * rates.rock_per_cy + fabric_lf * rates.fabric_per_lf + pipe_lf * rates.pipe_per_lf;

    DrainTakeoff {
        rock,
        fabric_lf,
        pipe_lf,
        cost,
    }
}

/// Raw cost of an area-priced item
pub fn area_cost(area_sf: f64, unit_price_sf: f64) -> f64 {
    area_sf * unit_price_sf
}
