//! # Unit Types
//!
//! Type-safe wrappers for takeoff quantities. These keep feet, inches,
//! square feet, and cubic yards from being mixed up inside the formulas while
//! remaining lightweight (just f64 wrappers).
//!
//! ## US Customary Units
//!
//! Takeoffs are priced the way suppliers quote them:
//! - Length: feet (ft), inches (in)
//! - Area: square feet (SF)
//! - Volume: cubic feet (CF), cubic yards (CY, 27 CF)
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{CubicFeet, CubicYards, Feet, Inches};
//!
//! let thickness: Feet = Inches(6.0).into();
//! assert_eq!(thickness.0, 0.5);
//!
//! let volume: CubicYards = CubicFeet(54.0).into();
//! assert_eq!(volume.0, 2.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Cubic feet in one cubic yard
pub const CF_PER_CY: f64 = 27.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Area / Volume Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicFeet(pub f64);

/// Volume in cubic yards
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicYards(pub f64);

impl From<CubicFeet> for CubicYards {
    fn from(cf: CubicFeet) -> Self {
        CubicYards(cf.0 / CF_PER_CY)
    }
}

impl Mul<Feet> for Feet {
    type Output = SqFt;
    fn mul(self, rhs: Feet) -> SqFt {
        SqFt(self.0 * rhs.0)
    }
}

impl Mul<Feet> for SqFt {
    type Output = CubicFeet;
    fn mul(self, rhs: Feet) -> CubicFeet {
        CubicFeet(self.0 * rhs.0)
    }
}

/// Scaling a volume by an overage or piece count
impl Mul<f64> for CubicYards {
    type Output = CubicYards;
    fn mul(self, factor: f64) -> CubicYards {
        CubicYards(self.0 * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_feet() {
        let ft: Feet = Inches(8.0).into();
        assert!((ft.0 - 0.6667).abs() < 1e-4);
    }

    #[test]
    fn test_volume_chain() {
        // 10 ft x 8 ft x 8 in wall = 53.33 CF = 1.975 CY
        let area = Feet(10.0) * Feet(8.0);
        let volume: CubicYards = (area * Feet::from(Inches(8.0))).into();
        assert!((volume.0 - 1.975).abs() < 0.001);
    }

    #[test]
    fn test_volume_scaling() {
        // Four 3 x 3 x 1 ft pads = 36 CF = 1.333 CY
        let pad: CubicYards = CubicFeet(9.0).into();
        assert!(((pad * 4.0).0 - 1.3333).abs() < 1e-4);
    }

    #[test]
    fn test_serialization_is_transparent() {
        let json = serde_json::to_string(&SqFt(12.5)).unwrap();
        assert_eq!(json, "12.5");
    }
}
