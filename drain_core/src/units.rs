//! # Unit Types
//!
//! Lightweight newtype wrappers for the units the drainage engine mixes.
//! Serialized values stay plain numbers (`#[serde(transparent)]`).
//!
//! ## SI / Indian Practice Units
//!
//! - Length: millimetres (pipe diameters), metres (lengths, elevations)
//! - Area: hectares (catchments), square metres
//! - Cost: rupees (unit rates), lakhs (1 lakh = ₹100,000, reported totals)
//!
//! ## Example
//!
//! ```rust
//! use drain_core::units::{Millimeters, Meters, Rupees, Lakhs};
//!
//! let d: Meters = Millimeters(300.0).into();
//! assert_eq!(d.0, 0.3);
//!
//! let total: Lakhs = Rupees(2_500_000.0).into();
//! assert_eq!(total.0, 25.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Rupees per lakh
pub const RUPEES_PER_LAKH: f64 = 100_000.0;

/// Square metres per hectare
pub const SQ_METERS_PER_HECTARE: f64 = 10_000.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in hectares
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hectares(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl From<Hectares> for SquareMeters {
    fn from(ha: Hectares) -> Self {
        SquareMeters(ha.0 * SQ_METERS_PER_HECTARE)
    }
}

impl From<SquareMeters> for Hectares {
    fn from(m2: SquareMeters) -> Self {
        Hectares(m2.0 / SQ_METERS_PER_HECTARE)
    }
}

// ============================================================================
// Cost Units
// ============================================================================

/// Cost in Indian rupees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupees(pub f64);

/// Cost in lakhs of rupees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lakhs(pub f64);

impl From<Rupees> for Lakhs {
    fn from(inr: Rupees) -> Self {
        Lakhs(inr.0 / RUPEES_PER_LAKH)
    }
}

impl From<Lakhs> for Rupees {
    fn from(lakhs: Lakhs) -> Self {
        Rupees(lakhs.0 * RUPEES_PER_LAKH)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Hectares);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(Rupees);
impl_arithmetic!(Lakhs);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let m: Meters = Millimeters(1200.0).into();
        assert!((m.0 - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_rupees_to_lakhs() {
        let l: Lakhs = Rupees(350_000.0).into();
        assert!((l.0 - 3.5).abs() < 1e-12);
        let back: Rupees = l.into();
        assert!((back.0 - 350_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_hectares_to_sq_m() {
        let a: SquareMeters = Hectares(2.5).into();
        assert_eq!(a.0, 25_000.0);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Rupees(100.0);
        let b = Rupees(50.0);
        assert_eq!((a + b).0, 150.0);
        assert_eq!((a - b).0, 50.0);
        assert_eq!((a * 2.0).0, 200.0);
        assert_eq!((a / 4.0).0, 25.0);
        let total: Rupees = vec![a, b, Rupees(25.0)].into_iter().sum();
        assert_eq!(total.0, 175.0);
    }

    #[test]
    fn test_serialization() {
        let d = Millimeters(450.0);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "450.0");
    }
}
