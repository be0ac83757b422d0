//! # Catchment Parameters
//!
//! Inputs describing a drainage basin. A `CatchmentParams` value is the
//! immutable input to one optimization run.
//!
//! Range checking lives in [`CatchmentParams::validate`], which the boundary
//! (CLI, UI form, API handler) calls once. The hydraulic routines assume
//! validated input.
//!
//! ## Example
//!
//! ```rust
//! use drain_core::catchment::{CatchmentParams, LandUse, SoilType};
//!
//! let catchment = CatchmentParams::new(18.5, 0.65, 100.0, 1.2)
//!     .with_soil(SoilType::Clay)
//!     .with_land_use(LandUse::Residential);
//!
//! assert!(catchment.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{DrainError, DrainResult};
use crate::units::{Hectares, SquareMeters};

/// Soil classification at pipe bedding level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    #[default]
    Clay,
    Loam,
    Sandy,
    Rocky,
}

impl SoilType {
    /// All soil types for UI selection
    /// Short display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SoilType::Clay => "Clay",
            SoilType::Loam => "Loam",
            SoilType::Sandy => "Sandy",
            SoilType::Rocky => "Rocky",
        }
    }

    /// Qualitative infiltration behaviour of the soil
    pub fn infiltration_class(&self) -> &'static str {
        match self {
            SoilType::Clay => "Low infiltration, high runoff",
            SoilType::Loam => "Moderate infiltration",
            SoilType::Sandy => "High infiltration",
            SoilType::Rocky => "Negligible infiltration, hard excavation",
        }
    }
}

impl std::str::FromStr for SoilType {
    type Err = DrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clay" => Ok(SoilType::Clay),
            "loam" => Ok(SoilType::Loam),
            "sandy" | "sand" => Ok(SoilType::Sandy),
            "rocky" | "rock" => Ok(SoilType::Rocky),
            _ => Err(DrainError::invalid_input(
                "soil_type",
                s,
                "Expected one of clay, loam, sandy, rocky",
            )),
        }
    }
}

/// Dominant land use of the catchment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LandUse {
    #[default]
    Residential,
    Commercial,
    Industrial,
    Mixed,
}

impl LandUse {
    /// All land uses for UI selection
    /// Short display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LandUse::Residential => "Residential",
            LandUse::Commercial => "Commercial",
            LandUse::Industrial => "Industrial",
            LandUse::Mixed => "Mixed",
        }
    }

    /// Typical rational-method runoff coefficient for this land use
    pub fn typical_runoff_coefficient(&self) -> f64 {
        match self {
            LandUse::Residential => 0.45,
            LandUse::Commercial => 0.80,
            LandUse::Industrial => 0.70,
            LandUse::Mixed => 0.60,
        }
    }
}

impl std::str::FromStr for LandUse {
    type Err = DrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residential" => Ok(LandUse::Residential),
            "commercial" => Ok(LandUse::Commercial),
            "industrial" => Ok(LandUse::Industrial),
            "mixed" => Ok(LandUse::Mixed),
            _ => Err(DrainError::invalid_input(
                "land_use",
                s,
                "Expected one of residential, commercial, industrial, mixed",
            )),
        }
    }
}

/// Drainage basin description.
///
/// ## JSON Example
///
/// ```json
/// {
///   "area_ha": 18.5,
///   "runoff_coefficient": 0.65,
///   "rainfall_intensity_mm_hr": 100.0,
///   "slope_pct": 1.2,
///   "soil_type": "clay",
///   "land_use": "residential"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentParams {
    /// Catchment area in hectares
    pub area_ha: f64,

    /// Rational-method runoff coefficient C (0 to 1)
    pub runoff_coefficient: f64,

    /// Design rainfall intensity I (mm/hr)
    pub rainfall_intensity_mm_hr: f64,

    /// Average ground slope (%)
    pub slope_pct: f64,

    /// Soil classification
    pub soil_type: SoilType,

    /// Land-use classification
    pub land_use: LandUse,
}

impl CatchmentParams {
    /// Create catchment parameters with default soil (clay) and land use (residential).
    pub fn new(area_ha: f64, runoff_coefficient: f64, rainfall_intensity_mm_hr: f64, slope_pct: f64) -> Self {
        CatchmentParams {
            area_ha,
            runoff_coefficient,
            rainfall_intensity_mm_hr,
            slope_pct,
            soil_type: SoilType::default(),
            land_use: LandUse::default(),
        }
    }

    /// Set soil type (builder pattern)
    pub fn with_soil(mut self, soil_type: SoilType) -> Self {
        self.soil_type = soil_type;
        self
    }

    /// Set land use (builder pattern)
    pub fn with_land_use(mut self, land_use: LandUse) -> Self {
        self.land_use = land_use;
        self
    }

    /// Replace the runoff coefficient with the land-use typical value
    pub fn with_land_use_default_runoff(mut self) -> Self {
        self.runoff_coefficient = self.land_use.typical_runoff_coefficient();
        self
    }

    /// Catchment area in square metres
    pub fn area_m2(&self) -> f64 {
        SquareMeters::from(Hectares(self.area_ha)).value()
    }

    /// Validate input ranges.
    pub fn validate(&self) -> DrainResult<()> {
        if !(self.area_ha > 0.0) {
            return Err(DrainError::invalid_input(
                "area_ha",
                self.area_ha.to_string(),
                "Catchment area must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.runoff_coefficient) {
            return Err(DrainError::invalid_input(
                "runoff_coefficient",
                self.runoff_coefficient.to_string(),
                "Runoff coefficient must be between 0 and 1",
            ));
        }
        if !(self.rainfall_intensity_mm_hr > 0.0) {
            return Err(DrainError::invalid_input(
                "rainfall_intensity_mm_hr",
                self.rainfall_intensity_mm_hr.to_string(),
                "Rainfall intensity must be positive",
            ));
        }
        if !(self.slope_pct > 0.0) {
            return Err(DrainError::invalid_input(
                "slope_pct",
                self.slope_pct.to_string(),
                "Slope must be positive",
            ));
        }
        Ok(())
    }
}
