//! # Design Configuration
//!
//! Static tables consumed by the engine: NBC hydraulic constraints, the
//! standard pipe diameter catalog, and the material/works rate table.
//!
//! Configuration is an immutable value passed by reference into every
//! component. Two scenarios with different rate tables (e.g. two regions)
//! can therefore be evaluated side by side without shared state.
//!
//! ## JSON Example
//!
//! Every field is optional; missing fields take the default values.
//!
//! ```json
//! {
//!   "standards": { "min_velocity_mps": 0.75, "max_slope_pct": 8.0 },
//!   "rates": { "labor_per_m": 300.0 }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{DrainError, DrainResult};

// ============================================================================
// Code Clause References
// ============================================================================

/// Code clause citations for the compliance checks.
///
/// NBC 2016 Part 9 (Plumbing Services), Section 2 covers drainage and
/// sanitation; the CPHEEO manual supplies the hydraulic design limits.
pub mod code_ref {
    /// Self-cleansing velocity
    pub const MIN_VELOCITY: &str = "NBC 2016 Part 9 Sec 2 (self-cleansing velocity)";
    /// Maximum (non-scouring) velocity
    pub const MAX_VELOCITY: &str = "NBC 2016 Part 9 Sec 2 (limiting velocity)";
    /// Depth of flow at design discharge
    pub const FILL_RATIO: &str = "CPHEEO Manual (depth of flow 0.8D)";
    /// Minimum sewer size
    pub const MIN_DIAMETER: &str = "NBC 2016 Part 9 Sec 2 (minimum size)";
    /// Minimum gradient
    pub const MIN_SLOPE: &str = "NBC 2016 Part 9 Sec 2 (minimum gradient)";
    /// Maximum gradient
    pub const MAX_SLOPE: &str = "CPHEEO Manual (maximum gradient)";
    /// Manhole spacing on straight runs
    pub const MANHOLE_SPACING: &str = "NBC 2016 Part 9 Sec 2 (manhole spacing)";
    /// Flexible joints in seismic zones
    pub const SEISMIC: &str = "IS 1893 (Part 1): 2016";
    /// Environmental clearance for large catchment works
    pub const ENVIRONMENTAL: &str = "EIA Notification 2006";
}

// ============================================================================
// Hydraulic Standards
// ============================================================================

/// Standard pipe diameter catalog (mm), ascending
pub const STANDARD_DIAMETERS_MM: [u32; 12] = [150, 200, 250, 300, 375, 450, 525, 600, 750, 900, 1050, 1200];

/// NBC hydraulic design constraints and advisory thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignStandards {
    /// Self-cleansing velocity (m/s)
    pub min_velocity_mps: f64,

    /// Maximum velocity before scour (m/s)
    pub max_velocity_mps: f64,

    /// Maximum permitted depth of flow as a fraction of diameter
    pub max_fill_ratio: f64,

    /// Fill ratio at which pipe capacity and velocity are evaluated
    pub design_fill_ratio: f64,

    /// Cap on the fill ratio assigned to generated segments
    ///
    /// Kept just under `max_fill_ratio` so the fill angle stays away from 2π.
    pub fill_ratio_cap: f64,

    /// Smallest permitted pipe diameter (mm)
    pub min_diameter_mm: u32,

    /// Minimum longitudinal slope (%)
    pub min_slope_pct: f64,

    /// Maximum longitudinal slope (%)
    pub max_slope_pct: f64,

    /// Manning roughness coefficient n
    pub manning_n: f64,

    /// Velocity above which erosion risk points are scored (m/s)
    pub erosion_velocity_mps: f64,

    /// Rainfall intensity treated as an extreme event (mm/hr)
    pub extreme_intensity_mm_hr: f64,

    /// Maximum manhole spacing on a straight run (m)
    pub max_manhole_spacing_m: f64,

    /// Catchment area above which environmental clearance is flagged (ha)
    pub environmental_clearance_area_ha: f64,

    /// Rainfall intensity above which an advisory warning is raised (mm/hr)
    pub warn_intensity_mm_hr: f64,

    /// Runoff coefficient above which an advisory warning is raised
    pub warn_runoff_coefficient: f64,

    /// Average slope below which an advisory warning is raised (%)
    pub warn_min_slope_pct: f64,

    /// Standard diameter catalog (mm), ascending
    pub diameters_mm: Vec<u32>,
}

impl Default for DesignStandards {
    fn default() -> Self {
        DesignStandards {
            min_velocity_mps: 0.6,
            max_velocity_mps: 3.0,
            max_fill_ratio: 0.8,
            design_fill_ratio: 0.8,
            fill_ratio_cap: 0.79,
            min_diameter_mm: 150,
            min_slope_pct: 0.3,
            max_slope_pct: 10.0,
            manning_n: 0.013,
            erosion_velocity_mps: 2.5,
            extreme_intensity_mm_hr: 150.0,
            max_manhole_spacing_m: 100.0,
            environmental_clearance_area_ha: 20.0,
            warn_intensity_mm_hr: 120.0,
            warn_runoff_coefficient: 0.75,
            warn_min_slope_pct: 0.5,
            diameters_mm: STANDARD_DIAMETERS_MM.to_vec(),
        }
    }
}

impl DesignStandards {
    /// Largest catalog diameter (mm), the fallback for diameter selection
    pub fn max_catalog_diameter_mm(&self) -> u32 {
        self.diameters_mm.last().copied().unwrap_or(1200)
    }

    /// Check that the constraint set is internally consistent.
    pub fn validate(&self) -> DrainResult<()> {
        if self.diameters_mm.is_empty() {
            return Err(DrainError::config("Diameter catalog is empty"));
        }
        if self.diameters_mm.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DrainError::config("Diameter catalog must be strictly ascending"));
        }
        if self.diameters_mm.contains(&0) {
            return Err(DrainError::config("Diameter catalog entries must be positive"));
        }
        if self.min_diameter_mm == 0 {
            return Err(DrainError::config("min_diameter_mm must be positive"));
        }
        if self.min_velocity_mps >= self.max_velocity_mps {
            return Err(DrainError::config(format!(
                "min_velocity_mps ({}) must be below max_velocity_mps ({})",
                self.min_velocity_mps, self.max_velocity_mps
            )));
        }
        if self.min_slope_pct <= 0.0 || self.min_slope_pct > self.max_slope_pct {
            return Err(DrainError::config(format!(
                "Slope bounds [{}, {}] are not a positive range",
                self.min_slope_pct, self.max_slope_pct
            )));
        }
        for (name, fill) in [
            ("max_fill_ratio", self.max_fill_ratio),
            ("design_fill_ratio", self.design_fill_ratio),
            ("fill_ratio_cap", self.fill_ratio_cap),
        ] {
            if fill <= 0.0 || fill >= 1.0 {
                return Err(DrainError::config(format!("{} ({}) must lie in (0, 1)", name, fill)));
            }
        }
        if self.manning_n <= 0.0 {
            return Err(DrainError::config("manning_n must be positive"));
        }
        if self.extreme_intensity_mm_hr <= 0.0 {
            return Err(DrainError::config("extreme_intensity_mm_hr must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Rate Table
// ============================================================================

/// Unit rates for pricing a network (₹, SOR-style).
///
/// Pipe rates are keyed by catalog diameter in mm. Lookups take the smallest
/// key at or above the pipe diameter, so a diameter missing from the table
/// is priced at the next size up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    /// Supply and laying rate for PVC/HDPE/CI pipes (₹ per metre)
    pub pipe_rates_per_m: BTreeMap<u32, f64>,

    /// Supply and laying rate for RCC pipes (₹ per metre)
    pub rcc_pipe_rates_per_m: BTreeMap<u32, f64>,

    /// Rate used when a diameter exceeds every key in the table (₹ per metre)
    pub fallback_pipe_rate_per_m: f64,

    /// Trench excavation and backfill rate (₹ per m³)
    pub excavation_per_m3: f64,

    /// Trench width allowance added to the pipe (m)
    pub trench_width_m: f64,

    /// Clearance added to the pipe diameter for trench depth (m)
    pub trench_clearance_m: f64,

    /// Backfill cost as a share of excavation cost in the itemised breakdown
    pub backfill_share: f64,

    /// Labour allowance (₹ per metre of pipe)
    pub labor_per_m: f64,

    /// Manhole cost for depth below 1.5 m (₹ each)
    pub manhole_shallow: f64,

    /// Manhole cost for depth 1.5 m to 3 m (₹ each)
    pub manhole_medium: f64,

    /// Manhole cost for depth 3 m and over (₹ each)
    pub manhole_deep: f64,

    /// Naive baseline estimate, lakhs per hectare of catchment
    pub naive_lakhs_per_ha: f64,

    /// Naive baseline estimate, lakhs per pipe segment
    pub naive_lakhs_per_pipe: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        let pipe_rates_per_m = [
            (150, 450.0),
            (200, 650.0),
            (250, 900.0),
            (300, 1200.0),
            (375, 1650.0),
            (450, 2200.0),
            (525, 2800.0),
            (600, 3400.0),
            (750, 4600.0),
            (900, 6000.0),
            (1050, 7600.0),
            (1200, 9400.0),
        ]
        .into_iter()
        .collect();

        let rcc_pipe_rates_per_m = [
            (150, 700.0),
            (200, 900.0),
            (250, 1200.0),
            (300, 1500.0),
            (375, 1900.0),
            (450, 2400.0),
            (525, 3000.0),
            (600, 3600.0),
            (750, 5000.0),
            (900, 6500.0),
            (1050, 8200.0),
            (1200, 10000.0),
        ]
        .into_iter()
        .collect();

        RateTable {
            pipe_rates_per_m,
            rcc_pipe_rates_per_m,
            fallback_pipe_rate_per_m: 12000.0,
            excavation_per_m3: 350.0,
            trench_width_m: 0.8,
            trench_clearance_m: 0.6,
            backfill_share: 0.5,
            labor_per_m: 250.0,
            manhole_shallow: 25_000.0,
            manhole_medium: 45_000.0,
            manhole_deep: 75_000.0,
            naive_lakhs_per_ha: 3.0,
            naive_lakhs_per_pipe: 0.8,
        }
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Complete design configuration: hydraulic standards plus rates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub standards: DesignStandards,
    pub rates: RateTable,
}

impl DesignConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drain_core::config::DesignConfig;
    ///
    /// let cfg = DesignConfig::from_json_str(r#"{ "standards": { "manning_n": 0.011 } }"#).unwrap();
    /// assert_eq!(cfg.standards.manning_n, 0.011);
    /// assert_eq!(cfg.standards.max_velocity_mps, 3.0);
    /// ```
    pub fn from_json_str(json: &str) -> DrainResult<Self> {
        let config: DesignConfig = serde_json::from_str(json)?;
        config.standards.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> DrainResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DrainError::config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_standards_are_valid() {
        let standards = DesignStandards::default();
        assert!(standards.validate().is_ok());
        assert_eq!(standards.max_catalog_diameter_mm(), 1200);
        assert_eq!(standards.diameters_mm.len(), 12);
    }

    #[test]
    fn test_rejects_unsorted_catalog() {
        let standards = DesignStandards {
            diameters_mm: vec![300, 150, 450],
            ..DesignStandards::default()
        };
        assert!(standards.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_diameters() {
        let mut standards = DesignStandards::default();
        standards.diameters_mm.insert(0, 0);
        assert!(matches!(standards.validate(), Err(DrainError::ConfigError { .. })));

        let standards = DesignStandards {
            min_diameter_mm: 0,
            ..DesignStandards::default()
        };
        assert!(standards.validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_fill() {
        let standards = DesignStandards {
            design_fill_ratio: 1.0,
            ..DesignStandards::default()
        };
        let err = standards.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = DesignConfig::from_json_str(r#"{ "rates": { "labor_per_m": 300.0 } }"#).unwrap();
        assert_eq!(cfg.rates.labor_per_m, 300.0);
        assert_eq!(cfg.rates.manhole_deep, 75_000.0);
        assert_eq!(cfg.standards, DesignStandards::default());
    }

    #[test]
    fn test_rate_table_json_roundtrip() {
        let rates = RateTable::default();
        let json = serde_json::to_string(&rates).unwrap();
        let roundtrip: RateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(rates, roundtrip);
        assert_eq!(roundtrip.rcc_pipe_rates_per_m.get(&600), Some(&3600.0));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = DesignConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
