//! # Hydraulic Formulas
//!
//! Pure functions for storm drain sizing:
//!
//! ```text
//! Rational method     Q = C·I·A / 360            (m³/s; I in mm/hr, A in ha)
//! Fill angle          θ = 2·acos(1 − 2·y/d)
//! Wetted area         A = (d²/8)(θ − sin θ)
//! Wetted perimeter    P = (d/2)·θ
//! Hydraulic radius    R = A / P
//! Manning             V = (1/n)·R^(2/3)·S^(1/2),  Q = V·A
//! ```
//!
//! The partial-flow geometry is undefined at an empty or completely full
//! section (θ = 0 gives P = 0), so fill ratios must lie strictly inside
//! (0, 1). Those boundaries are rejected with [`DrainError::InvalidInput`].
//!
//! ## Example
//!
//! ```rust
//! use drain_core::hydraulics::pipe_velocity_at_fill;
//!
//! // 300 mm pipe at 1% slope, flowing 80% full
//! let v = pipe_velocity_at_fill(300, 1.0, 0.8, 0.013).unwrap();
//! assert!(v > 0.6 && v < 3.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::catchment::{CatchmentParams, SoilType};
use crate::config::DesignStandards;
use crate::errors::{DrainError, DrainResult};
use crate::units::{Meters, Millimeters};

/// Unit conversion constant of the rational method for mm/hr and hectares
pub const RATIONAL_METHOD_FACTOR: f64 = 360.0;

/// Manning n typical of PVC and RCC sewers
pub const DEFAULT_MANNING_N: f64 = 0.013;

/// Default evaluation fill ratio (NBC maximum depth of flow)
pub const DEFAULT_FILL_RATIO: f64 = 0.8;

/// Pipe material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipeMaterial {
    /// Unplasticised PVC
    #[serde(rename = "PVC")]
    Pvc,
    /// Reinforced cement concrete
    #[serde(rename = "RCC")]
    Rcc,
    /// High-density polyethylene
    #[serde(rename = "HDPE")]
    Hdpe,
    /// Cast iron
    #[serde(rename = "CI")]
    Ci,
}

impl PipeMaterial {
    /// Display code (e.g. "RCC")
    pub fn code(&self) -> &'static str {
        match self {
            PipeMaterial::Pvc => "PVC",
            PipeMaterial::Rcc => "RCC",
            PipeMaterial::Hdpe => "HDPE",
            PipeMaterial::Ci => "CI",
        }
    }

    /// Whether the pipe joints tolerate ground movement without special fittings
    pub fn is_flexible(&self) -> bool {
        matches!(self, PipeMaterial::Pvc | PipeMaterial::Hdpe)
    }
}

impl std::fmt::Display for PipeMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Peak runoff by the rational method, Q = C·I·A/360 (m³/s).
///
/// A zero area gives zero runoff.
pub fn peak_runoff(params: &CatchmentParams) -> f64 {
    params.runoff_coefficient * params.rainfall_intensity_mm_hr * params.area_ha / RATIONAL_METHOD_FACTOR
}

/// Wetted geometry of a circular section flowing partly full.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartialFlowSection {
    /// Central angle subtended by the free surface (rad)
    pub theta_rad: f64,
    /// Wetted area (m²)
    pub area_m2: f64,
    /// Wetted perimeter (m)
    pub perimeter_m: f64,
    /// Hydraulic radius A/P (m)
    pub hydraulic_radius_m: f64,
}

impl PartialFlowSection {
    /// Compute the wetted geometry for a diameter (m) and fill ratio y/d.
    pub fn new(diameter_m: f64, fill_ratio: f64) -> DrainResult<Self> {
        if !(diameter_m > 0.0) {
            return Err(DrainError::invalid_input(
                "diameter",
                diameter_m.to_string(),
                "Diameter must be positive",
            ));
        }
        if !(fill_ratio > 0.0 && fill_ratio < 1.0) {
            return Err(DrainError::invalid_input(
                "fill_ratio",
                fill_ratio.to_string(),
                "Fill ratio must lie strictly between 0 and 1",
            ));
        }

        let theta_rad = 2.0 * (1.0 - 2.0 * fill_ratio).acos();
        let area_m2 = diameter_m.powi(2) / 8.0 * (theta_rad - theta_rad.sin());
        let perimeter_m = diameter_m / 2.0 * theta_rad;

        Ok(PartialFlowSection {
            theta_rad,
            area_m2,
            perimeter_m,
            hydraulic_radius_m: area_m2 / perimeter_m,
        })
    }
}

fn manning_velocity(section: &PartialFlowSection, slope_pct: f64, roughness: f64) -> DrainResult<f64> {
    if !(roughness > 0.0) {
        return Err(DrainError::invalid_input(
            "roughness",
            roughness.to_string(),
            "Manning n must be positive",
        ));
    }
    if !(slope_pct >= 0.0) {
        return Err(DrainError::invalid_input(
            "slope_pct",
            slope_pct.to_string(),
            "Slope cannot be negative",
        ));
    }
    let slope = slope_pct / 100.0;
    Ok(section.hydraulic_radius_m.powf(2.0 / 3.0) * slope.sqrt() / roughness)
}

/// Flow velocity (m/s) in a circular pipe filled to `fill_ratio` of its diameter.
pub fn pipe_velocity_at_fill(diameter_mm: u32, slope_pct: f64, fill_ratio: f64, roughness: f64) -> DrainResult<f64> {
    let d: Meters = Millimeters(diameter_mm as f64).into();
    let section = PartialFlowSection::new(d.value(), fill_ratio)?;
    manning_velocity(&section, slope_pct, roughness)
}

/// Discharge capacity (m³/s) of a circular pipe filled to `fill_ratio` of its diameter.
pub fn pipe_flow_at_fill(diameter_mm: u32, slope_pct: f64, fill_ratio: f64, roughness: f64) -> DrainResult<f64> {
    let d: Meters = Millimeters(diameter_mm as f64).into();
    let section = PartialFlowSection::new(d.value(), fill_ratio)?;
    Ok(manning_velocity(&section, slope_pct, roughness)? * section.area_m2)
}

/// Pick the smallest catalog diameter that carries `required_flow_cms` with a
/// velocity inside the self-cleansing / scour band.
///
/// The slope is floored at the regulatory minimum. When no catalog entry
/// meets every condition, the largest catalog diameter is returned; the
/// resulting segment then shows up as non-compliant rather than as an error.
pub fn select_pipe_diameter(required_flow_cms: f64, slope_pct: f64, standards: &DesignStandards) -> DrainResult<u32> {
    let slope = slope_pct.max(standards.min_slope_pct);
    let fill = standards.design_fill_ratio;
    let n = standards.manning_n;

    for &diameter_mm in &standards.diameters_mm {
        let d: Meters = Millimeters(diameter_mm as f64).into();
        let section = PartialFlowSection::new(d.value(), fill)?;
        let velocity = manning_velocity(&section, slope, n)?;
        let capacity = velocity * section.area_m2;
        if capacity >= required_flow_cms
            && velocity >= standards.min_velocity_mps
            && velocity <= standards.max_velocity_mps
        {
            return Ok(diameter_mm);
        }
    }

    let fallback = standards.max_catalog_diameter_mm();
    tracing::warn!(
        required_flow_cms,
        slope_pct = slope,
        fallback_mm = fallback,
        "No catalog diameter satisfies capacity and velocity limits, using largest size"
    );
    Ok(fallback)
}

/// Choose a pipe material from diameter, slope and soil.
///
/// | Condition                          | Material |
/// |------------------------------------|----------|
/// | d ≤ 300 mm and slope < 5 %         | PVC      |
/// | d ≤ 450 mm and soil not rocky      | HDPE     |
/// | d > 450 mm                         | RCC      |
/// | otherwise                          | RCC      |
pub fn select_material(diameter_mm: u32, slope_pct: f64, soil: SoilType) -> PipeMaterial {
    if diameter_mm <= 300 && slope_pct < 5.0 {
        PipeMaterial::Pvc
    } else if diameter_mm <= 450 && soil != SoilType::Rocky {
        PipeMaterial::Hdpe
    } else {
        PipeMaterial::Rcc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catchment::LandUse;

    fn scenario() -> CatchmentParams {
        CatchmentParams::new(18.5, 0.65, 100.0, 1.2)
            .with_soil(SoilType::Clay)
            .with_land_use(LandUse::Residential)
    }

    #[test]
    fn test_peak_runoff_scenario() {
        // Q = 0.65 * 100 * 18.5 / 360 = 3.340 m³/s
        let q = peak_runoff(&scenario());
        assert!((q - 3.3403).abs() < 0.001);
    }

    #[test]
    fn test_peak_runoff_is_linear() {
        let base = peak_runoff(&scenario());

        let mut doubled_area = scenario();
        doubled_area.area_ha *= 2.0;
        assert!((peak_runoff(&doubled_area) - 2.0 * base).abs() < 1e-9);

        let mut tripled_rain = scenario();
        tripled_rain.rainfall_intensity_mm_hr *= 3.0;
        assert!((peak_runoff(&tripled_rain) - 3.0 * base).abs() < 1e-9);
    }

    #[test]
    fn test_zero_area_gives_zero_runoff() {
        let mut c = scenario();
        c.area_ha = 0.0;
        assert_eq!(peak_runoff(&c), 0.0);
    }

    #[test]
    fn test_half_full_geometry() {
        // At y/d = 0.5, θ = π, A = πd²/8, P = πd/2, R = d/4
        let s = PartialFlowSection::new(1.0, 0.5).unwrap();
        assert!((s.theta_rad - std::f64::consts::PI).abs() < 1e-9);
        assert!((s.area_m2 - std::f64::consts::PI / 8.0).abs() < 1e-9);
        assert!((s.hydraulic_radius_m - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_fill_rejected() {
        assert!(PartialFlowSection::new(0.3, 0.0).is_err());
        assert!(PartialFlowSection::new(0.3, 1.0).is_err());
        assert!(pipe_velocity_at_fill(300, 1.0, 1.0, 0.013).is_err());
        assert!(pipe_flow_at_fill(300, 1.0, 0.8, 0.0).is_err());
    }

    #[test]
    fn test_velocity_300mm_reference() {
        // R ≈ 0.0913 m, V = (1/0.013)(0.0913^(2/3))(0.01^0.5) ≈ 1.56 m/s
        let v = pipe_velocity_at_fill(300, 1.0, 0.8, 0.013).unwrap();
        assert!((v - 1.56).abs() < 0.02, "velocity was {}", v);
        assert!(v > 0.6 && v < 3.0);
    }

    #[test]
    fn test_velocity_scales_with_root_slope() {
        let v1 = pipe_velocity_at_fill(450, 0.8, 0.8, 0.013).unwrap();
        let v2 = pipe_velocity_at_fill(450, 1.6, 0.8, 0.013).unwrap();
        assert!((v2 / v1 - 2.0_f64.sqrt()).abs() < 1e-9);

        let mut last = 0.0;
        for slope in [0.1, 0.5, 1.0, 2.0, 5.0] {
            let v = pipe_velocity_at_fill(450, slope, 0.8, 0.013).unwrap();
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn test_flow_is_velocity_times_area() {
        let v = pipe_velocity_at_fill(600, 1.0, 0.8, 0.013).unwrap();
        let q = pipe_flow_at_fill(600, 1.0, 0.8, 0.013).unwrap();
        let area = PartialFlowSection::new(0.6, 0.8).unwrap().area_m2;
        assert!((q - v * area).abs() < 1e-12);
    }

    #[test]
    fn test_select_diameter_in_catalog() {
        let standards = DesignStandards::default();
        for flow in [0.0, 0.01, 0.05, 0.2, 0.8, 2.0, 5.0, 50.0] {
            for slope in [0.1, 0.5, 1.2, 4.0, 9.0] {
                let d = select_pipe_diameter(flow, slope, &standards).unwrap();
                assert!(standards.diameters_mm.contains(&d));
            }
        }
    }

    #[test]
    fn test_select_diameter_meets_capacity() {
        let standards = DesignStandards::default();
        let d = select_pipe_diameter(0.1, 1.0, &standards).unwrap();
        let q = pipe_flow_at_fill(d, 1.0, 0.8, 0.013).unwrap();
        let v = pipe_velocity_at_fill(d, 1.0, 0.8, 0.013).unwrap();
        assert!(q >= 0.1);
        assert!(v >= 0.6 && v <= 3.0);
        assert!(d < 1200);
    }

    #[test]
    fn test_select_diameter_is_smallest_fit() {
        let standards = DesignStandards::default();
        for (flow, slope) in [(0.02, 0.8), (0.15, 1.0), (0.4, 2.5), (0.9, 0.6)] {
            let d = select_pipe_diameter(flow, slope, &standards).unwrap();
            for &smaller in standards.diameters_mm.iter().filter(|&&s| s < d) {
                let q = pipe_flow_at_fill(smaller, slope, 0.8, 0.013).unwrap();
                let v = pipe_velocity_at_fill(smaller, slope, 0.8, 0.013).unwrap();
                assert!(q < flow || v < 0.6 || v > 3.0);
            }
        }
    }

    #[test]
    fn test_select_diameter_falls_back_to_largest() {
        let standards = DesignStandards::default();
        // Far beyond any catalog capacity
        assert_eq!(select_pipe_diameter(100.0, 1.0, &standards).unwrap(), 1200);
    }

    #[test]
    fn test_material_decision_table() {
        assert_eq!(select_material(300, 1.0, SoilType::Clay), PipeMaterial::Pvc);
        assert_eq!(select_material(300, 6.0, SoilType::Clay), PipeMaterial::Hdpe);
        assert_eq!(select_material(375, 1.0, SoilType::Loam), PipeMaterial::Hdpe);
        assert_eq!(select_material(375, 1.0, SoilType::Rocky), PipeMaterial::Rcc);
        assert_eq!(select_material(600, 1.0, SoilType::Sandy), PipeMaterial::Rcc);
        assert_eq!(select_material(200, 7.0, SoilType::Rocky), PipeMaterial::Rcc);
    }

    #[test]
    fn test_material_serialization() {
        assert_eq!(serde_json::to_string(&PipeMaterial::Hdpe).unwrap(), "\"HDPE\"");
        assert_eq!(PipeMaterial::Rcc.to_string(), "RCC");
    }
}
