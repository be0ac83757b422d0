//! # Flood Risk Score
//!
//! Additive point model giving a 0-100 advisory score for a pipe segment.
//! The score is a screening heuristic, not a probability of flooding.
//!
//! | Term                               | Points                          |
//! |------------------------------------|---------------------------------|
//! | Fill ratio                         | min(40, fill × 50)              |
//! | Velocity below self-cleansing      | +15                             |
//! | Velocity above erosion threshold   | +10                             |
//! | Rainfall intensity                 | min(25, 25 × I / I_extreme)     |
//! | Runoff coefficient                 | min(15, 15 × C)                 |
//!
//! The sum is rounded and capped at 100.

use serde::{Deserialize, Serialize};

use crate::config::DesignStandards;

const FILL_POINTS_MAX: f64 = 40.0;
const FILL_POINTS_PER_UNIT: f64 = 50.0;
const LOW_VELOCITY_POINTS: f64 = 15.0;
const HIGH_VELOCITY_POINTS: f64 = 10.0;
const RAINFALL_POINTS_MAX: f64 = 25.0;
const RUNOFF_POINTS_MAX: f64 = 15.0;

/// Flood risk score (0-100) for one segment.
pub fn flood_risk(
    fill_ratio: f64,
    velocity_mps: f64,
    runoff_coefficient: f64,
    rainfall_intensity_mm_hr: f64,
    standards: &DesignStandards,
) -> u32 {
    let mut score = (fill_ratio.max(0.0) * FILL_POINTS_PER_UNIT).min(FILL_POINTS_MAX);

    if velocity_mps < standards.min_velocity_mps {
        score += LOW_VELOCITY_POINTS;
    }
    if velocity_mps > standards.erosion_velocity_mps {
        score += HIGH_VELOCITY_POINTS;
    }

    score += (rainfall_intensity_mm_hr.max(0.0) / standards.extreme_intensity_mm_hr * RAINFALL_POINTS_MAX)
        .min(RAINFALL_POINTS_MAX);
    score += (runoff_coefficient.max(0.0) * RUNOFF_POINTS_MAX).min(RUNOFF_POINTS_MAX);

    score.round().min(100.0) as u32
}

/// Qualitative band for a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Low,      // < 30
    Moderate, // 30-59
    High,     // 60-79
    Critical, // >= 80
}

impl RiskBand {
    /// Classify a 0-100 score
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=29 => RiskBand::Low,
            30..=59 => RiskBand::Moderate,
            60..=79 => RiskBand::High,
            _ => RiskBand::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Moderate => "moderate",
            RiskBand::High => "high",
            RiskBand::Critical => "critical",
        }
    }
}
