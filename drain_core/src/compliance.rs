//! # Compliance Rule Engine
//!
//! Evaluates a finished network against a fixed battery of nine code checks.
//! Every check is always returned, in the same order, whatever the outcome:
//!
//! | # | Check                  | Statistic              | Verdicts     |
//! |---|------------------------|------------------------|--------------|
//! | 1 | Minimum velocity       | mean velocity          | pass / fail  |
//! | 2 | Maximum velocity       | mean velocity          | pass / fail  |
//! | 3 | Maximum fill ratio     | max fill ratio         | pass / fail  |
//! | 4 | Minimum diameter       | min diameter           | pass / fail  |
//! | 5 | Minimum slope          | mean slope             | pass / fail  |
//! | 6 | Maximum slope          | mean slope             | pass / fail  |
//! | 7 | Manhole spacing        | longest segment        | warn / fail  |
//! | 8 | Seismic joints         | pipe materials         | pass / warn  |
//! | 9 | Environmental clearance| catchment area         | pass / warn  |
//!
//! Checks 7-9 are advisory. The network model carries no bend, zone or site
//! data, so they only fail or warn on a clear red flag.

use serde::{Deserialize, Serialize};

use crate::config::{code_ref, DesignStandards};
use crate::errors::DrainResult;
use crate::network::DrainageNetwork;

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
    Warn,
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Fail)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Warn => "warn",
        }
    }

    fn from_bool(ok: bool) -> Self {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// One evaluated rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    pub name: String,
    /// Governing clause citation
    pub clause: String,
    pub verdict: Verdict,
    /// Observed value, formatted for display
    pub observed: String,
    /// Limit, formatted for display
    pub limit: String,
    pub note: String,
}

impl ComplianceCheck {
    fn new(name: &str, clause: &str, verdict: Verdict, observed: String, limit: String, note: &str) -> Self {
        ComplianceCheck {
            name: name.to_string(),
            clause: clause.to_string(),
            verdict,
            observed,
            limit,
            note: note.to_string(),
        }
    }
}

/// Run every check against a network.
///
/// Returns [`DrainError::EmptyNetwork`](crate::errors::DrainError::EmptyNetwork)
/// for a network without pipes.
pub fn evaluate(network: &DrainageNetwork, standards: &DesignStandards) -> DrainResult<Vec<ComplianceCheck>> {
    let mean_velocity = network.mean_velocity_mps()?;
    let max_fill = network.max_fill_ratio()?;
    let min_diameter = network.min_diameter_mm()?;
    let mean_slope = network.mean_slope_pct()?;
    let max_spacing = network.max_segment_length_m()?;

    let all_flexible = network.pipes.iter().all(|p| p.material.is_flexible());
    let rigid_segments = network.pipes.iter().filter(|p| !p.material.is_flexible()).count();
    let area = network.catchment.area_ha;

    let checks = vec![
        ComplianceCheck::new(
            "Minimum velocity",
            code_ref::MIN_VELOCITY,
            Verdict::from_bool(mean_velocity >= standards.min_velocity_mps),
            format!("{:.2} m/s", mean_velocity),
            format!(">= {:.1} m/s", standards.min_velocity_mps),
            "Mean velocity must keep the pipes self-cleansing",
        ),
        ComplianceCheck::new(
            "Maximum velocity",
            code_ref::MAX_VELOCITY,
            Verdict::from_bool(mean_velocity <= standards.max_velocity_mps),
            format!("{:.2} m/s", mean_velocity),
            format!("<= {:.1} m/s", standards.max_velocity_mps),
            "Higher velocities scour the pipe invert",
        ),
        ComplianceCheck::new(
            "Maximum fill ratio",
            code_ref::FILL_RATIO,
            Verdict::from_bool(max_fill <= standards.max_fill_ratio),
            format!("{:.2}", max_fill),
            format!("<= {:.2}", standards.max_fill_ratio),
            "Free board above the design flow keeps the pipe ventilated",
        ),
        ComplianceCheck::new(
            "Minimum diameter",
            code_ref::MIN_DIAMETER,
            Verdict::from_bool(min_diameter >= standards.min_diameter_mm),
            format!("{} mm", min_diameter),
            format!(">= {} mm", standards.min_diameter_mm),
            "Smaller pipes block too easily",
        ),
        ComplianceCheck::new(
            "Minimum slope",
            code_ref::MIN_SLOPE,
            Verdict::from_bool(mean_slope >= standards.min_slope_pct),
            format!("{:.2} %", mean_slope),
            format!(">= {:.1} %", standards.min_slope_pct),
            "Mean gradient of the trunk line",
        ),
        ComplianceCheck::new(
            "Maximum slope",
            code_ref::MAX_SLOPE,
            Verdict::from_bool(mean_slope <= standards.max_slope_pct),
            format!("{:.2} %", mean_slope),
            format!("<= {:.1} %", standards.max_slope_pct),
            "Steeper runs need drop manholes",
        ),
        ComplianceCheck::new(
            "Manhole spacing",
            code_ref::MANHOLE_SPACING,
            if max_spacing <= standards.max_manhole_spacing_m {
                Verdict::Warn
            } else {
                Verdict::Fail
            },
            format!("{:.1} m", max_spacing),
            format!("<= {:.0} m", standards.max_manhole_spacing_m),
            "Manholes are placed at every segment end; confirm extra chambers at bends and junctions",
        ),
        ComplianceCheck::new(
            "Seismic joints",
            code_ref::SEISMIC,
            if all_flexible { Verdict::Pass } else { Verdict::Warn },
            format!("{} rigid segment(s)", rigid_segments),
            "flexible joints".to_string(),
            "Rigid pipes need flexible joints at manhole connections in seismic zones III-V",
        ),
        ComplianceCheck::new(
            "Environmental clearance",
            code_ref::ENVIRONMENTAL,
            if area <= standards.environmental_clearance_area_ha {
                Verdict::Pass
            } else {
                Verdict::Warn
            },
            format!("{:.1} ha", area),
            format!("<= {:.0} ha", standards.environmental_clearance_area_ha),
            "Larger catchments may need an environmental impact assessment before work starts",
        ),
    ];

    let failed = checks.iter().filter(|c| c.verdict.is_failure()).count();
    tracing::debug!(checks = checks.len(), failed, "Compliance evaluated");

    Ok(checks)
}

/// Verdict counts over a set of checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
    /// Fail if anything failed, else warn if anything warned, else pass
    pub overall: Verdict,
}

impl ComplianceSummary {
    pub fn from_checks(checks: &[ComplianceCheck]) -> Self {
        let count = |v: Verdict| checks.iter().filter(|c| c.verdict == v).count();
        let passed = count(Verdict::Pass);
        let failed = count(Verdict::Fail);
        let warnings = count(Verdict::Warn);

        let overall = if failed > 0 {
            Verdict::Fail
        } else if warnings > 0 {
            Verdict::Warn
        } else {
            Verdict::Pass
        };

        ComplianceSummary {
            passed,
            failed,
            warnings,
            overall,
        }
    }
}
