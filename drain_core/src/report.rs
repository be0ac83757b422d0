//! # Drainage Design Report
//!
//! Bundles one optimizer run with its compliance checks and itemised cost so
//! exporters and UIs get a single JSON-serialisable document.
//!
//! ```text
//! DrainageReport
//! ├── id, generated_at, schema_version
//! ├── catchment, peak_runoff_cms, risk_band
//! ├── result: OptimizationResult (network, savings, trace, advice)
//! ├── compliance: [ComplianceCheck; 9] + summary
//! ├── cost_breakdown
//! └── material_quantities (pipe length per material)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catchment::CatchmentParams;
use crate::compliance::{evaluate, ComplianceCheck, ComplianceSummary};
use crate::config::DesignConfig;
use crate::cost::{cost_breakdown, CostBreakdown};
use crate::errors::DrainResult;
use crate::hydraulics::PipeMaterial;
use crate::network::MaterialQuantity;
use crate::optimizer::OptimizationResult;
use crate::risk::RiskBand;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Complete design report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrainageReport {
    pub schema_version: String,

    /// Unique report identifier
    pub id: Uuid,

    pub generated_at: DateTime<Utc>,

    pub catchment: CatchmentParams,

    /// Rational-method peak runoff (m³/s)
    pub peak_runoff_cms: f64,

    /// Band of the network's aggregate flood risk
    pub risk_band: RiskBand,

    pub result: OptimizationResult,

    pub compliance: Vec<ComplianceCheck>,

    pub summary: ComplianceSummary,

    pub cost_breakdown: CostBreakdown,

    /// Pipe length per material, for procurement
    pub material_quantities: Vec<MaterialQuantity>,
}

impl DrainageReport {
    /// Evaluate compliance and cost for an optimizer result.
    pub fn build(result: OptimizationResult, config: &DesignConfig) -> DrainResult<Self> {
        let network = &result.network;
        let compliance = evaluate(network, &config.standards)?;
        let summary = ComplianceSummary::from_checks(&compliance);
        let breakdown = cost_breakdown(network, &config.rates);
        let material_quantities = network.length_by_material();

        Ok(DrainageReport {
            schema_version: SCHEMA_VERSION.to_string(),
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            catchment: network.catchment.clone(),
            peak_runoff_cms: network.peak_runoff_cms,
            risk_band: RiskBand::from_score(network.flood_risk_score),
            compliance,
            summary,
            cost_breakdown: breakdown,
            material_quantities,
            result,
        })
    }

    /// One row per pipe, upstream first
    pub fn pipe_schedule(&self) -> Vec<PipeScheduleRow> {
        self.result
            .network
            .pipes
            .iter()
            .map(|p| PipeScheduleRow {
                id: p.id.clone(),
                from_node: p.from_node.clone(),
                to_node: p.to_node.clone(),
                length_m: p.length_m,
                diameter_mm: p.diameter_mm,
                slope_pct: p.slope_pct,
                material: p.material,
                velocity_mps: p.velocity_mps,
                fill_ratio: p.fill_ratio,
                flood_risk: p.flood_risk,
            })
            .collect()
    }

    pub fn to_json_pretty(&self) -> DrainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Flat pipe record for tabular exporters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeScheduleRow {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub length_m: f64,
    pub diameter_mm: u32,
    pub slope_pct: f64,
    pub material: PipeMaterial,
    pub velocity_mps: f64,
    pub fill_ratio: f64,
    pub flood_risk: u32,
}
