//! # Drainage Network Data Structures
//!
//! A drainage network is a chain of manholes joined by pipe segments:
//!
//! ```text
//! MH-1 (inlet) --P-1--> MH-2 (junction) --P-2--> ... --P-n--> MH-n+1 (outlet)
//! ```
//!
//! Networks are snapshots. Once the generator returns one, nothing mutates
//! it; the optimizer only compares costs and keeps or drops whole networks.

use serde::{Deserialize, Serialize};

use crate::catchment::CatchmentParams;
use crate::config::DesignStandards;
use crate::errors::{DrainError, DrainResult};
use crate::hydraulics::PipeMaterial;

/// Position of a manhole in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// First node, collects surface inflow
    Inlet,
    /// Intermediate node
    Junction,
    /// Last node, discharges to the outfall
    Outlet,
}

impl NodeRole {
    /// Role for the node at `index` in a chain of `count` nodes
    pub fn for_position(index: usize, count: usize) -> Self {
        if index == 0 {
            NodeRole::Inlet
        } else if index + 1 == count {
            NodeRole::Outlet
        } else {
            NodeRole::Junction
        }
    }
}

/// Manhole depth class used for pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthClass {
    /// Less than 1.5 m
    Shallow,
    /// 1.5 m to under 3 m
    Medium,
    /// 3 m and deeper
    Deep,
}

impl DepthClass {
    pub fn from_depth(depth_m: f64) -> Self {
        if depth_m < 1.5 {
            DepthClass::Shallow
        } else if depth_m < 3.0 {
            DepthClass::Medium
        } else {
            DepthClass::Deep
        }
    }
}

/// A manhole node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManHole {
    /// Identifier, unique within the network (e.g. "MH-3")
    pub id: String,

    /// Plan x coordinate (m), for drawing only
    pub x_m: f64,

    /// Plan y coordinate (m), for drawing only
    pub y_m: f64,

    /// Invert level (m)
    pub invert_elevation_m: f64,

    /// Cover level (m), always above the invert
    pub rim_elevation_m: f64,

    pub role: NodeRole,

    /// Flood risk (0-100) copied from an adjacent segment
    pub flood_risk: u32,
}

impl ManHole {
    /// Depth from cover to invert (m)
    pub fn depth_m(&self) -> f64 {
        self.rim_elevation_m - self.invert_elevation_m
    }

    pub fn depth_class(&self) -> DepthClass {
        DepthClass::from_depth(self.depth_m())
    }
}

/// A pipe segment running from an upstream to a downstream manhole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSegment {
    /// Identifier, unique within the network (e.g. "P-3")
    pub id: String,

    /// Upstream manhole id
    pub from_node: String,

    /// Downstream manhole id
    pub to_node: String,

    pub length_m: f64,

    /// Nominal diameter (mm), always a catalog size
    pub diameter_mm: u32,

    /// Longitudinal slope (%)
    pub slope_pct: f64,

    pub material: PipeMaterial,

    /// Velocity at the design fill ratio (m/s), not clamped to the NBC band
    pub velocity_mps: f64,

    /// Capacity at the design fill ratio (m³/s)
    pub flow_rate_cms: f64,

    /// Required flow over capacity, capped below the NBC maximum
    pub fill_ratio: f64,

    /// Flood risk score (0-100)
    pub flood_risk: u32,
}

impl PipeSegment {
    /// True when velocity, fill ratio and diameter are all within NBC limits
    pub fn meets_nbc(&self, standards: &DesignStandards) -> bool {
        self.velocity_mps >= standards.min_velocity_mps
            && self.velocity_mps <= standards.max_velocity_mps
            && self.fill_ratio <= standards.max_fill_ratio
            && self.diameter_mm >= standards.min_diameter_mm
    }
}

/// Pipe length laid in one material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuantity {
    pub material: PipeMaterial,
    pub length_m: f64,
    pub segments: usize,
}

/// A complete drainage network.
///
/// `manholes.len() == pipes.len() + 1`, and pipe `i` runs from manhole `i`
/// to manhole `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrainageNetwork {
    pub manholes: Vec<ManHole>,

    pub pipes: Vec<PipeSegment>,

    /// Catchment the network was designed for
    pub catchment: CatchmentParams,

    /// Peak runoff at the outlet (m³/s)
    pub peak_runoff_cms: f64,

    /// Sum of pipe lengths (m)
    pub total_length_m: f64,

    /// Estimated construction cost (₹ lakhs)
    pub total_cost_lakhs: f64,

    /// Mean segment flood risk, rounded
    pub flood_risk_score: u32,

    /// Every pipe meets the NBC velocity, fill and diameter limits
    pub nbc_compliant: bool,
}

impl DrainageNetwork {
    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }

    /// Find a pipe by id
    pub fn pipe(&self, id: &str) -> Option<&PipeSegment> {
        self.pipes.iter().find(|p| p.id == id)
    }

    /// Find a manhole by id
    pub fn manhole(&self, id: &str) -> Option<&ManHole> {
        self.manholes.iter().find(|m| m.id == id)
    }

    /// Pipe leaving a manhole
    pub fn downstream_pipe(&self, manhole_id: &str) -> Option<&PipeSegment> {
        self.pipes.iter().find(|p| p.from_node == manhole_id)
    }

    /// Pipe entering a manhole
    pub fn upstream_pipe(&self, manhole_id: &str) -> Option<&PipeSegment> {
        self.pipes.iter().find(|p| p.to_node == manhole_id)
    }

    /// Check that every pipe references existing manholes and the chain is ordered.
    pub fn check_topology(&self) -> DrainResult<()> {
        if self.manholes.len() != self.pipes.len() + 1 {
            return Err(DrainError::Internal {
                message: format!(
                    "{} manholes for {} pipes",
                    self.manholes.len(),
                    self.pipes.len()
                ),
            });
        }
        for (i, pipe) in self.pipes.iter().enumerate() {
            if pipe.from_node != self.manholes[i].id || pipe.to_node != self.manholes[i + 1].id {
                return Err(DrainError::Internal {
                    message: format!("Pipe {} does not join consecutive manholes", pipe.id),
                });
            }
        }
        Ok(())
    }

    fn require_pipes(&self) -> DrainResult<&[PipeSegment]> {
        if self.pipes.is_empty() {
            Err(DrainError::EmptyNetwork)
        } else {
            Ok(&self.pipes)
        }
    }

    /// Mean segment velocity (m/s)
    pub fn mean_velocity_mps(&self) -> DrainResult<f64> {
        let pipes = self.require_pipes()?;
        Ok(pipes.iter().map(|p| p.velocity_mps).sum::<f64>() / pipes.len() as f64)
    }

    /// Largest segment fill ratio
    pub fn max_fill_ratio(&self) -> DrainResult<f64> {
        let pipes = self.require_pipes()?;
        Ok(pipes.iter().map(|p| p.fill_ratio).fold(f64::MIN, f64::max))
    }

    /// Smallest segment diameter (mm)
    pub fn min_diameter_mm(&self) -> DrainResult<u32> {
        self.require_pipes()?
            .iter()
            .map(|p| p.diameter_mm)
            .min()
            .ok_or(DrainError::EmptyNetwork)
    }

    /// Mean segment slope (%)
    pub fn mean_slope_pct(&self) -> DrainResult<f64> {
        let pipes = self.require_pipes()?;
        Ok(pipes.iter().map(|p| p.slope_pct).sum::<f64>() / pipes.len() as f64)
    }

    /// Longest segment, i.e. the widest manhole spacing (m)
    pub fn max_segment_length_m(&self) -> DrainResult<f64> {
        let pipes = self.require_pipes()?;
        Ok(pipes.iter().map(|p| p.length_m).fold(f64::MIN, f64::max))
    }

    /// Material of the first (inlet) pipe
    pub fn trunk_material(&self) -> Option<PipeMaterial> {
        self.pipes.first().map(|p| p.material)
    }

    /// Pipe length per material, in order of first appearance
    pub fn length_by_material(&self) -> Vec<MaterialQuantity> {
        let mut out: Vec<MaterialQuantity> = Vec::new();
        for pipe in &self.pipes {
            match out.iter_mut().find(|q| q.material == pipe.material) {
                Some(q) => {
                    q.length_m += pipe.length_m;
                    q.segments += 1;
                }
                None => out.push(MaterialQuantity {
                    material: pipe.material,
                    length_m: pipe.length_m,
                    segments: 1,
                }),
            }
        }
        out
    }
}
