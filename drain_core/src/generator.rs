//! # Network Generator
//!
//! Builds a single trunk line of `num_pipes` segments for a catchment:
//!
//! 1. Lay out `num_pipes + 1` manholes on a four-column grid (small plan
//!    jitter, drawing only). Inverts and covers fall along the chain.
//! 2. Size each segment. The design flow tapers downstream as
//!    `Q_peak × (1 − 0.05·i)`, the slope is the catchment slope with ±15 %
//!    jitter clamped to the NBC range, and the length is drawn from 30-80 m.
//! 3. Copy each segment's risk onto both end manholes (last write wins).
//! 4. Total length, cost, mean risk and the NBC compliance flag.
//!
//! Slope and length are random, so two calls with the same inputs give
//! different networks unless the RNG is seeded identically. The optimizer
//! relies on that variation.
//!
//! ## Example
//!
//! ```rust
//! use drain_core::catchment::CatchmentParams;
//! use drain_core::config::DesignConfig;
//! use drain_core::generator::generate_network;
//! use drain_core::hydraulics::peak_runoff;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let catchment = CatchmentParams::new(4.0, 0.6, 80.0, 1.0);
//! let q = peak_runoff(&catchment);
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let network = generate_network(&catchment, 8, q, &DesignConfig::default(), &mut rng).unwrap();
//! assert_eq!(network.manholes.len(), 9);
//! ```

use rand::Rng;

use crate::catchment::CatchmentParams;
use crate::config::DesignConfig;
use crate::cost::network_cost;
use crate::errors::{DrainError, DrainResult};
use crate::hydraulics::{pipe_flow_at_fill, pipe_velocity_at_fill, select_material, select_pipe_diameter};
use crate::network::{DrainageNetwork, ManHole, NodeRole, PipeSegment};
use crate::risk::flood_risk;
use crate::units::Lakhs;

/// Default number of pipe segments
pub const DEFAULT_NUM_PIPES: usize = 8;

const GRID_COLUMNS: usize = 4;
const GRID_SPACING_M: f64 = 60.0;
const PLAN_JITTER_M: f64 = 6.0;

const TOP_RIM_ELEVATION_M: f64 = 100.0;
const RIM_DROP_PER_NODE_M: f64 = 0.3;
const INLET_DEPTH_M: f64 = 1.2;
const DEPTH_GAIN_PER_NODE_M: f64 = 0.15;

const FLOW_DECAY_PER_SEGMENT: f64 = 0.05;
const SLOPE_JITTER: f64 = 0.15;
const MIN_SEGMENT_LENGTH_M: f64 = 30.0;
const MAX_SEGMENT_LENGTH_M: f64 = 80.0;

fn layout_manholes<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<ManHole> {
    (0..count)
        .map(|i| {
            let row = i / GRID_COLUMNS;
            let col = i % GRID_COLUMNS;
            let rim = TOP_RIM_ELEVATION_M - i as f64 * RIM_DROP_PER_NODE_M;
            let depth = INLET_DEPTH_M + i as f64 * DEPTH_GAIN_PER_NODE_M;

            ManHole {
                id: format!("MH-{}", i + 1),
                x_m: col as f64 * GRID_SPACING_M + rng.gen_range(-PLAN_JITTER_M..PLAN_JITTER_M),
                y_m: row as f64 * GRID_SPACING_M + rng.gen_range(-PLAN_JITTER_M..PLAN_JITTER_M),
                invert_elevation_m: rim - depth,
                rim_elevation_m: rim,
                role: NodeRole::for_position(i, count),
                flood_risk: 0,
            }
        })
        .collect()
}

/// Generate one candidate network.
///
/// # Arguments
///
/// * `catchment` - Catchment the network drains
/// * `num_pipes` - Number of segments in the trunk line (at least 1)
/// * `peak_runoff_cms` - Peak runoff at the outlet (m³/s), see [`crate::hydraulics::peak_runoff`]
/// * `config` - Hydraulic standards and rate table
/// * `rng` - Source of the slope, length and layout jitter
///
/// # Returns
///
/// * `Ok(DrainageNetwork)` - May be non-compliant when no catalog size fits
/// * `Err(DrainError)` - `num_pipes` is zero or the standards are degenerate
pub fn generate_network<R: Rng + ?Sized>(
    catchment: &CatchmentParams,
    num_pipes: usize,
    peak_runoff_cms: f64,
    config: &DesignConfig,
    rng: &mut R,
) -> DrainResult<DrainageNetwork> {
    if num_pipes == 0 {
        return Err(DrainError::invalid_input(
            "num_pipes",
            "0",
            "At least one pipe segment is required",
        ));
    }

    let standards = &config.standards;
    let mut manholes = layout_manholes(num_pipes + 1, rng);
    let mut pipes = Vec::with_capacity(num_pipes);

    for i in 0..num_pipes {
        let segment_flow = (peak_runoff_cms * (1.0 - i as f64 * FLOW_DECAY_PER_SEGMENT)).max(0.0);
        let slope_pct = (catchment.slope_pct * (1.0 + rng.gen_range(-SLOPE_JITTER..SLOPE_JITTER)))
            .max(standards.min_slope_pct)
            .min(standards.max_slope_pct);

        let diameter_mm = select_pipe_diameter(segment_flow, slope_pct, standards)?;
        let material = select_material(diameter_mm, slope_pct, catchment.soil_type);
        let velocity_mps =
            pipe_velocity_at_fill(diameter_mm, slope_pct, standards.design_fill_ratio, standards.manning_n)?;
        let capacity_cms =
            pipe_flow_at_fill(diameter_mm, slope_pct, standards.design_fill_ratio, standards.manning_n)?;
        let fill_ratio = if capacity_cms > 0.0 {
            (segment_flow / capacity_cms).min(standards.fill_ratio_cap)
        } else {
            standards.fill_ratio_cap
        };
        let length_m = rng.gen_range(MIN_SEGMENT_LENGTH_M..MAX_SEGMENT_LENGTH_M);
        let risk = flood_risk(
            fill_ratio,
            velocity_mps,
            catchment.runoff_coefficient,
            catchment.rainfall_intensity_mm_hr,
            standards,
        );

        tracing::debug!(
            segment = i + 1,
            flow_cms = segment_flow,
            slope_pct,
            diameter_mm,
            material = %material,
            velocity_mps,
            fill_ratio,
            risk,
            "Sized pipe segment"
        );

        manholes[i].flood_risk = risk;
        manholes[i + 1].flood_risk = risk;

        pipes.push(PipeSegment {
            id: format!("P-{}", i + 1),
            from_node: manholes[i].id.clone(),
            to_node: manholes[i + 1].id.clone(),
            length_m,
            diameter_mm,
            slope_pct,
            material,
            velocity_mps,
            flow_rate_cms: capacity_cms,
            fill_ratio,
            flood_risk: risk,
        });
    }

    let total_length_m = pipes.iter().map(|p| p.length_m).sum::<f64>();
    let total_cost: Lakhs = network_cost(&pipes, &manholes, &config.rates).into();
    let flood_risk_score =
        (pipes.iter().map(|p| p.flood_risk as f64).sum::<f64>() / pipes.len() as f64).round() as u32;
    let nbc_compliant = pipes.iter().all(|p| p.meets_nbc(standards));

    Ok(DrainageNetwork {
        manholes,
        pipes,
        catchment: catchment.clone(),
        peak_runoff_cms,
        total_length_m,
        total_cost_lakhs: total_cost.value(),
        flood_risk_score,
        nbc_compliant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catchment::SoilType;
    use crate::hydraulics::peak_runoff;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scenario() -> CatchmentParams {
        CatchmentParams::new(18.5, 0.65, 100.0, 1.2)
    }

    fn small_catchment() -> CatchmentParams {
        CatchmentParams::new(2.0, 0.5, 60.0, 1.0).with_soil(SoilType::Loam)
    }

    fn generate(c: &CatchmentParams, n: usize, seed: u64) -> DrainageNetwork {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_network(c, n, peak_runoff(c), &DesignConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_zero_pipes_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = generate_network(&scenario(), 0, 1.0, &DesignConfig::default(), &mut rng).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_topology() {
        for n in [1, 2, 8, 15] {
            let net = generate(&scenario(), n, 11);
            assert_eq!(net.manholes.len(), net.pipes.len() + 1);
            assert_eq!(net.pipes.len(), n);
            assert!(net.check_topology().is_ok());
            for pipe in &net.pipes {
                assert!(net.manhole(&pipe.from_node).is_some());
                assert!(net.manhole(&pipe.to_node).is_some());
            }
        }
    }

    #[test]
    fn test_roles_and_elevations() {
        let net = generate(&scenario(), 8, 3);
        assert_eq!(net.manholes[0].role, NodeRole::Inlet);
        assert_eq!(net.manholes[8].role, NodeRole::Outlet);
        assert!(net.manholes[1..8].iter().all(|m| m.role == NodeRole::Junction));
        for pair in net.manholes.windows(2) {
            assert!(pair[1].invert_elevation_m < pair[0].invert_elevation_m);
            assert!(pair[1].rim_elevation_m < pair[0].rim_elevation_m);
        }
        assert!(net.manholes.iter().all(|m| m.invert_elevation_m < m.rim_elevation_m));
    }

    #[test]
    fn test_segment_ranges() {
        let standards = DesignConfig::default().standards;
        for seed in 0..20 {
            let net = generate(&small_catchment(), 8, seed);
            for pipe in &net.pipes {
                assert!(pipe.length_m >= 30.0 && pipe.length_m < 80.0);
                assert!(pipe.slope_pct >= standards.min_slope_pct);
                assert!(pipe.slope_pct <= standards.max_slope_pct);
                assert!(standards.diameters_mm.contains(&pipe.diameter_mm));
                assert!(pipe.fill_ratio >= 0.0 && pipe.fill_ratio <= 0.79);
                assert!(pipe.flood_risk <= 100);
            }
        }
    }

    #[test]
    fn test_aggregates() {
        let net = generate(&small_catchment(), 6, 5);
        let length: f64 = net.pipes.iter().map(|p| p.length_m).sum();
        assert!((net.total_length_m - length).abs() < 1e-9);

        let mean_risk = net.pipes.iter().map(|p| p.flood_risk as f64).sum::<f64>() / 6.0;
        assert_eq!(net.flood_risk_score, mean_risk.round() as u32);

        assert!(net.total_cost_lakhs > 0.0);
        let rupees = network_cost(&net.pipes, &net.manholes, &DesignConfig::default().rates);
        assert!((rupees.value() / 100_000.0 - net.total_cost_lakhs).abs() < 1e-9);
    }

    #[test]
    fn test_compliance_flag_matches_pipes() {
        let standards = DesignConfig::default().standards;
        for seed in 0..10 {
            for c in [scenario(), small_catchment()] {
                let net = generate(&c, 8, seed);
                let expected = net.pipes.iter().all(|p| {
                    p.velocity_mps >= 0.6
                        && p.velocity_mps <= 3.0
                        && p.fill_ratio <= 0.8
                        && p.diameter_mm >= 150
                });
                assert_eq!(net.nbc_compliant, expected);
                assert_eq!(net.nbc_compliant, net.pipes.iter().all(|p| p.meets_nbc(&standards)));
            }
        }
    }

    #[test]
    fn test_large_catchment_degrades_to_largest_pipe() {
        // 3.34 m³/s at ~1.2 % exceeds every catalog size within the velocity band
        let net = generate(&scenario(), 8, 9);
        assert_eq!(net.pipes[0].diameter_mm, 1200);
        assert_eq!(net.pipes[0].fill_ratio, 0.79);
        assert!(!net.nbc_compliant);
    }

    #[test]
    fn test_risk_backfilled_onto_manholes() {
        let net = generate(&small_catchment(), 5, 2);
        // Segments run upstream to downstream, so each shared manhole keeps
        // the risk of the pipe leaving it; the outlet keeps the last pipe's
        for (i, pipe) in net.pipes.iter().enumerate() {
            assert_eq!(net.manholes[i].flood_risk, pipe.flood_risk);
        }
        let n = net.pipes.len();
        assert_eq!(net.manholes[n].flood_risk, net.pipes[n - 1].flood_risk);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate(&small_catchment(), 8, 42);
        let b = generate(&small_catchment(), 8, 42);
        assert_eq!(a, b);

        let c = generate(&small_catchment(), 8, 43);
        assert_ne!(a.total_length_m, c.total_length_m);
    }

    #[test]
    fn test_long_chain_keeps_flow_non_negative() {
        let net = generate(&small_catchment(), 30, 8);
        assert_eq!(net.pipes.len(), 30);
        assert!(net.pipes.iter().all(|p| p.fill_ratio >= 0.0));
    }
}
