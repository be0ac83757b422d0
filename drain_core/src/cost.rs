//! # Cost Estimation
//!
//! Prices a network against a [`RateTable`]:
//!
//! ```text
//! per pipe     rate(d, material) × L
//!            + excavation_rate × L × trench_width × (d + clearance)
//!            + labour_rate × L
//! per manhole  fixed cost by depth class (rim − invert)
//! ```
//!
//! [`network_cost`] returns rupees; the generator stores the total in lakhs.
//! [`cost_breakdown`] itemises the same unit costs and shows backfill as a
//! fixed share of excavation, so its total is slightly higher than the
//! single-rate trench figure in [`network_cost`].

use serde::{Deserialize, Serialize};

use crate::config::RateTable;
use crate::hydraulics::PipeMaterial;
use crate::network::{DepthClass, DrainageNetwork, ManHole, PipeSegment};
use crate::units::{Lakhs, Meters, Millimeters, Rupees};

/// Per-metre supply and laying rate for a pipe (₹/m).
///
/// Takes the smallest rate-table key at or above the diameter. Diameters
/// beyond the table use the fallback rate.
pub fn pipe_rate_per_m(diameter_mm: u32, material: PipeMaterial, rates: &RateTable) -> f64 {
    let table = match material {
        PipeMaterial::Rcc => &rates.rcc_pipe_rates_per_m,
        _ => &rates.pipe_rates_per_m,
    };
    table
        .range(diameter_mm..)
        .next()
        .map(|(_, rate)| *rate)
        .unwrap_or(rates.fallback_pipe_rate_per_m)
}

/// Trench volume for a pipe run (m³)
pub fn trench_volume_m3(pipe: &PipeSegment, rates: &RateTable) -> f64 {
    let d: Meters = Millimeters(pipe.diameter_mm as f64).into();
    pipe.length_m * rates.trench_width_m * (d.value() + rates.trench_clearance_m)
}

/// Fixed cost of one manhole by depth class (₹)
pub fn manhole_cost(manhole: &ManHole, rates: &RateTable) -> f64 {
    match manhole.depth_class() {
        DepthClass::Shallow => rates.manhole_shallow,
        DepthClass::Medium => rates.manhole_medium,
        DepthClass::Deep => rates.manhole_deep,
    }
}

/// Total construction cost of pipes and manholes (₹).
pub fn network_cost(pipes: &[PipeSegment], manholes: &[ManHole], rates: &RateTable) -> Rupees {
    let pipe_cost: Rupees = pipes
        .iter()
        .map(|p| {
            let material = pipe_rate_per_m(p.diameter_mm, p.material, rates) * p.length_m;
            let trench = trench_volume_m3(p, rates) * rates.excavation_per_m3;
            let labor = rates.labor_per_m * p.length_m;
            Rupees(material + trench + labor)
        })
        .sum();

    let manhole_total: Rupees = manholes.iter().map(|m| Rupees(manhole_cost(m, rates))).sum();

    pipe_cost + manhole_total
}

/// Itemised cost (₹)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub pipe_material: f64,
    pub manholes: f64,
    pub excavation: f64,
    pub backfill: f64,
    pub labor: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Total in lakhs
    pub fn total_lakhs(&self) -> f64 {
        Lakhs::from(Rupees(self.total)).value()
    }

    /// Items as (label, ₹) pairs, in display order
    pub fn items(&self) -> [(&'static str, f64); 5] {
        [
            ("Pipe material", self.pipe_material),
            ("Manholes", self.manholes),
            ("Excavation", self.excavation),
            ("Backfill", self.backfill),
            ("Labour", self.labor),
        ]
    }
}

/// Itemise the cost of a network.
pub fn cost_breakdown(network: &DrainageNetwork, rates: &RateTable) -> CostBreakdown {
    let pipe_material = network
        .pipes
        .iter()
        .map(|p| pipe_rate_per_m(p.diameter_mm, p.material, rates) * p.length_m)
        .sum::<f64>();
    let manholes = network.manholes.iter().map(|m| manhole_cost(m, rates)).sum::<f64>();
    let excavation = network
        .pipes
        .iter()
        .map(|p| trench_volume_m3(p, rates) * rates.excavation_per_m3)
        .sum::<f64>();
    let backfill = excavation * rates.backfill_share;
    let labor = network.pipes.iter().map(|p| rates.labor_per_m * p.length_m).sum::<f64>();

    CostBreakdown {
        pipe_material,
        manholes,
        excavation,
        backfill,
        labor,
        total: pipe_material + manholes + excavation + backfill + labor,
    }
}

/// Naive planning estimate from area and pipe count (₹ lakhs)
pub fn naive_cost_lakhs(area_ha: f64, num_pipes: usize, rates: &RateTable) -> f64 {
    area_ha * rates.naive_lakhs_per_ha + num_pipes as f64 * rates.naive_lakhs_per_pipe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::sample_network;

    #[test]
    fn test_rate_lookup_exact_and_next_size() {
        let rates = RateTable::default();
        assert_eq!(pipe_rate_per_m(300, PipeMaterial::Pvc, &rates), 1200.0);
        assert_eq!(pipe_rate_per_m(300, PipeMaterial::Rcc, &rates), 1500.0);
        // 320 mm is not a key: priced as 375 mm
        assert_eq!(pipe_rate_per_m(320, PipeMaterial::Hdpe, &rates), 1650.0);
        // Beyond the table
        assert_eq!(pipe_rate_per_m(1400, PipeMaterial::Rcc, &rates), 12000.0);
    }

    #[test]
    fn test_trench_volume() {
        let rates = RateTable::default();
        let net = sample_network();
        // 40 m × 0.8 m × (0.3 + 0.6) m = 28.8 m³
        assert!((trench_volume_m3(&net.pipes[0], &rates) - 28.8).abs() < 1e-9);
    }

    #[test]
    fn test_network_cost_hand_check() {
        let rates = RateTable::default();
        let net = sample_network();
        // P-1: 1200×40 + 28.8×350 + 250×40 = 48000 + 10080 + 10000 = 68080
        // P-2: 3600×60 + 60×0.8×1.2×350 + 250×60 = 216000 + 20160 + 15000 = 251160
        // Manholes: depths 1.2, 1.45, 1.7 -> 25000 + 25000 + 45000 = 95000
        let total = network_cost(&net.pipes, &net.manholes, &rates);
        assert!((total.value() - 414_240.0).abs() < 1e-6);
    }

    #[test]
    fn test_breakdown_total_is_sum() {
        let rates = RateTable::default();
        let b = cost_breakdown(&sample_network(), &rates);
        let sum: f64 = b.items().iter().map(|(_, v)| v).sum();
        assert!((b.total - sum).abs() < 1e-6);
        assert!((b.backfill - 0.5 * b.excavation).abs() < 1e-9);
        assert!((b.total_lakhs() - b.total / 100_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_breakdown_matches_network_cost_without_backfill() {
        let rates = RateTable::default();
        let net = sample_network();
        let b = cost_breakdown(&net, &rates);
        let total = network_cost(&net.pipes, &net.manholes, &rates);
        assert!((b.total - b.backfill - total.value()).abs() < 1e-6);
    }

    #[test]
    fn test_naive_cost() {
        let rates = RateTable::default();
        // 18.5 × 3.0 + 8 × 0.8 = 61.9
        assert!((naive_cost_lakhs(18.5, 8, &rates) - 61.9).abs() < 1e-9);
    }
}
