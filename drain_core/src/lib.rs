//! # drain_core - Stormwater Drainage Design Engine
//!
//! `drain_core` is the computational heart of Stormline. Given catchment
//! parameters it computes peak runoff, sizes a chain of pipe segments against
//! NBC hydraulic limits, searches for a cheaper network and evaluates the
//! result against a fixed battery of code checks. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over value types; configuration is passed by reference
//! - **JSON-First**: All data types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Reproducible**: Every stochastic step takes a caller-supplied RNG or seed
//!
//! ## Quick Start
//!
//! ```rust
//! use drain_core::catchment::CatchmentParams;
//! use drain_core::config::DesignConfig;
//! use drain_core::optimizer::{optimize_with, OptimizerSettings};
//! use drain_core::report::DrainageReport;
//!
//! let config = DesignConfig::default();
//! let catchment = CatchmentParams::new(5.0, 0.6, 80.0, 1.2);
//! let settings = OptimizerSettings { generations: 20, seed: Some(42), ..Default::default() };
//!
//! let result = optimize_with(&catchment, &config, settings).unwrap();
//! let report = DrainageReport::build(result, &config).unwrap();
//! assert_eq!(report.compliance.len(), 9);
//! ```
//!
//! ## Modules
//!
//! - [`catchment`] - Catchment inputs, soil and land-use classes
//! - [`rainfall`] - Reference design rainfall intensities
//! - [`hydraulics`] - Rational method, Manning flow, pipe sizing
//! - [`risk`] - Per-segment flood risk score
//! - [`network`] - Manholes, pipe segments and the network aggregate
//! - [`generator`] - Network generation
//! - [`cost`] - Construction cost estimation
//! - [`optimizer`] - Stochastic cost search
//! - [`compliance`] - Code compliance checks
//! - [`report`] - Design report bundle
//! - [`config`] - Design standards and rate tables
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod catchment;
pub mod compliance;
pub mod config;
pub mod cost;
pub mod errors;
pub mod generator;
pub mod hydraulics;
pub mod network;
pub mod optimizer;
pub mod rainfall;
pub mod report;
pub mod risk;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catchment::{CatchmentParams, LandUse, SoilType};
pub use compliance::{evaluate, ComplianceCheck, ComplianceSummary, Verdict};
pub use config::{DesignConfig, DesignStandards, RateTable};
pub use cost::CostBreakdown;
pub use errors::{DrainError, DrainResult};
pub use generator::generate_network;
pub use hydraulics::{peak_runoff, PipeMaterial};
pub use network::{DrainageNetwork, ManHole, PipeSegment};
pub use optimizer::{optimize, optimize_with, ConvergenceModel, OptimizationResult, Optimizer, OptimizerSettings};
pub use report::DrainageReport;
