//! # Network Optimizer
//!
//! Stochastic search for a cheaper network over a fixed generation budget.
//! This is a restart-style hill climb, not a genetic algorithm: there is no
//! population, crossover or mutation. Each improving generation simply
//! generates a fresh network and keeps it.
//!
//! ## Convergence models
//!
//! - [`ConvergenceModel::Simulated`] (default): the per-generation cost is a
//!   synthetic exponential-decay curve,
//!
//!   ```text
//!   g = 0:  c = (Q_peak·800 + n·2.5)·(1 + ε)·e^(−g/15)
//!   g > 0:  c = c_best·(1 − 0.03·e^(−g/15) + ε),   ε ~ U[−0.025, 0.025]
//!   ```
//!
//!   floored at 0.5. When `c` undercuts the running best, a new network is
//!   generated and retained. The trace drives progress displays and is not
//!   the retained network's cost.
//! - [`ConvergenceModel::Actual`]: every generation builds a real network and
//!   the trace records its cost in lakhs. The retained network is the
//!   cheapest one seen.
//!
//! ## Stepping
//!
//! [`Optimizer`] is an iterator yielding one [`GenerationProgress`] per
//! generation, so a UI can render progress or stop early. [`Optimizer::finish`]
//! always yields a network, even after zero generations.
//!
//! ## Example
//!
//! ```rust
//! use drain_core::catchment::CatchmentParams;
//! use drain_core::config::DesignConfig;
//! use drain_core::optimizer::{Optimizer, OptimizerSettings};
//!
//! let catchment = CatchmentParams::new(3.0, 0.55, 70.0, 1.0);
//! let config = DesignConfig::default();
//! let settings = OptimizerSettings { generations: 20, seed: Some(1), ..Default::default() };
//!
//! let mut optimizer = Optimizer::new(&catchment, &config, settings).unwrap();
//! for progress in optimizer.by_ref() {
//!     let progress = progress.unwrap();
//!     if progress.percent_complete >= 50.0 {
//!         break; // caller-side cancellation
//!     }
//! }
//! let result = optimizer.finish().unwrap();
//! assert_eq!(result.generations_run, 10);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catchment::CatchmentParams;
use crate::config::DesignConfig;
use crate::cost::naive_cost_lakhs;
use crate::errors::{DrainError, DrainResult};
use crate::generator::{generate_network, DEFAULT_NUM_PIPES};
use crate::hydraulics::peak_runoff;
use crate::network::DrainageNetwork;

/// Default generation budget
pub const DEFAULT_GENERATIONS: usize = 50;

const RUNOFF_COST_FACTOR: f64 = 800.0;
const PIPE_COST_FACTOR: f64 = 2.5;
const DECAY_GENERATIONS: f64 = 15.0;
const STEP_IMPROVEMENT: f64 = 0.03;
const NOISE_AMPLITUDE: f64 = 0.025;
const MIN_TRACE_COST: f64 = 0.5;

/// How the per-generation cost trace is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConvergenceModel {
    /// Synthetic decay curve, decoupled from the retained network's cost
    #[default]
    Simulated,
    /// Actual cost of a network generated every generation
    Actual,
}

/// Optimizer run settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Pipe segments per network
    pub num_pipes: usize,
    /// Generation budget
    pub generations: usize,
    /// RNG seed; `None` draws one from the thread RNG
    pub seed: Option<u64>,
    pub convergence: ConvergenceModel,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        OptimizerSettings {
            num_pipes: DEFAULT_NUM_PIPES,
            generations: DEFAULT_GENERATIONS,
            seed: None,
            convergence: ConvergenceModel::default(),
        }
    }
}

/// Progress after one generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationProgress {
    /// Generation just completed (1-based)
    pub generation: usize,
    /// Generation budget
    pub total: usize,
    /// Cost recorded in the trace for this generation
    pub candidate_cost: f64,
    /// Running best trace cost
    pub best_cost: f64,
    /// A new network was retained this generation
    pub improved: bool,
    pub percent_complete: f64,
}

/// Outcome of an optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best network found
    pub network: DrainageNetwork,

    /// Saving against the naive estimate (%), never negative
    pub savings_pct: u32,

    /// Naive area/pipe-count estimate (₹ lakhs)
    pub naive_cost_lakhs: f64,

    /// Generations actually executed
    pub generations_run: usize,

    /// One cost value per executed generation
    pub convergence_data: Vec<f64>,

    pub convergence_model: ConvergenceModel,

    /// Seed that reproduces this run
    pub seed: u64,

    /// Advisory warnings about the catchment
    pub warnings: Vec<String>,

    /// Advisory design recommendations
    pub recommendations: Vec<String>,
}

/// Steppable optimizer.
pub struct Optimizer<'a> {
    catchment: &'a CatchmentParams,
    config: &'a DesignConfig,
    settings: OptimizerSettings,
    seed: u64,
    rng: ChaCha8Rng,
    peak_runoff_cms: f64,
    generation: usize,
    best_cost: Option<f64>,
    best_network: Option<DrainageNetwork>,
    convergence_data: Vec<f64>,
    failed: bool,
}

impl<'a> Optimizer<'a> {
    /// Prepare a run. Validates the catchment, the standards and the pipe count.
    pub fn new(catchment: &'a CatchmentParams, config: &'a DesignConfig, settings: OptimizerSettings) -> DrainResult<Self> {
        catchment.validate()?;
        config.standards.validate()?;
        if settings.num_pipes == 0 {
            return Err(DrainError::invalid_input(
                "num_pipes",
                "0",
                "At least one pipe segment is required",
            ));
        }

        let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
        tracing::info!(
            area_ha = catchment.area_ha,
            num_pipes = settings.num_pipes,
            generations = settings.generations,
            seed,
            "Starting drainage optimization"
        );

        Ok(Optimizer {
            catchment,
            config,
            settings,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            peak_runoff_cms: peak_runoff(catchment),
            generation: 0,
            best_cost: None,
            best_network: None,
            convergence_data: Vec::with_capacity(settings.generations),
            failed: false,
        })
    }

    /// Best network retained so far
    pub fn best_network(&self) -> Option<&DrainageNetwork> {
        self.best_network.as_ref()
    }

    fn generate(&mut self) -> DrainResult<DrainageNetwork> {
        generate_network(
            self.catchment,
            self.settings.num_pipes,
            self.peak_runoff_cms,
            self.config,
            &mut self.rng,
        )
    }

    fn simulated_candidate(&mut self, g: usize) -> f64 {
        let improvement = (-(g as f64) / DECAY_GENERATIONS).exp();
        let noise = self.rng.gen_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);
        let cost = match self.best_cost {
            None => {
                let estimate = self.peak_runoff_cms * RUNOFF_COST_FACTOR
                    + self.settings.num_pipes as f64 * PIPE_COST_FACTOR;
                estimate * (1.0 + noise) * improvement
            }
            Some(best) => best * (1.0 - improvement * STEP_IMPROVEMENT + noise),
        };
        cost.max(MIN_TRACE_COST)
    }

    /// Run one generation. Returns `Ok(None)` once the budget is spent.
    ///
    /// After an error the run is over: later calls return `Ok(None)`.
    pub fn step(&mut self) -> DrainResult<Option<GenerationProgress>> {
        if self.failed || self.generation >= self.settings.generations {
            return Ok(None);
        }
        match self.advance() {
            Ok(progress) => Ok(Some(progress)),
            Err(err) => {
                self.failed = true;
                tracing::warn!(generation = self.generation + 1, error = %err, "Optimization aborted");
                Err(err)
            }
        }
    }

    fn advance(&mut self) -> DrainResult<GenerationProgress> {
        let g = self.generation;

        let (candidate, improved) = match self.settings.convergence {
            ConvergenceModel::Simulated => {
                let candidate = self.simulated_candidate(g);
                let improved = self.best_cost.map_or(true, |best| candidate < best);
                if improved {
                    let network = self.generate()?;
                    self.best_network = Some(network);
                    self.best_cost = Some(candidate);
                }
                (candidate, improved)
            }
            ConvergenceModel::Actual => {
                let network = self.generate()?;
                let candidate = network.total_cost_lakhs.max(MIN_TRACE_COST);
                let improved = self.best_cost.map_or(true, |best| candidate < best);
                if improved {
                    self.best_network = Some(network);
                    self.best_cost = Some(candidate);
                }
                (candidate, improved)
            }
        };

        self.convergence_data.push(candidate);
        self.generation += 1;

        let best_cost = self.best_cost.unwrap_or(candidate);
        if improved {
            tracing::info!(generation = self.generation, cost = candidate, "Retained new best network");
        } else {
            tracing::debug!(generation = self.generation, cost = candidate, best_cost, "No improvement");
        }

        Ok(GenerationProgress {
            generation: self.generation,
            total: self.settings.generations,
            candidate_cost: candidate,
            best_cost,
            improved,
            percent_complete: self.generation as f64 / self.settings.generations as f64 * 100.0,
        })
    }

    /// Run the remaining generations.
    pub fn run_to_end(&mut self) -> DrainResult<()> {
        while self.step()?.is_some() {}
        Ok(())
    }

    /// Assemble the result from whatever has run so far.
    pub fn finish(mut self) -> DrainResult<OptimizationResult> {
        let network = match self.best_network.take() {
            Some(network) => network,
            None => self.generate()?,
        };

        let naive = naive_cost_lakhs(self.catchment.area_ha, self.settings.num_pipes, &self.config.rates);
        let savings_pct = savings_percent(naive, network.total_cost_lakhs);
        let warnings = catchment_warnings(self.catchment, self.config);
        let recommendations = recommendations(&network);

        tracing::info!(
            generations = self.generation,
            cost_lakhs = network.total_cost_lakhs,
            savings_pct,
            nbc_compliant = network.nbc_compliant,
            "Optimization finished"
        );

        Ok(OptimizationResult {
            network,
            savings_pct,
            naive_cost_lakhs: naive,
            generations_run: self.generation,
            convergence_data: self.convergence_data,
            convergence_model: self.settings.convergence,
            seed: self.seed,
            warnings,
            recommendations,
        })
    }
}

impl Iterator for Optimizer<'_> {
    type Item = DrainResult<GenerationProgress>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}

/// Run a full optimization with the simulated convergence model.
///
/// # Example
///
/// ```rust
/// use drain_core::catchment::CatchmentParams;
/// use drain_core::config::DesignConfig;
/// use drain_core::optimizer::optimize;
///
/// let catchment = CatchmentParams::new(18.5, 0.65, 100.0, 1.2);
/// let result = optimize(&catchment, 8, 30, &DesignConfig::default()).unwrap();
/// assert_eq!(result.convergence_data.len(), 30);
/// ```
pub fn optimize(
    catchment: &CatchmentParams,
    num_pipes: usize,
    generations: usize,
    config: &DesignConfig,
) -> DrainResult<OptimizationResult> {
    let settings = OptimizerSettings {
        num_pipes,
        generations,
        ..OptimizerSettings::default()
    };
    optimize_with(catchment, config, settings)
}

/// Run a full optimization with explicit settings.
pub fn optimize_with(
    catchment: &CatchmentParams,
    config: &DesignConfig,
    settings: OptimizerSettings,
) -> DrainResult<OptimizationResult> {
    let mut optimizer = Optimizer::new(catchment, config, settings)?;
    optimizer.run_to_end()?;
    optimizer.finish()
}

/// Percentage saving against the naive estimate, rounded and floored at zero
pub fn savings_percent(naive_cost: f64, actual_cost: f64) -> u32 {
    if naive_cost <= 0.0 {
        return 0;
    }
    ((naive_cost - actual_cost) / naive_cost * 100.0).round().max(0.0) as u32
}

/// Threshold warnings on the catchment inputs
pub fn catchment_warnings(catchment: &CatchmentParams, config: &DesignConfig) -> Vec<String> {
    let s = &config.standards;
    let mut warnings = Vec::new();

    if catchment.rainfall_intensity_mm_hr > s.warn_intensity_mm_hr {
        warnings.push(format!(
            "Rainfall intensity {:.0} mm/hr exceeds {:.0} mm/hr: provide detention storage or overflow routing",
            catchment.rainfall_intensity_mm_hr, s.warn_intensity_mm_hr
        ));
    }
    if catchment.runoff_coefficient > s.warn_runoff_coefficient {
        warnings.push(format!(
            "Runoff coefficient {:.2} is above {:.2}: consider permeable paving and green infrastructure",
            catchment.runoff_coefficient, s.warn_runoff_coefficient
        ));
    }
    if catchment.slope_pct < s.warn_min_slope_pct {
        warnings.push(format!(
            "Average slope {:.2}% is below {:.1}%: self-cleansing velocity is hard to achieve, plan for regular desilting",
            catchment.slope_pct, s.warn_min_slope_pct
        ));
    }

    warnings
}

fn recommendations(network: &DrainageNetwork) -> Vec<String> {
    let catchment = &network.catchment;
    let material = network
        .trunk_material()
        .map(|m| m.code())
        .unwrap_or("RCC");

    let mut out = vec![
        format!(
            "Use {} pipes for the trunk line, bedded to suit {} soil",
            material,
            catchment.soil_type.display_name().to_lowercase()
        ),
        format!(
            "Provide rainwater harvesting and recharge pits across the {:.1} ha catchment to reduce peak runoff",
            catchment.area_ha
        ),
        "Schedule pre-monsoon desilting of manholes and inlet gratings".to_string(),
    ];
    if !network.nbc_compliant {
        out.push("Some segments fall outside NBC limits: review slopes or split the catchment into parallel branches".to_string());
    }
    out
}
