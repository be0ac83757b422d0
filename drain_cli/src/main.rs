//! # Stormline CLI
//!
//! Designs a stormwater drainage network for one catchment from the
//! terminal and prints a text report, or the full JSON report with `--json`.
//!
//! ```text
//! drain_cli --area 18.5 --runoff 0.65 --intensity 100 --slope 1.2 --seed 7
//! drain_cli --area 6 --land-use commercial --city mumbai --return-period 10 --json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use drain_core::catchment::{CatchmentParams, LandUse, SoilType};
use drain_core::config::DesignConfig;
use drain_core::optimizer::{ConvergenceModel, Optimizer, OptimizerSettings};
use drain_core::rainfall::{design_intensity, ReturnPeriod, CITY_RAINFALL};
use drain_core::report::DrainageReport;

/// Stormwater drainage network design
#[derive(Parser)]
#[command(name = "drain_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Size and cost a stormwater drainage network", long_about = None)]
struct Cli {
    /// Catchment area [ha]
    #[arg(long)]
    area: f64,

    /// Runoff coefficient C (defaults to the land-use typical value)
    #[arg(long)]
    runoff: Option<f64>,

    /// Design rainfall intensity [mm/hr]
    #[arg(long, conflicts_with = "city")]
    intensity: Option<f64>,

    /// Take the intensity from the reference table for this city
    #[arg(long)]
    city: Option<String>,

    /// Return period for --city [years: 2, 5 or 10]
    #[arg(long, default_value = "5")]
    return_period: u32,

    /// Average ground slope [%]
    #[arg(long)]
    slope: f64,

    /// Soil type (clay, loam, sandy, rocky)
    #[arg(long, default_value = "clay")]
    soil: SoilType,

    /// Land use (residential, commercial, industrial, mixed)
    #[arg(long, default_value = "residential")]
    land_use: LandUse,

    /// Pipe segments in the trunk line
    #[arg(long, default_value = "8")]
    pipes: usize,

    /// Optimizer generations
    #[arg(long, default_value = "50")]
    generations: usize,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Convergence trace model
    #[arg(long, value_enum, default_value = "simulated")]
    convergence: ConvergenceArg,

    /// Design standards / rate table JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ConvergenceArg {
    Simulated,
    Actual,
}

impl From<ConvergenceArg> for ConvergenceModel {
    fn from(arg: ConvergenceArg) -> Self {
        match arg {
            ConvergenceArg::Simulated => ConvergenceModel::Simulated,
            ConvergenceArg::Actual => ConvergenceModel::Actual,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => DesignConfig::load(path)
            .with_context(|| format!("Failed to load design config from {}", path.display()))?,
        None => DesignConfig::default(),
    };

    let catchment = catchment_from_args(&cli)?;
    catchment.validate().context("Invalid catchment parameters")?;

    let settings = OptimizerSettings {
        num_pipes: cli.pipes,
        generations: cli.generations,
        seed: cli.seed,
        convergence: cli.convergence.into(),
    };

    let mut optimizer = Optimizer::new(&catchment, &config, settings)?;
    let mut last_decile = 0;
    for progress in optimizer.by_ref() {
        let progress = progress?;
        let decile = (progress.percent_complete / 10.0) as usize;
        if !cli.json && decile > last_decile {
            eprint!("\rOptimizing... {:>3.0}%", progress.percent_complete);
            last_decile = decile;
        }
    }
    if !cli.json && last_decile > 0 {
        eprintln!();
    }

    let result = optimizer.finish()?;
    let report = DrainageReport::build(result, &config)?;

    if cli.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn catchment_from_args(cli: &Cli) -> Result<CatchmentParams> {
    let intensity = match (cli.intensity, &cli.city) {
        (Some(intensity), _) => intensity,
        (None, Some(city)) => {
            let Some(period) = ReturnPeriod::from_years(cli.return_period) else {
                bail!("Return period must be 2, 5 or 10 years, got {}", cli.return_period);
            };
            match design_intensity(city, period) {
                Some(intensity) => intensity,
                None => {
                    let known: Vec<_> = CITY_RAINFALL.iter().map(|c| c.city).collect();
                    bail!("No rainfall reference for '{}'. Known cities: {}", city, known.join(", "));
                }
            }
        }
        (None, None) => bail!("Provide --intensity or --city"),
    };

    let catchment = CatchmentParams::new(cli.area, cli.runoff.unwrap_or_default(), intensity, cli.slope)
        .with_soil(cli.soil)
        .with_land_use(cli.land_use);

    Ok(match cli.runoff {
        Some(_) => catchment,
        None => catchment.with_land_use_default_runoff(),
    })
}

fn print_report(report: &DrainageReport) {
    let network = &report.result.network;
    let c = &report.catchment;

    println!("Stormline - Drainage Network Design");
    println!("===================================");
    println!();
    println!("Catchment: {:.2} ha, C = {:.2}, I = {:.0} mm/hr, slope {:.2}%", c.area_ha, c.runoff_coefficient, c.rainfall_intensity_mm_hr, c.slope_pct);
    println!("Soil: {} ({}), land use: {}", c.soil_type.display_name(), c.soil_type.infiltration_class().to_lowercase(), c.land_use.display_name());
    println!();

    println!("NETWORK");
    println!("  Peak runoff:     {:.3} m³/s", report.peak_runoff_cms);
    println!("  Pipes:           {}", network.pipe_count());
    println!("  Total length:    {:.1} m", network.total_length_m);
    println!("  Total cost:      ₹{:.2} lakhs", network.total_cost_lakhs);
    println!("  Naive estimate:  ₹{:.2} lakhs", report.result.naive_cost_lakhs);
    println!("  Savings:         {}%", report.result.savings_pct);
    println!("  Flood risk:      {} ({})", network.flood_risk_score, report.risk_band.as_str());
    println!("  NBC compliant:   {}", if network.nbc_compliant { "yes" } else { "no" });
    println!("  Seed:            {}", report.result.seed);
    println!();

    println!("PIPE SCHEDULE");
    println!("  {:<6} {:<6} {:<6} {:>7} {:>6} {:>6} {:<5} {:>6} {:>5} {:>5}", "ID", "From", "To", "L (m)", "D (mm)", "S (%)", "Mat", "V m/s", "Fill", "Risk");
    for row in report.pipe_schedule() {
        println!(
            "  {:<6} {:<6} {:<6} {:>7.1} {:>6} {:>6.2} {:<5} {:>6.2} {:>5.2} {:>5}",
            row.id, row.from_node, row.to_node, row.length_m, row.diameter_mm, row.slope_pct, row.material.code(), row.velocity_mps, row.fill_ratio, row.flood_risk
        );
    }
    println!();

    println!("PIPE QUANTITIES");
    for q in &report.material_quantities {
        println!("  {:<5} {:>8.1} m in {} segment(s)", q.material.code(), q.length_m, q.segments);
    }
    println!();

    println!("COST BREAKDOWN");
    for (label, amount) in report.cost_breakdown.items() {
        println!("  {:<15} ₹{:>12.0}", label, amount);
    }
    println!("  {:<15} ₹{:>12.0} ({:.2} lakhs)", "Total", report.cost_breakdown.total, report.cost_breakdown.total_lakhs());
    println!();

    println!("COMPLIANCE ({} pass, {} fail, {} warn)", report.summary.passed, report.summary.failed, report.summary.warnings);
    for check in &report.compliance {
        println!("  [{:<4}] {:<24} {:>16}  limit {:<12} {}", check.verdict.to_string(), check.name, check.observed, check.limit, check.clause);
    }

    if !report.result.warnings.is_empty() {
        println!();
        println!("WARNINGS");
        for w in &report.result.warnings {
            println!("  - {}", w);
        }
    }

    println!();
    println!("RECOMMENDATIONS");
    for r in &report.result.recommendations {
        println!("  - {}", r);
    }
}
