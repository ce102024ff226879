//! u-staffing CLI entry point.
//!
//! Solves staffing instances from JSON parameter files, generates random
//! instances, and runs the built-in reference scenario.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use u_staffing::formulation::StaffingModelBuilder;
use u_staffing::generator::ParameterGenerator;
use u_staffing::milp::{GoodLpSolver, SolverConfig};
use u_staffing::models::StaffingParams;
use u_staffing::report::{ConsoleSink, JsonSink, ResultSink};

/// Minimum-headcount staffing of workers to processes.
#[derive(Parser)]
#[command(name = "u-staffing")]
#[command(about = "Assign workers to processes with the fewest active workers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance read from a JSON parameter file.
    Solve(SolveArgs),

    /// Write a random instance as JSON.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Solve the built-in 3-process, 7-worker scenario.
    Demo(OutputArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Parameter file.
    #[arg(short, long)]
    params: PathBuf,

    /// Override `max_minutes_per_day` from the file.
    #[arg(long)]
    max_minutes: Option<i64>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Print a JSON response instead of tables.
    #[arg(long)]
    json: bool,

    /// Give up on the solver after this many seconds.
    #[arg(long)]
    time_limit_secs: Option<u64>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of processes.
    #[arg(long, default_value_t = 3)]
    processes: usize,

    /// Number of workers.
    #[arg(long, default_value_t = 7)]
    workers: usize,

    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Probability that a worker has any given skill.
    #[arg(long, default_value_t = 0.3)]
    skill_probability: f64,

    /// Output file (stdout if omitted).
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    match cli.command {
        Commands::Solve(args) => {
            let mut params = StaffingParams::load(&args.params)
                .with_context(|| format!("failed to read {}", args.params.display()))?;
            if let Some(minutes) = args.max_minutes {
                params = params.with_max_minutes_per_day(minutes);
            }
            run(&params, &args.output)
        }
        Commands::Generate(args) => generate(&args),
        Commands::Demo(output) => run(&StaffingParams::reference(), &output),
    }
}

fn run(params: &StaffingParams, output: &OutputArgs) -> anyhow::Result<()> {
    let mut config = SolverConfig::default();
    if let Some(secs) = output.time_limit_secs {
        config = config.with_time_limit(Duration::from_secs(secs));
    }

    info!(
        processes = params.num_processes,
        workers = params.num_workers,
        required_minutes = params.total_required_minutes(),
        "solving staffing instance"
    );
    let result = StaffingModelBuilder::new(params).solve(&GoodLpSolver::new(), &config);

    match &result {
        Ok(plan) => {
            info!(active = plan.active_count(), "optimal plan found");
            for v in plan.violations(params) {
                warn!(entity = %v.entity_id, kind = ?v.violation_type, "{}", v.message);
            }
        }
        Err(e) => warn!(error = %e, "no plan"),
    }

    if output.json {
        JsonSink::stdout().report(params, &result)?;
    } else {
        ConsoleSink::stdout().report(params, &result)?;
    }

    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_input_error() => std::process::exit(2),
        Err(_) => std::process::exit(1),
    }
}

fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let mut generator = ParameterGenerator::default()
        .with_counts(args.processes, args.workers)
        .with_skill_probability(args.skill_probability);
    if let Some(seed) = args.seed {
        generator = generator.with_seed(seed);
    }
    let params = generator.generate();

    match &args.out {
        Some(path) => {
            params
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote instance");
        }
        None => println!("{}", params.to_json()?),
    }
    Ok(())
}
