//! Trace-driven compressed-cache simulator CLI.
//!
//! Parses a trace file and a replacement policy, either from flags/
//! positionals or via interactive stdin prompts when omitted, then runs the
//! simulation and writes per-access telemetry plus an end-of-run summary.

use clap::{ArgGroup, Parser};
use std::io::{self, Write as _};
use std::path::PathBuf;

use bdicache::io_utils::{sim_cli_error, simple_cli_error, CliError};
use bdicache::policy::ReplacementPolicy;
use bdicache::{seeds, trace, Cache, RuntimeConfig, Stats};

fn print_cli_error(err: &CliError) {
    eprintln!("{}", err.msg);
    let mut src = std::error::Error::source(err);
    while let Some(s) = src {
        eprintln!("Caused by: {}", s);
        src = s.source();
    }
}

fn main() {
    if let Err(e) = run() {
        print_cli_error(&e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let trace_path = cli
        .trace
        .or(cli.trace_pos)
        .map(Ok)
        .unwrap_or_else(|| prompt_path("Trace file: "))?;

    let policy_str = cli
        .policy
        .or(cli.policy_pos)
        .map(Ok)
        .unwrap_or_else(|| prompt_line("Policy [1=random 2=bestfit 3=lru 4=camp]: "))?;
    let policy: ReplacementPolicy = policy_str
        .parse()
        .map_err(|e: String| simple_cli_error(&e))?;

    let config = RuntimeConfig::new(trace_path, policy, &cli.seed_dir, cli.output_dir.clone(), cli.rng_seed);

    let seed_descriptors = seeds::load_seed_descriptors(&config.seed_paths)
        .map_err(|e| sim_cli_error("loading seed files", e))?;

    let mut cache = Cache::new(config.policy, config.rng_seed);
    let mut stats = Stats::new();
    let csv_path = config.output_csv_path();
    let mut telemetry = bdicache::telemetry::TelemetryWriter::create(&csv_path)
        .map_err(|e| sim_cli_error("creating telemetry output", e))?;

    let mut miss_rng: rand::rngs::StdRng = match config.rng_seed {
        Some(seed) => rand::SeedableRng::seed_from_u64(seed ^ 0x5EED),
        None => rand::SeedableRng::from_entropy(),
    };

    trace::run_trace(&config.trace_path, &mut cache, &seed_descriptors, &mut telemetry, &mut stats, &mut miss_rng)
        .map_err(|e| sim_cli_error("running trace", e))?;

    stats.report();

    if cli.json {
        let summary = serde_json::json!({
            "policy": config.policy.to_string(),
            "instructions": stats.instruction_count,
            "loads": stats.load_count,
            "stores": stats.store_count,
            "load_hits": stats.load_hit_count,
            "store_hits": stats.store_hit_count,
            "hit_rate": stats.hit_rate(),
            "csv_path": csv_path.display().to_string(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("json serialization error: {e}"),
        }
    }

    Ok(())
}

fn prompt_path(label: &str) -> Result<PathBuf, CliError> {
    prompt_line(label).map(PathBuf::from)
}

fn prompt_line(label: &str) -> Result<String, CliError> {
    print!("{label}");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| sim_cli_error("reading interactive input", bdicache::SimError::Io(e)))?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(simple_cli_error("no value entered"));
    }
    Ok(trimmed.to_string())
}

#[derive(Parser)]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("trace_src").args(["trace", "trace_pos"]),
))]
#[command(group(
    ArgGroup::new("policy_src").args(["policy", "policy_pos"]),
))]
struct Cli {
    /// Trace file path
    #[arg(short, long, value_name = "FILE")]
    trace: Option<PathBuf>,
    /// Trace file path (positional)
    #[arg(index = 1, value_name = "TRACE", conflicts_with = "trace")]
    trace_pos: Option<PathBuf>,
    /// Replacement policy: 1=random, 2=bestfit, 3=lru, 4=camp
    #[arg(short, long, value_name = "POLICY")]
    policy: Option<String>,
    /// Replacement policy (positional)
    #[arg(index = 2, value_name = "POLICY", conflicts_with = "policy")]
    policy_pos: Option<String>,
    /// Directory holding the five hex seed files
    #[arg(long, default_value = "testHex")]
    seed_dir: PathBuf,
    /// Directory to write the per-access telemetry CSV into
    #[arg(long, default_value = "testOutput")]
    output_dir: PathBuf,
    /// Emit a JSON summary after completion
    #[arg(long)]
    json: bool,
    /// Deterministic RNG seed (for RANDOM eviction and miss-sample draws)
    #[arg(long)]
    rng_seed: Option<u64>,
}
