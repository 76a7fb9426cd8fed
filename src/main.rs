use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use parkvisor::{Simulation, SimulationConfig, Subscribe};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "parkvisor",
    about = "Concurrent parking facility simulator",
    long_about = "Seeds a multi-floor parking facility and drives concurrent gates\n\
                  against it, then checks that no spot was lost or duplicated."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a timed gate simulation (park 60% / unpark 30% / search 10%)
    Simulate {
        /// Gates running at once
        #[arg(long, default_value_t = 10)]
        gates: usize,
        /// Floors in the facility
        #[arg(long, default_value_t = 8)]
        floors: usize,
        /// Columns per floor
        #[arg(long, default_value_t = 1000)]
        columns: usize,
        /// Rows per column
        #[arg(long, default_value_t = 1000)]
        rows: usize,
        /// Admission window (e.g. 15s, 500ms, 2m)
        #[arg(long, default_value = "15s", value_parser = parse_duration)]
        duration: Duration,
        /// Pause between seeding and the first gate
        #[arg(long, default_value = "5s", value_parser = parse_duration)]
        warmup: Duration,
        /// Maximum wait for in-flight gates after the window (0 = no limit)
        #[arg(long, default_value = "30s", value_parser = parse_duration)]
        grace: Duration,
        /// Seed for a reproducible layout and gate draws
        #[arg(long)]
        seed: Option<u64>,
        /// Only print run-level events and failures
        #[arg(long)]
        quiet: bool,
    },
}

/// Parses `500ms`, `15s`, `2m`, `1h`, or bare seconds.
fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let n: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration {raw:?}"))?;

    match unit {
        "ms" => Ok(Duration::from_millis(n)),
        "" | "s" => Ok(Duration::from_secs(n)),
        "m" => Ok(Duration::from_secs(n.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(n.saturating_mul(3600))),
        other => Err(format!("unknown duration unit {other:?} in {raw:?}")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            gates,
            floors,
            columns,
            rows,
            duration,
            warmup,
            grace,
            seed,
            quiet,
        } => {
            let cfg = SimulationConfig {
                floors,
                columns,
                rows,
                gates,
                duration,
                warmup,
                grace,
                seed,
                ..SimulationConfig::default()
            };
            simulate(cfg, quiet).await
        }
    }
}

async fn simulate(cfg: SimulationConfig, quiet: bool) -> ExitCode {
    let subs: Vec<Arc<dyn Subscribe>> = if quiet {
        vec![Arc::new(parkvisor::LogWriter::quiet())]
    } else {
        vec![Arc::new(parkvisor::LogWriter::new())]
    };

    println!(
        "seeding {}x{}x{} facility...",
        cfg.floors, cfg.columns, cfg.rows
    );
    let sim = match Simulation::builder(cfg).with_subscribers(subs).build() {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match sim.run().await {
        Ok(report) => {
            println!("RESULT:\n{report}");
            if report.is_consistent() {
                ExitCode::SUCCESS
            } else {
                eprintln!("error: spot accounting is inconsistent");
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("error [{}]: {}", e.as_label(), e.as_message());
            ExitCode::FAILURE
        }
    }
}
