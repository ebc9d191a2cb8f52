//! Operator console for the conflict detection engine.
//!
//! Runs a traffic scenario and reads commands from a script file or stdin.

use anyhow::{Context, Result};
use asas_cli::console::{self, Console, ConsoleCommand, USAGE};
use asas_cli::settings;
use asas_cli::sim::{Scenario, ScenarioKind, Simulation};
use asas_core::ConflictDetection;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to simulate
    #[arg(long, value_enum, default_value = "crossing")]
    scenario: ScenarioKind,

    /// Center latitude
    #[arg(long, default_value_t = 52.0)]
    lat: f64,

    /// Center longitude
    #[arg(long, default_value_t = 4.0)]
    lon: f64,

    /// Seed for the random scenario
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulation time step in seconds
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// CD method to select at start (OFF, ON, STATEBASED)
    #[arg(long)]
    method: Option<String>,

    /// Run this many ticks before reading commands
    #[arg(long, default_value_t = 0)]
    steps: usize,

    /// JSON settings file (overrides ASAS_* environment variables)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Read commands from a file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "asas_cli=info,asas_core=info".into()),
        )
        .init();

    let args = Args::parse();
    let settings = settings::load(args.settings.as_deref())?;
    tracing::info!(?settings, "Starting ASAS console");

    let scenario = Scenario::build(args.scenario, args.lat, args.lon, args.seed);
    println!("Scenario '{}' with {} aircraft", scenario.name, scenario.len());
    let mut session = Console::new(
        ConflictDetection::new(settings),
        Simulation::new(scenario, args.dt),
    );

    if let Some(method) = args.method {
        let select = ConsoleCommand::CdMethod(Some(method.to_ascii_uppercase()));
        print_lines(&session.execute(select)?);
    }
    if args.steps > 0 {
        print_lines(&session.execute(ConsoleCommand::Step(args.steps))?);
    }

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let command = match console::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}\n{USAGE}");
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        match session.execute(command) {
            Ok(lines) => print_lines(&lines),
            Err(e) => eprintln!("{e:#}"),
        }
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
