//! Lockerbank command-line interface
//!
//! Builds a locker inventory from a configuration file and either reports its
//! size classes or plays a package workload against it.
//!
//! # Examples
//!
//! ```bash
//! # Show size classes, containment and capacities
//! lockerbank inspect --config lockers.toml
//!
//! # Deposit the configured packages and show where each one went
//! lockerbank plan --config lockers.toml --sequential-ids
//!
//! # Same, as JSON
//! lockerbank plan --config lockers.toml --json
//! ```

use clap::{Args, Parser, Subcommand};
use lockerbank::inventory::{Inventory, SequentialIds, SizeClassSnapshot};
use lockerbank::InventoryConfig;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Lockerbank - assign packages to the best-fitting locker size
#[derive(Parser, Debug)]
#[command(name = "lockerbank")]
#[command(version = lockerbank::VERSION)]
#[command(about = "Lockerbank - assign packages to the best-fitting locker size", long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Log directory path
    #[arg(long, global = true, default_value = "logs", env = "LOCKERBANK_LOG_DIR")]
    log_dir: PathBuf,

    /// Console log level for lockerbank events; `RUST_LOG` overrides it
    #[arg(
        long,
        global = true,
        default_value = "warn",
        env = "LOCKERBANK_LOG_LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deposit the configured packages and report each assignment
    Plan(PlanArgs),

    /// Show size classes, containment and capacities
    Inspect(InspectArgs),

    /// Show version
    Version,
}

/// Plan arguments
#[derive(Args, Debug)]
struct PlanArgs {
    /// Inventory configuration file (TOML, JSON or YAML)
    #[arg(short, long, env = "LOCKERBANK_CONFIG")]
    config: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Number lockers locker-1, locker-2, ... instead of random UUIDs
    #[arg(long)]
    sequential_ids: bool,
}

/// Inspect arguments
#[derive(Args, Debug)]
struct InspectArgs {
    /// Inventory configuration file (TOML, JSON or YAML)
    #[arg(short, long, env = "LOCKERBANK_CONFIG")]
    config: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Outcome of one deposit in a plan
#[derive(Debug, Serialize)]
struct Assignment {
    package: String,
    size: String,
    locker: Option<String>,
    size_class: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlanReport {
    assignments: Vec<Assignment>,
    size_classes: Vec<SizeClassSnapshot>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli)?;
    lockerbank::telemetry::describe();

    match cli.command {
        Commands::Plan(args) => plan_command(args),
        Commands::Inspect(args) => inspect_command(args),
        Commands::Version => {
            println!("lockerbank {}", lockerbank::VERSION);
            Ok(())
        }
    }
}

/// Setup logging: the console shows lockerbank events at `--log-level` and
/// other crates at warn, the daily log file keeps lockerbank debug output
fn setup_logging(cli: &Cli) -> anyhow::Result<()> {
    std::fs::create_dir_all(&cli.log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &cli.log_dir, "lockerbank.log");

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,lockerbank={}", cli.log_level)));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!cli.no_color)
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::new("lockerbank=debug")),
        )
        .init();

    Ok(())
}

fn build(cfg: &InventoryConfig, sequential_ids: bool) -> Inventory {
    if sequential_ids {
        cfg.build_inventory_with(&mut SequentialIds::default())
    } else {
        cfg.build_inventory()
    }
}

/// Plan command - deposit every configured package in order
fn plan_command(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = InventoryConfig::load(&args.config)?;
    let mut inventory = build(&cfg, args.sequential_ids);
    info!(
        packages = cfg.packages.len(),
        lockers = inventory.len(),
        "Running plan"
    );

    let mut assignments = Vec::with_capacity(cfg.packages.len());
    for package in cfg.packages() {
        let name = package.id.to_string();
        let size = package.size.to_string();
        match inventory.deposit(package) {
            Ok(locker_id) => {
                let size_class = inventory
                    .locker(&locker_id)
                    .and_then(|l| inventory.size_class(l.size_class))
                    .map(|c| c.size.to_string());
                assignments.push(Assignment {
                    package: name,
                    size,
                    locker: Some(locker_id.to_string()),
                    size_class,
                    error: None,
                });
            }
            Err(refused) => {
                warn!(package = %name, "{}", refused);
                assignments.push(Assignment {
                    package: name,
                    size,
                    locker: None,
                    size_class: None,
                    error: Some(refused.to_string()),
                });
            }
        }
    }

    let report = PlanReport {
        assignments,
        size_classes: inventory.snapshot(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Assignments ({})", report.assignments.len());
    println!("───────────────────────────────");
    for a in &report.assignments {
        match (&a.locker, &a.size_class, &a.error) {
            (Some(locker), Some(class), _) => {
                println!("  • {:<16} {:>12} → {} ({})", a.package, a.size, class, locker)
            }
            (_, _, Some(error)) => println!("  ✗ {:<16} {:>12}   {}", a.package, a.size, error),
            _ => println!("  ? {:<16} {:>12}", a.package, a.size),
        }
    }
    println!();
    print_classes(&report.size_classes);
    Ok(())
}

/// Inspect command - report size classes without depositing anything
fn inspect_command(args: InspectArgs) -> anyhow::Result<()> {
    let cfg = InventoryConfig::load(&args.config)?;
    let inventory = cfg.build_inventory();
    let snapshot = inventory.snapshot();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_classes(&snapshot);
    }
    Ok(())
}

fn print_classes(classes: &[SizeClassSnapshot]) {
    if classes.is_empty() {
        println!("No lockers configured.");
        return;
    }

    println!("Size classes ({})", classes.len());
    println!("───────────────────────────────");
    println!(
        "  {:<10} {:>12} {:>7} {:>7} {:>9}  contains",
        "class", "size", "total", "free", "virtual"
    );
    for c in classes {
        let contains: Vec<String> = c.contains.iter().map(|id| id.to_string()).collect();
        println!(
            "  {:<10} {:>12} {:>7} {:>7} {:>9}  {}",
            c.id.to_string(),
            c.size.to_string(),
            c.total_lockers,
            c.free_lockers,
            c.virtual_capacity,
            contains.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level_is_validated() {
        let cli = Cli::try_parse_from(["lockerbank", "--log-level", "debug", "version"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(Cli::try_parse_from(["lockerbank", "--log-level", "loud", "version"]).is_err());
    }

    #[test]
    fn test_plan_arguments() {
        let cli = Cli::try_parse_from([
            "lockerbank",
            "plan",
            "--config",
            "lockers.toml",
            "--json",
            "--sequential-ids",
        ])
        .unwrap();
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.config, PathBuf::from("lockers.toml"));
                assert!(args.json && args.sequential_ids);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
