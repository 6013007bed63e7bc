//! # Takeoff CLI Application
//!
//! Terminal front end for concrete and rebar takeoffs.
//!
//! - `takeoff session` (the default): interactive form loop
//! - `takeoff calc --input spec.json`: one component, record printed as JSON
//! - `takeoff batch --input specs.json`: a list of components into a ledger
//! - `takeoff rates`: the active rate table
//! - `takeoff init-config`: write a starter config file
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

mod display;
mod prompt;
mod session;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use takeoff_core::calculations::{calculate, ComponentSpec, JobInfo};
use takeoff_core::config::TakeoffConfig;
use takeoff_core::errors::{CalcError, CalcResult};
use takeoff_core::file_io::{export_csv, save_ledger_json};
use takeoff_core::ledger::ProjectLedger;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::prompt::Prompter;

const DEFAULT_LOG_FILTER: &str = "warn,takeoff_core=info";

#[derive(Parser, Debug)]
#[command(name = "takeoff", version, about = "Concrete & rebar takeoff estimator")]
struct Cli {
    /// TOML config file (defaults and rate overrides)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive takeoff session
    Session(LedgerArgs),
    /// Calculate one component spec (JSON file, or - for stdin)
    Calc {
        #[arg(long)]
        input: PathBuf,
    },
    /// Calculate a JSON array of component specs into a ledger
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        ledger: LedgerArgs,
    },
    /// Print the active rate table
    Rates,
    /// Write a starter config file
    InitConfig {
        /// Destination (defaults to the platform config location)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
struct LedgerArgs {
    /// Project name (overrides config)
    #[arg(long)]
    project: Option<String>,
    /// Estimator name (overrides config)
    #[arg(long)]
    estimator: Option<String>,
    /// Export the dataset as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Save a JSON snapshot of the dataset
    #[arg(long)]
    json: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let config = TakeoffConfig::resolve(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Session(LedgerArgs::default())) {
        Commands::Session(args) => run_session(&config, &args),
        Commands::Calc { input } => {
            let text = read_input(&input)?;
            let spec = config.spec_from_json(serde_json::from_str(&text)?)?;
            let job = JobInfo::new(&config.defaults.project_name, &config.defaults.estimator_name);
            let record = calculate(&job, &spec, &config.rates)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Commands::Batch { input, ledger: args } => {
            let text = read_input(&input)?;
            let specs = parse_batch(&text, &config)?;
            let ledger = run_batch(&config, &args, &specs)?;
            let mut stdout = io::stdout().lock();
            display::write_summary(&mut stdout, ledger.records(), &ledger.summary())
                .map_err(|e| CalcError::file_error("write", "stdout", e.to_string()))?;
            export(&ledger, &args)
        }
        Commands::Rates => {
            let mut stdout = io::stdout().lock();
            display::write_rates(&mut stdout, &config.rates)
                .map_err(|e| CalcError::file_error("write", "stdout", e.to_string()))
        }
        Commands::InitConfig { path, force } => {
            let path = path
                .or_else(TakeoffConfig::default_path)
                .ok_or_else(|| CalcError::config("No platform config directory; pass --path"))?;
            write_starter_config(&config, &path, force)
        }
    }
}

fn run_session(config: &TakeoffConfig, args: &LedgerArgs) -> CalcResult<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let io_err = |e: io::Error| CalcError::file_error("read", "stdin", e.to_string());
    let mut args_filled = args.clone();
    if args_filled.project.is_none() {
        let default = config.defaults.project_name.clone();
        args_filled.project = Some(prompter.text("Project name", &default).map_err(io_err)?);
    }
    if args_filled.estimator.is_none() {
        let default = config.defaults.estimator_name.clone();
        args_filled.estimator = Some(prompter.text("Estimator name", &default).map_err(io_err)?);
    }

    let mut ledger = new_ledger(config, &args_filled);
    session::run(&mut prompter, &mut ledger, &config.defaults, &config.rates).map_err(io_err)?;

    if !ledger.is_empty() {
        display::write_summary(prompter.out(), ledger.records(), &ledger.summary())
            .map_err(|e| CalcError::file_error("write", "stdout", e.to_string()))?;
    }
    export(&ledger, &args_filled)
}

fn new_ledger(config: &TakeoffConfig, args: &LedgerArgs) -> ProjectLedger {
    let project = args.project.clone().unwrap_or_else(|| config.defaults.project_name.clone());
    let estimator = args.estimator.clone().unwrap_or_else(|| config.defaults.estimator_name.clone());
    ProjectLedger::new(project, estimator)
}

fn export(ledger: &ProjectLedger, args: &LedgerArgs) -> CalcResult<()> {
    if let Some(path) = &args.csv {
        export_csv(ledger, path)?;
        println!("CSV written to {}", path.display());
    }
    if let Some(path) = &args.json {
        save_ledger_json(ledger, path)?;
        println!("JSON written to {}", path.display());
    }
    Ok(())
}

/// Read a file, or stdin when the path is `-`
fn read_input(path: &Path) -> CalcResult<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CalcError::file_error("read", "stdin", e.to_string()))?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Batch files hold a JSON array of specs; omitted fields come from config
fn parse_batch(text: &str, config: &TakeoffConfig) -> CalcResult<Vec<ComponentSpec>> {
    let items: Vec<serde_json::Value> = serde_json::from_str(text)?;
    if items.is_empty() {
        return Err(CalcError::missing_field("specs"));
    }
    items.into_iter().map(|item| config.spec_from_json(item)).collect()
}

fn run_batch(config: &TakeoffConfig, args: &LedgerArgs, specs: &[ComponentSpec]) -> CalcResult<ProjectLedger> {
    let mut ledger = new_ledger(config, args);
    for spec in specs {
        let record = calculate(ledger.job(), spec, &config.rates)?;
        ledger.add(record);
    }
    Ok(ledger)
}

fn write_starter_config(config: &TakeoffConfig, path: &Path, force: bool) -> CalcResult<()> {
    if path.exists() && !force {
        return Err(CalcError::file_error(
            "write config",
            path.display().to_string(),
            "File exists (use --force to replace)",
        ));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CalcError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
    }
    fs::write(path, config.to_toml_string()?)
        .map_err(|e| CalcError::file_error("write config", path.display().to_string(), e.to_string()))?;
    info!(path = %path.display(), "wrote starter config");
    println!("Config written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::env::temp_dir;
    use takeoff_core::calculations::ComponentType;
    use takeoff_core::rates::ConcreteZone;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_session() {
        let cli = Cli::try_parse_from(["takeoff"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_batch_args() {
        let cli = Cli::try_parse_from([
            "takeoff", "--config", "c.toml", "batch", "--input", "specs.json", "--csv", "out.csv",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        match cli.command {
            Some(Commands::Batch { input, ledger }) => {
                assert_eq!(input, PathBuf::from("specs.json"));
                assert_eq!(ledger.csv, Some(PathBuf::from("out.csv")));
                assert!(ledger.json.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    const WALL_AND_DRAIN: &str = r#"[
        {"component": "Foundation Wall", "label": "W-1", "length_ft": 10, "height_ft": 8, "thickness_in": 8},
        {"component": "French Drain", "length_ft": 100}
    ]"#;

    #[test]
    fn test_parse_batch() {
        let specs = parse_batch(WALL_AND_DRAIN, &TakeoffConfig::default()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].component, ComponentType::FoundationWall);
        assert_eq!(specs[1].quantity, 1);
        assert!(specs[1].include_overage);
    }

    #[test]
    fn test_parse_batch_rejects_empty_and_malformed() {
        let config = TakeoffConfig::default();
        assert_eq!(parse_batch("[]", &config).unwrap_err().error_code(), "MISSING_FIELD");
        assert!(parse_batch("{not json", &config).is_err());
        assert_eq!(
            parse_batch(r#"[{"length_ft": 10}]"#, &config).unwrap_err().error_code(),
            "MISSING_FIELD"
        );
    }

    #[test]
    fn test_batch_uses_config_defaults() {
        let config = TakeoffConfig::from_toml_str(
            r#"
            [defaults]
            project_name = "Smith Residence"
            concrete_zone = "Zone 4"
            markup_pct = 40.0
            "#,
        )
        .unwrap();
        let specs = parse_batch(WALL_AND_DRAIN, &config).unwrap();
        let ledger = run_batch(&config, &LedgerArgs::default(), &specs).unwrap();

        let wall = &ledger.records()[0];
        assert_eq!(wall.project_name, "Smith Residence");
        assert_eq!(wall.markup_pct, 40.0);
        assert_eq!(wall.concrete_zone, ConcreteZone::Zone4);
        assert!((wall.concrete_cost - wall.concrete_cy * 215.0).abs() < 1e-9);
        assert!((wall.sale_price - wall.total_cost * 1.40).abs() < 1e-9);

        let drain = &ledger.records()[1];
        assert!((drain.sale_price - drain.total_cost * 1.40).abs() < 1e-9);
    }

    #[test]
    fn test_starter_config_refuses_overwrite() {
        let path = temp_dir().join("takeoff_cli_starter_config.toml");
        let config = TakeoffConfig::default();
        write_starter_config(&config, &path, true).unwrap();
        assert!(write_starter_config(&config, &path, false).is_err());
        let loaded = TakeoffConfig::load_from(&path).unwrap();
        assert_eq!(loaded.rates, config.rates);
        let _ = fs::remove_file(&path);
    }
}
