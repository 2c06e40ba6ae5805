//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use scene_selector::core::config::Config;
use scene_selector::core::errors::ScnError;
use scene_selector::core::paths::absolutize;
use scene_selector::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};
use scene_selector::selection::discipline::SelectionDiscipline;
use scene_selector::selection::listing::DatasetListing;
use scene_selector::selection::manifest::SelectionManifest;
use scene_selector::selection::policy::SelectionPolicy;
use scene_selector::selection::report::{SelectionObserver, StderrReport};
use scene_selector::selection::sampling::SAMPLING_SEED;
use scene_selector::selection::selector::select_with;

/// Scene Selector: deterministic traffic-scenario selection.
#[derive(Debug, Parser)]
#[command(
    name = "scnsel",
    author,
    version,
    about = "Scene Selector - deterministic tfrecord scenario selection",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Select scenes and print their absolute paths.
    Select(SelectArgs),
    /// Summarize a dataset directory listing.
    Inspect(InspectArgs),
    /// View and validate configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct SelectArgs {
    /// Dataset directory (overrides scene.path).
    #[arg(long, value_name = "PATH")]
    path: Option<PathBuf>,
    /// Number of scenes to select (overrides scene.num_scenes).
    #[arg(short = 'n', long, value_name = "N")]
    num_scenes: Option<usize>,
    /// Selection discipline: first_n, random_n, pad_n, exact_n, k_unique_n.
    #[arg(short, long, value_name = "DISCIPLINE")]
    discipline: Option<SelectionDiscipline>,
    /// Distinct scenes for k_unique_n (overrides scene.k_unique_scenes).
    #[arg(short, long, value_name = "K")]
    k_unique: Option<usize>,
    /// Also write a JSON manifest of the selection to this file.
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Default)]
struct InspectArgs {
    /// Dataset directory (falls back to scene.path).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum ConfigCommand {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
    /// Load and validate the configuration.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<ScnError> for CliError {
    fn from(err: ScnError) -> Self {
        if err.is_internal() {
            Self::Internal(err.to_string())
        } else if err.is_retryable() {
            Self::Runtime(err.to_string())
        } else {
            Self::User(err.to_string())
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Select(args) => run_select(cli, args),
        Command::Inspect(args) => run_inspect(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn run_select(cli: &Cli, args: &SelectArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let policy = apply_select_overrides(config.policy(), args);

    let mut observers: Vec<Box<dyn SelectionObserver>> = Vec::new();
    if config.logging.stderr_report && !cli.quiet {
        observers.push(Box::new(StderrReport));
    }
    if config.logging.jsonl_enabled {
        let mut writer = JsonlWriter::open(JsonlConfig::from_config(&config));
        let mut loaded = LogEntry::new(EventType::ConfigLoaded, Severity::Info);
        loaded.config_hash = config.stable_hash().ok();
        loaded.details = Some(config.paths.config_file.display().to_string());
        writer.write_entry(&loaded);
        observers.push(Box::new(writer));
    }

    let selection = select_with(&policy, &mut observers)?;
    let report = &selection.report;

    if let Some(manifest_path) = &args.manifest {
        let manifest = SelectionManifest::new(&policy, &selection, config.stable_hash().ok());
        manifest.write_to(manifest_path)?;
    }

    match output_mode(cli) {
        OutputMode::Human => {
            let mut stdout = io::stdout().lock();
            for path in &selection.paths {
                writeln!(stdout, "{}", path.display())?;
            }
            if !cli.quiet
                && !policy.discipline.fixes_output_len()
                && report.selected < report.requested
            {
                eprintln!(
                    "{} only {} of {} requested scenes available in {}",
                    "warning:".yellow().bold(),
                    report.selected,
                    report.requested,
                    report.dataset_dir.display()
                );
            }
            if let Some(manifest_path) = &args.manifest
                && !cli.quiet
            {
                eprintln!(
                    "{} {}",
                    "manifest written:".green(),
                    manifest_path.display()
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "select",
                "discipline": policy.discipline,
                "dataset_dir": report.dataset_dir.to_string_lossy(),
                "requested": report.requested,
                "selected": report.selected,
                "unique": report.unique,
                "unique_ratio": report.unique_ratio(),
                "seed": policy.discipline.is_sampled().then_some(SAMPLING_SEED),
                "manifest": args.manifest.as_ref().map(|p| p.to_string_lossy()),
                "paths": selection
                    .paths
                    .iter()
                    .map(|p| p.to_string_lossy())
                    .collect::<Vec<_>>(),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn apply_select_overrides(mut policy: SelectionPolicy, args: &SelectArgs) -> SelectionPolicy {
    if let Some(path) = &args.path {
        policy.path.clone_from(path);
    }
    if let Some(n) = args.num_scenes {
        policy.num_scenes = n;
    }
    if let Some(discipline) = args.discipline {
        policy.discipline = discipline;
    }
    if let Some(k) = args.k_unique {
        policy.k_unique_scenes = Some(k);
    }
    policy
}

fn run_inspect(cli: &Cli, args: &InspectArgs) -> Result<(), CliError> {
    let dir = match &args.path {
        Some(path) => path.clone(),
        None => Config::load(cli.config.as_deref())?.scene.path,
    };
    let listing = DatasetListing::read(&dir)?;
    let others: Vec<String> = listing
        .non_scenarios()
        .map(|n| n.to_string_lossy().into_owned())
        .collect();

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Dataset: {}", absolutize(&dir).display());
            println!("  Entries:   {}", listing.len());
            println!("  Scenarios: {}", listing.scenario_count());
            println!("  Other:     {}", others.len());
            for name in others.iter().take(INSPECT_MAX_OTHERS) {
                println!("    {name}");
            }
            if others.len() > INSPECT_MAX_OTHERS {
                println!("    ... and {} more", others.len() - INSPECT_MAX_OTHERS);
            }
            if listing.scenario_count() == 0 {
                println!(
                    "  {}",
                    "no tfrecord scenarios found; is this the right folder?".red()
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "inspect",
                "path": absolutize(&dir).to_string_lossy(),
                "entries": listing.len(),
                "scenarios": listing.scenario_count(),
                "non_scenarios": others,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

const INSPECT_MAX_OTHERS: usize = 20;

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Runtime(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config show",
                        "config": serde_json::to_value(&config)?,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("Configuration is valid.");
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("Configuration is INVALID: {e}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "error_code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("SCN_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
