//! `surfmeasure` command-line entrypoint.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use log::{debug, error};

use surfmeasure::{AscError, Config, ImportOutcome, Scene, import_files, merge_labels};

/// Import surfaces with per-vertex measurements and merge region labels.
#[derive(Parser, Debug)]
#[command(name = "surfmeasure", version, about)]
struct CliArgs {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Log verbosity level, falls back to the config's `log_level`
    /// and then `RUST_LOG`.
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a v1/v2 region label column to a surface file.
    MergeLabels {
        /// The `*_surf.asc` file.
        surface: PathBuf,
        /// Label file of the v1 region.
        v1: PathBuf,
        /// Label file of the v2 region.
        v2: PathBuf,
    },
    /// Import a surface and a triangle file and print what was built.
    Import {
        /// Exactly one `*surf.asc` and one `*tri.asc` file, in any order.
        #[arg(num_args = 1..)]
        files: Vec<PathBuf>,
        /// Name of the created object.
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// The flag wins over the config file, which wins over `RUST_LOG`.
fn resolve_log_level(
    flag: Option<LogLevel>,
    config: Option<&str>,
    env: Option<String>,
) -> String {
    if let Some(level) = flag {
        return level.as_str().to_string();
    }

    if let Some(level) = config.filter(|level| !level.trim().is_empty()) {
        return level.to_string();
    }

    if let Some(level) = env.filter(|level| !level.trim().is_empty()) {
        return level;
    }

    "info".to_string()
}

fn init_logger(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(log::LevelFilter::Info);
    builder.parse_filters(level);

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::from_path(path)?),
        None => Ok(Config::default()),
    }
}

/// Exit code 1 for an unusable config, 2 for anything that failed while
/// reading, merging or importing. A cancelled import also exits with 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AscError>() {
        Some(AscError::Config { .. }) => 1,
        _ => 2,
    }
}

fn run_merge(config: &Config, surface: &Path, v1: &Path, v2: &Path) -> Result<()> {
    let output = merge_labels(surface, v1, v2, &config.merge)
        .with_context(|| format!("merging labels into {}", surface.display()))?;
    println!("{}", output.display());
    Ok(())
}

/// Returns false when the import was cancelled.
fn run_import(config: &Config, files: &[PathBuf], name: Option<String>) -> Result<bool> {
    let mut options = config.import.clone();
    if let Some(name) = name {
        options.object_name = name;
    }

    let mut scene = Scene::new();
    let summary = match import_files(files, &mut scene, &options)? {
        ImportOutcome::Finished(summary) => summary,
        ImportOutcome::Cancelled(reason) => {
            error!("import cancelled: {reason}");
            return Ok(false);
        }
    };

    let node = scene
        .active_node()
        .context("the imported object is not active")?;
    let mesh = scene
        .active_mesh()
        .context("the imported object has no mesh")?;
    debug!("total face area {:.6}", mesh.area());

    println!("object:     {}", node.name);
    println!("vertices:   {}", summary.vertices);
    println!("faces:      {}", summary.faces);
    if summary.attributes.is_empty() {
        println!("attributes: none");
    } else {
        println!("attributes: {}", summary.attributes.iter().join(", "));
    }
    if let Ok((lower, upper)) = mesh.bounds() {
        println!(
            "bounds:     [{:.4}, {:.4}, {:.4}] .. [{:.4}, {:.4}, {:.4}]",
            lower.x, lower.y, lower.z, upper.x, upper.y, upper.z
        );
    }
    Ok(true)
}

fn run(config: &Config, command: Command) -> Result<ExitCode> {
    match command {
        Command::MergeLabels { surface, v1, v2 } => {
            run_merge(config, &surface, &v1, &v2)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Import { files, name } => {
            if run_import(config, &files, name)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    let rust_log = std::env::var("RUST_LOG").ok();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            init_logger(&resolve_log_level(cli.log_level, None, rust_log));
            error!("{err:#}");
            return ExitCode::from(exit_code(&err));
        }
    };
    init_logger(&resolve_log_level(
        cli.log_level,
        config.log_level.as_deref(),
        rust_log,
    ));

    match run(&config, cli.command) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
