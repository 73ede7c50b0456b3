// crates/nmpolicy-cli/src/main.rs
// ============================================================================
// Module: nmpolicy CLI Entry Point
// Description: Command dispatcher for policy state generation.
// Purpose: Load inputs from disk, run the engine, and print the result.
// Dependencies: clap, nmpolicy-config, nmpolicy-core, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! The `nmpolicy` binary wires files to the engine: it loads the engine
//! configuration, reads the policy, current state, and cache, runs state
//! generation, and writes the selected output to stdout. Diagnostics and
//! errors go to stderr. Any failure exits with status 1.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod logging;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use nmpolicy_config::ConfigError;
use nmpolicy_config::LimitsConfig;
use nmpolicy_config::LoadError;
use nmpolicy_config::LogLevel;
use nmpolicy_config::NmpolicyConfig;
use nmpolicy_config::load_cache;
use nmpolicy_config::load_policy;
use nmpolicy_config::load_state;
use nmpolicy_core::DocumentError;
use nmpolicy_core::EvalError;
use nmpolicy_core::GenerateError;
use nmpolicy_core::GeneratedState;
use nmpolicy_core::Node;
use nmpolicy_core::ParseError;
use nmpolicy_core::StateGenerator;
use nmpolicy_core::evaluate;
use nmpolicy_core::expression::parse_expression_with_limits;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "nmpolicy", version, about = "Resolve nmpolicy captures into a desired state")]
struct Cli {
    /// Engine configuration file (defaults to $NMPOLICY_CONFIG, then ./nmpolicy.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log verbosity: error, warn, info, debug, or trace.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
    /// Command to run.
    #[command(subcommand)]
    command: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the desired state and refreshed cache for a policy.
    Generate(GenerateCommand),
    /// Evaluate a single capture expression against a current state.
    Capture(CaptureCommand),
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
struct GenerateCommand {
    /// Policy file with `capture` and `desiredState`.
    #[arg(long, value_name = "PATH")]
    policy: PathBuf,
    /// Current state of the host; omitted means an empty state.
    #[arg(long, value_name = "PATH")]
    current_state: Option<PathBuf>,
    /// Cache produced by a previous run; omitted means no cache.
    #[arg(long, value_name = "PATH")]
    cache: Option<PathBuf>,
    /// Part of the generated state to print.
    #[arg(long, value_enum, default_value_t = OutputPart::Full)]
    output: OutputPart,
    /// Serialization format for structured output.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,
}

/// Arguments for `capture`.
#[derive(Args, Debug)]
struct CaptureCommand {
    /// Capture expression, e.g. `routes.running.destination=="0.0.0.0/0"`.
    #[arg(long)]
    expression: String,
    /// Current state to evaluate against.
    #[arg(long, value_name = "PATH")]
    current_state: PathBuf,
}

/// Part of a generated state written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputPart {
    /// Desired state, cache, and metadata.
    Full,
    /// Desired state only, as raw bytes.
    DesiredState,
    /// Cache only, to feed into the next run.
    Cache,
}

/// Structured output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// YAML document.
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
enum CliError {
    /// Engine configuration is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An input file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// State generation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// A capture expression is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A capture expression did not match the current state.
    #[error(transparent)]
    Evaluate(#[from] EvalError),
    /// The current state is not a valid document.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// Output could not be serialized.
    #[error("unable to render output: {0}")]
    Render(String),
    /// Output could not be written.
    #[error("unable to write {stream}: {message}")]
    Output {
        /// Stream being written.
        stream: &'static str,
        /// Underlying I/O error text.
        message: String,
    },
    /// The tracing subscriber could not be installed.
    #[error("unable to initialize logging: {0}")]
    Logging(String),
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Loads configuration, installs logging, and dispatches the command.
fn run(cli: Cli) -> CliResult<()> {
    let config = NmpolicyConfig::load(cli.config.as_deref())?;
    let level = cli.log_level.unwrap_or(config.logging.level);
    logging::init_tracing(level).map_err(CliError::Logging)?;
    if let Some(source) = &config.source {
        debug!(config = %source.display(), "loaded engine configuration");
    }

    let mut stdout = std::io::stdout().lock();
    execute(cli.command, &config, &mut stdout)?;
    stdout.flush().map_err(|err| output_error("stdout", &err))
}

/// Runs a command, writing its result to `out`.
fn execute(command: Commands, config: &NmpolicyConfig, out: &mut impl Write) -> CliResult<()> {
    let bytes = match command {
        Commands::Generate(command) => command_generate(&command, config)?,
        Commands::Capture(command) => command_capture(&command, config)?,
    };
    out.write_all(&bytes).map_err(|err| output_error("stdout", &err))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `generate` command and returns the rendered output.
fn command_generate(command: &GenerateCommand, config: &NmpolicyConfig) -> CliResult<Vec<u8>> {
    let limits = &config.limits;
    let spec = load_policy(&command.policy, limits)?;
    let current_state = load_optional(command.current_state.as_deref(), limits, load_state)?;
    let cache = load_optional(command.cache.as_deref(), limits, load_cache)?;
    debug!(
        captures = spec.captures.len(),
        cached = cache.len(),
        current_state_bytes = current_state.len(),
        "loaded generation inputs"
    );

    let generator = StateGenerator::new().with_config(config.generator_config());
    let generated = generator.generate(&spec, &current_state, &cache)?;
    render_generated(&generated, command.output, command.format)
}

/// Executes the `capture` command and returns the resolved document.
fn command_capture(command: &CaptureCommand, config: &NmpolicyConfig) -> CliResult<Vec<u8>> {
    let limits = config.generator_config().expression_limits;
    let expression = parse_expression_with_limits(&command.expression, &limits)?;
    let state = load_state(&command.current_state, &config.limits)?;
    let tree = Node::from_yaml_slice(state.as_bytes())?;
    let resolved = evaluate(&expression, &tree)?;
    Ok(resolved.to_yaml_bytes()?)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads an optional input, defaulting when no path was given.
fn load_optional<T: Default>(
    path: Option<&Path>,
    limits: &LimitsConfig,
    load: fn(&Path, &LimitsConfig) -> Result<T, LoadError>,
) -> CliResult<T> {
    match path {
        Some(path) => Ok(load(path, limits)?),
        None => Ok(T::default()),
    }
}

/// Renders the selected part of a generated state.
fn render_generated(
    generated: &GeneratedState,
    part: OutputPart,
    format: OutputFormat,
) -> CliResult<Vec<u8>> {
    match part {
        OutputPart::DesiredState => Ok(generated.desired_state.as_bytes().to_vec()),
        OutputPart::Full => render_value(generated, format),
        OutputPart::Cache => render_value(&generated.cache, format),
    }
}

/// Serializes a value in the requested format.
fn render_value<T: Serialize>(value: &T, format: OutputFormat) -> CliResult<Vec<u8>> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|err| CliError::Render(err.to_string())),
        OutputFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(value)
                .map_err(|err| CliError::Render(err.to_string()))?;
            bytes.push(b'\n');
            Ok(bytes)
        }
    }
}

/// Builds an output error for a stream.
fn output_error(stream: &'static str, error: &std::io::Error) -> CliError {
    CliError::Output {
        stream,
        message: error.to_string(),
    }
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(&mut stderr, "nmpolicy: {message}");
    ExitCode::FAILURE
}
