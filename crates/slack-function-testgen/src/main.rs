// crates/slack-function-testgen/src/main.rs
// ============================================================================
// Module: Test Generator CLI
// Description: CLI entrypoint for Slack function test generation.
// Purpose: Write or verify `<callback_id>_test.ts` files from a catalog.
// Dependencies: clap, slack-function-testgen, slack-schema-types
// ============================================================================

//! ## Overview
//! The CLI reads a function catalog (`functions.json`), renders one test file
//! per record, and either writes the files or verifies that the files on disk
//! match. The `types` subcommand writes the custom type modules.
//!
//! ### Security Posture
//! Catalog contents and output paths are treated as untrusted. IO failures
//! and validation errors fail closed; no partial file is left in place.

use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use slack_function_testgen::FunctionCatalog;
use slack_function_testgen::GeneratorConfig;
use slack_function_testgen::TestGenError;
use slack_function_testgen::TestGenerator;
use slack_function_testgen::audit::FileGenerationSink;
use slack_function_testgen::audit::GenerationSink;
use slack_function_testgen::audit::NoopGenerationSink;
use slack_function_testgen::audit::OutputAction;
use slack_function_testgen::audit::OutputEvent;
use slack_function_testgen::audit::StderrGenerationSink;
use slack_schema_types::CUSTOM_TYPES;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Default catalog path.
const DEFAULT_CATALOG_PATH: &str = "src/schema/slack/functions/_scripts/functions.json";
/// Default directory for generated tests.
const DEFAULT_OUT_DIR: &str = "src/schema/slack/functions";
/// Default directory for custom type modules.
const DEFAULT_TYPES_DIR: &str = "src/schema/slack/types/custom";

/// CLI arguments for test generation.
#[derive(Debug, Parser)]
#[command(
    name = "slack-function-testgen",
    about = "Generate TypeScript tests for Slack functions."
)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Write one test file per catalog record.
    Generate(GenerateArgs),
    /// Verify test files on disk match the generated output.
    Check(GenerateArgs),
    /// Write custom type declaration modules.
    Types {
        /// Output directory for type modules.
        #[arg(long, value_name = "DIR", default_value = DEFAULT_TYPES_DIR)]
        out_dir: PathBuf,
    },
}

/// Arguments shared by `generate` and `check`.
#[derive(Debug, Args)]
struct GenerateArgs {
    /// Path to the function catalog.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CATALOG_PATH)]
    functions: PathBuf,
    /// Directory holding the generated test files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,
    /// Generator config file (TOML).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Audit log file for JSON-line events (`-` for stderr).
    #[arg(long, value_name = "FILE")]
    audit_log: Option<PathBuf>,
}

// ============================================================================
// SECTION: Command Dispatch
// ============================================================================

/// CLI entrypoint.
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

/// Dispatches the CLI command.
fn run() -> Result<(), TestGenError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Check(args) => check(&args),
        Command::Types {
            out_dir,
        } => write_types(&out_dir),
    }
}

/// Renders every catalog record and writes it under the output directory.
///
/// Nothing is written unless every record renders.
fn generate(args: &GenerateArgs) -> Result<(), TestGenError> {
    let (generator, sink, catalog) = prepare(args)?;
    let outputs = render_all(&generator, &catalog, &args.out_dir)?;
    for (path, source) in &outputs {
        write_output(path, source)?;
        sink.record_output(&OutputEvent::new(path, OutputAction::Written, source.len()));
    }
    Ok(())
}

/// Renders every record into `(output path, source)` pairs.
fn render_all(
    generator: &TestGenerator,
    catalog: &FunctionCatalog,
    out_dir: &Path,
) -> Result<Vec<(PathBuf, String)>, TestGenError> {
    catalog
        .records()
        .iter()
        .map(|record| Ok((out_dir.join(record.test_file_name()), generator.generate(record)?)))
        .collect()
}

/// Verifies every generated test file matches the rendered source.
///
/// All records are checked before drift is reported.
fn check(args: &GenerateArgs) -> Result<(), TestGenError> {
    let (generator, sink, catalog) = prepare(args)?;
    let outputs = render_all(&generator, &catalog, &args.out_dir)?;
    let mut drifted = Vec::new();
    for (path, source) in &outputs {
        let action = if output_matches(path, source)? {
            OutputAction::Unchanged
        } else {
            drifted.push(path.display().to_string());
            OutputAction::Drifted
        };
        sink.record_output(&OutputEvent::new(path, action, source.len()));
    }
    if drifted.is_empty() {
        return Ok(());
    }
    Err(TestGenError::OutputDrift(format!(
        "{} stale or missing: {}. Run slack-function-testgen generate.",
        drifted.len(),
        drifted.join(", ")
    )))
}

/// Writes each registered custom type module.
fn write_types(out_dir: &Path) -> Result<(), TestGenError> {
    for definition in CUSTOM_TYPES {
        let source = definition.render_typescript().map_err(|_| {
            TestGenError::Json(format!("cannot render custom type {}", definition.id))
        })?;
        write_output(&out_dir.join(definition.module_file_name()), &source)?;
    }
    Ok(())
}

/// Loads config, audit sink, and catalog for `generate` and `check`.
fn prepare(
    args: &GenerateArgs,
) -> Result<(TestGenerator, Arc<dyn GenerationSink>, FunctionCatalog), TestGenError> {
    let config = GeneratorConfig::load(args.config.as_deref())
        .map_err(|err| TestGenError::Config(err.to_string()))?;
    let sink = open_sink(args.audit_log.as_deref())?;
    let generator = TestGenerator::new(config.options()).with_sink(Arc::clone(&sink));
    let catalog = FunctionCatalog::load(&args.functions)?;
    Ok((generator, sink, catalog))
}

/// Opens the audit sink selected on the command line.
fn open_sink(path: Option<&Path>) -> Result<Arc<dyn GenerationSink>, TestGenError> {
    match path {
        None => Ok(Arc::new(NoopGenerationSink)),
        Some(path) if path == Path::new("-") => Ok(Arc::new(StderrGenerationSink)),
        Some(path) => {
            let sink = FileGenerationSink::new(path)
                .map_err(|err| TestGenError::Io(format!("{}: {err}", path.display())))?;
            Ok(Arc::new(sink))
        }
    }
}

/// Reports a CLI error to stderr.
fn report_error(err: &TestGenError) -> ExitCode {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "{err}");
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Maximum attempts to allocate a unique temporary file.
const TEMP_ATTEMPTS: usize = 16;
/// Per-process counter for temporary file names.
static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Writes the generated contents to the specified path.
///
/// Parent directories are created when missing. Contents go to a temporary
/// file that is then moved into place.
fn write_output(path: &Path, contents: &str) -> Result<(), TestGenError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| io_error(parent, &err))?;
    }
    let (temp_path, mut file) = create_temp_output(path)?;
    if let Err(err) = file.write_all(contents.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error(&temp_path, &err));
    }
    if let Err(err) = file.sync_all() {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error(&temp_path, &err));
    }
    persist_temp_output(&temp_path, path)
}

/// Returns true when the file at `path` holds exactly `contents`.
///
/// A missing file counts as drift.
fn output_matches(path: &Path, contents: &str) -> Result<bool, TestGenError> {
    match fs::read_to_string(path) {
        Ok(existing) => Ok(existing == contents),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(io_error(path, &err)),
    }
}

/// Creates a unique temporary output file alongside the destination.
fn create_temp_output(path: &Path) -> Result<(PathBuf, fs::File), TestGenError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| TestGenError::Io("output path does not include a file name".to_string()))?;
    for _ in 0 .. TEMP_ATTEMPTS {
        let attempt = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_name = format!(".{file_name}.tmp.{}.{}", std::process::id(), attempt);
        let temp_path = parent.join(temp_name);
        match OpenOptions::new().write(true).create_new(true).open(&temp_path) {
            Ok(file) => return Ok((temp_path, file)),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(err) => return Err(io_error(&temp_path, &err)),
        }
    }
    Err(TestGenError::Io("failed to allocate temporary output path".to_string()))
}

/// Persists the temporary output file to the final destination.
///
/// On platforms without atomic replace, this falls back to remove-and-rename.
fn persist_temp_output(temp_path: &Path, path: &Path) -> Result<(), TestGenError> {
    match fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            if path.exists() {
                fs::remove_file(path).map_err(|err| io_error(path, &err))?;
                fs::rename(temp_path, path).map_err(|err| io_error(path, &err))?;
                return Ok(());
            }
            let _ = fs::remove_file(temp_path);
            Err(io_error(path, &err))
        }
    }
}

/// Formats an IO failure with the path it concerns.
fn io_error(path: &Path, err: &std::io::Error) -> TestGenError {
    TestGenError::Io(format!("{}: {err}", path.display()))
}
