//! `shdl` — a thin development harness for the library/flatten/analyze/sim
//! pipeline.
//!
//! This binary is deliberately small: it is not the textual front-end, the
//! debugger, or the native-ABI loader this pipeline's design document scopes
//! out. It exists so the core crates can be exercised end to end from the
//! command line — loading a JSON-described design, running it through
//! `shdl_library` → `shdl_flatten` → `shdl_analyze`, optionally writing a
//! debug-info sidecar, and driving the resulting `shdl_sim::Simulator`
//! through a scripted sequence of `poke`/`step`/`peek` calls.

mod config;
mod moduledef;
mod pipeline;
mod script;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use shdl_common::Interner;
use shdl_diagnostics::DiagnosticSink;

use config::ShdlConfig;
use moduledef::JsonModuleSource;

/// `shdl` — harness for the gate-level HDL compile and simulation pipeline.
#[derive(Parser, Debug)]
#[command(name = "shdl", version, about = "shdl compile/simulate harness")]
struct Cli {
    /// Path to a TOML configuration file (see `ShdlConfig`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve, flatten, and analyze a design; report diagnostics.
    Compile(CompileArgs),
    /// Compile a design, then drive it with a `poke`/`step`/`peek` script.
    Run(RunArgs),
}

/// Shared arguments for locating a design and its top-level component.
#[derive(Parser, Debug)]
struct DesignArgs {
    /// Directories searched for `<module>.json`, first match wins.
    #[arg(long = "search-path", num_args = 1..)]
    search_paths: Vec<PathBuf>,

    /// The root module name (its file is `<module>.json` on a search path).
    #[arg(long)]
    module: String,

    /// The top-level component name to flatten and analyze.
    #[arg(long)]
    top: String,
}

/// Arguments for the `compile` subcommand.
#[derive(Parser, Debug)]
struct CompileArgs {
    #[command(flatten)]
    design: DesignArgs,

    /// Where to write the debug-info sidecar JSON, if at all.
    #[arg(long)]
    debug_info: Option<PathBuf>,

    /// Diagnostic output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    design: DesignArgs,

    /// Path to a JSON step script (a top-level array of poke/step/peek ops).
    #[arg(long)]
    script: PathBuf,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// One line per diagnostic, rustc-flavored.
    Text,
    /// A JSON array of diagnostics.
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ShdlConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => ShdlConfig::default(),
    };

    match cli.command {
        Command::Compile(args) => run_compile(&args, &config),
        Command::Run(args) => run_run(&args, &config),
    }
}

fn run_compile(args: &CompileArgs, config: &ShdlConfig) -> ExitCode {
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    let analysis = compile_design(&args.design, config, &interner, &sink);

    report_diagnostics(&sink, args.format);

    let Some(analysis) = analysis else {
        return ExitCode::FAILURE;
    };
    if sink.has_errors() {
        return ExitCode::FAILURE;
    }

    if let Some(path) = &args.debug_info {
        let mut debug_info = shdl_debuginfo::DebugInfo::new();
        debug_info.record(&args.design.top, &analysis, &interner);
        if let Err(e) = debug_info.save(path) {
            eprintln!("error: writing debug info: {e}");
            return ExitCode::FAILURE;
        }
    }

    println!(
        "compiled `{}`: {} gates, {} inputs, {} outputs",
        args.design.top,
        analysis.netlist.gates.len(),
        analysis.netlist.inputs.len(),
        analysis.netlist.outputs.len(),
    );
    ExitCode::SUCCESS
}

fn run_run(args: &RunArgs, config: &ShdlConfig) -> ExitCode {
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    let analysis = compile_design(&args.design, config, &interner, &sink);
    report_diagnostics(&sink, ReportFormat::Text);

    let Some(analysis) = analysis else {
        return ExitCode::FAILURE;
    };
    if sink.has_errors() {
        return ExitCode::FAILURE;
    }

    let script_text = match std::fs::read_to_string(&args.script) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: reading {}: {e}", args.script.display());
            return ExitCode::FAILURE;
        }
    };
    let ops = match script::parse_script(&script_text) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("error: parsing {}: {e}", args.script.display());
            return ExitCode::FAILURE;
        }
    };

    let mut sim = shdl_sim::Simulator::new(&analysis, &interner, config.sim.clone());
    let results = script::run_script(&mut sim, &ops);
    for warning in sim.take_pending_warnings() {
        eprintln!("warning: {warning}");
    }

    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: serializing results: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn compile_design(
    design: &DesignArgs,
    config: &ShdlConfig,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<shdl_analyze::Analysis> {
    let mut search_paths = design.search_paths.clone();
    search_paths.extend(config.compile.search_paths.iter().map(PathBuf::from));

    let source = JsonModuleSource::new(search_paths, interner);
    let root_module = interner.get_or_intern(&design.module);
    let top = interner.get_or_intern(&design.top);

    pipeline::compile(&source, interner, sink, root_module, top, &config.compile, &config.analyze_config())
}

fn report_diagnostics(sink: &DiagnosticSink, format: ReportFormat) {
    let diagnostics = sink.diagnostics();
    match format {
        ReportFormat::Text => {
            for diag in &diagnostics {
                eprintln!("{}[{}]: {}", diag.severity, diag.code, diag.message);
                for note in &diag.notes {
                    eprintln!("   = note: {note}");
                }
            }
        }
        ReportFormat::Json => match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("error: serializing diagnostics: {e}"),
        },
    }
}
