//! REST Script command-line entry point.
//!
//! Runs one script file. Notes, responses and `curl` commands go to stdout;
//! log records and fatal diagnostics go to stderr.

use clap::error::ErrorKind;
use clap::Parser;
use log::{debug, LevelFilter};
use rest_script::config::{load_env_defaults, ScriptDefaults};
use rest_script::executor::{ExecutionConfig, ReqwestExecutor};
use rest_script::interpreter::{Interpreter, EXIT_FATAL, EXIT_SUCCESS, EXIT_USAGE};
use rest_script::resolver::ResolutionMode;
use std::io;
use std::path::PathBuf;
use std::process;

/// Script path that only asks for usage.
const HELP_MARKER: &str = "/help";

/// Drive and assert HTTP interactions from a script.
#[derive(Debug, Parser)]
#[command(name = "rest-script", version, about)]
struct Cli {
    /// Script file to run
    script: PathBuf,

    /// Print equivalent curl commands instead of performing calls
    #[arg(long)]
    curl: bool,

    /// Turn off every echo and progress note
    #[arg(long)]
    silent: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Fail on unresolved placeholders instead of substituting empty text
    #[arg(long)]
    strict: bool,
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Exit code for a command line clap refused to parse.
///
/// Asking for help or the version is not a failure.
fn exit_code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_USAGE,
    }
}

fn execution_config(defaults: Option<&ScriptDefaults>) -> ExecutionConfig {
    let mut config = ExecutionConfig::default();
    if let Some(timeout) = defaults.and_then(|defaults| defaults.timeout) {
        config.timeout_secs = timeout;
    }
    config
}

fn run(cli: Cli) -> i32 {
    let defaults = load_env_defaults();
    let config = execution_config(defaults.as_ref());
    debug!("execution config: {:?}", config);

    let mut interpreter = Interpreter::new(
        Box::new(ReqwestExecutor::new(config)),
        Box::new(io::stdout()),
    );
    if let Some(defaults) = &defaults {
        interpreter.apply_defaults(defaults);
    }

    if cli.curl {
        interpreter.enable_offline_mode();
    }
    if cli.silent {
        interpreter.silence();
    }
    if cli.strict {
        interpreter.set_resolution_mode(ResolutionMode::Strict);
    }

    match interpreter.run_file(&cli.script) {
        Ok(()) => EXIT_SUCCESS,
        Err(fatal) => {
            eprintln!("{}", fatal);
            EXIT_FATAL
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(exit_code_for(e.kind()));
        }
    };

    if cli.script.as_os_str() == HELP_MARKER {
        let _ = <Cli as clap::CommandFactory>::command().print_help();
        process::exit(EXIT_USAGE);
    }

    init_logging(cli.debug);
    process::exit(run(cli));
}
