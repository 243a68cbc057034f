//! monkd - driver and REPL for the monk language.
//!
//! This is a thin `main` over [`session::Session`]: parse arguments, set up
//! logging, then either run a file once or loop reading lines from stdin,
//! feeding each chunk of source to the same session so state persists.

mod error;
mod session;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use error::{MonkdError, Result};
use monk_object::Object;
use session::{Engine, Session};

/// monkd - parse, macro-expand, and run monk programs.
#[derive(ClapParser, Debug)]
#[command(name = "monkd")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Driver and REPL for the monk language", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "MONKD_VERBOSE")]
    verbose: bool,

    /// Set PARSER_TRACE=true for this invocation.
    #[arg(long, global = true, env = "MONKD_TRACE_PARSER")]
    trace_parser: bool,

    /// Which pipeline runs the program: the tree-walking evaluator, or
    /// compile-and-run on the bytecode VM.
    #[arg(long, global = true, value_enum, default_value_t = Engine::Eval, env = "MONKD_ENGINE")]
    engine: Engine,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a source file once, printing the value of its final statement.
    Run(RunCommand),
    /// Start an interactive, line-at-a-time REPL.
    Repl,
}

#[derive(ClapParser, Debug)]
struct RunCommand {
    /// Path to a monk source file.
    file: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    if cli.trace_parser {
        std::env::set_var("PARSER_TRACE", "true");
    }

    let mut session = Session::new(cli.engine);

    match cli.command {
        Commands::Run(args) => run_file(&mut session, &args.file),
        Commands::Repl => run_repl(&mut session),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| MonkdError::Logging(e.to_string()))?;

    Ok(())
}

fn run_file(session: &mut Session, path: &std::path::Path) -> Result<()> {
    let source = std::fs::read_to_string(path).map_err(|source| MonkdError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;

    let mut stdout = io::stdout();
    let result = session.eval(&source, &mut stdout)?;
    if !matches!(result, Object::Null) {
        println!("{result}");
    }
    Ok(())
}

const PROMPT: &str = ">> ";

fn run_repl(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{PROMPT}").ok();
        stdout.flush().ok();

        let mut line = String::new();
        let bytes_read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|source| MonkdError::ReadFile {
                path: "<stdin>".to_string(),
                source,
            })?;
        if bytes_read == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match session.eval(&line, &mut stdout) {
            Ok(result) => {
                if !matches!(result, Object::Null) {
                    println!("{result}");
                }
            }
            Err(MonkdError::Parse(messages)) => {
                eprintln!("parser errors:");
                for message in messages.lines() {
                    eprintln!("\t{message}");
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_run_with_default_engine() {
        let cli = Cli::parse_from(["monkd", "run", "program.monk"]);
        assert_eq!(cli.engine, Engine::Eval);
        match cli.command {
            Commands::Run(args) => assert_eq!(args.file, PathBuf::from("program.monk")),
            Commands::Repl => panic!("expected Run"),
        }
    }

    #[test]
    fn cli_parses_vm_engine_flag() {
        let cli = Cli::parse_from(["monkd", "--engine", "vm", "run", "program.monk"]);
        assert_eq!(cli.engine, Engine::Vm);
    }

    #[test]
    fn cli_parses_repl_subcommand() {
        let cli = Cli::parse_from(["monkd", "repl"]);
        assert!(matches!(cli.command, Commands::Repl));
    }

    #[test]
    fn cli_parses_trace_parser_flag() {
        let cli = Cli::parse_from(["monkd", "--trace-parser", "repl"]);
        assert!(cli.trace_parser);
    }

    #[test]
    fn cli_parses_verbose_flag_after_subcommand_position() {
        let cli = Cli::parse_from(["monkd", "--verbose", "repl"]);
        assert!(cli.verbose);
    }
}
