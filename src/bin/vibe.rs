//! Vibescript interpreter command-line.
//!
//! When called without script it drops into an interactive read-evaluate-print loop.
//!
//! When called with files, it interprets them in a single interpreter session (so code and data
//! sharing is possible).

use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::PathBuf;

use anyhow::{self, Context};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use vibescript::interpreter::Interpreter;
use vibescript::scanner;
use vibescript::value::Value;

/// Interpreter for a small language with closures and object literals.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Scripts evaluated in order in the same session.
    files: Vec<PathBuf>,

    /// Evaluate SOURCE instead of files.
    #[arg(short, long, value_name = "SOURCE", conflicts_with = "files")]
    eval: Option<String>,

    /// Print the final value as JSON.
    #[arg(long)]
    json: bool,

    /// Print the final value.
    #[arg(long)]
    print_result: bool,

    /// Print the tokens of each script before evaluating it.
    #[arg(long)]
    dump_tokens: bool,

    /// Print the syntax tree of each script before evaluating it.
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> Result<(), anyhow::Error> {
    install_tracing();
    let args = Args::parse();

    let mut interp = Interpreter::new();
    let result = if let Some(source) = &args.eval {
        run_source(&mut interp, &args, source)?
    } else if !args.files.is_empty() {
        run_all_files(&mut interp, &args)?
    } else {
        return run_prompt(&mut interp).map_err(anyhow::Error::from);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    } else if args.print_result {
        println!("{}", result);
    }
    Ok(())
}

// Diagnostics go to stderr so they never mix with what scripts print.
fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_all_files(interp: &mut Interpreter, args: &Args) -> Result<Value, anyhow::Error> {
    let mut last = Value::Null;
    for p in &args.files {
        let source = fs::read_to_string(p)
            .with_context(|| format!("failed to open {}", p.display()))?;
        debug!(path = %p.display(), "running script");
        last = run_source(interp, args, &source)
            .with_context(|| format!("failed to run {}", p.display()))?;
    }
    Ok(last)
}

fn run_source(interp: &mut Interpreter, args: &Args, source: &str) -> Result<Value, anyhow::Error> {
    if args.dump_tokens {
        let tokens = scanner::tokenize(source)?;
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    }
    let prg = vibescript::parse_program(source)?;
    if args.dump_ast {
        println!("{}", serde_json::to_string_pretty(&prg)?);
    }
    Ok(interp.run(&prg)?)
}

fn run_prompt(interp: &mut Interpreter) -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();

    let mut input = String::new();
    loop {
        repl_stdout.write_all(b"> ")?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        match interp.eval(&input) {
            Ok(val) if !val.is_null() => println!("{}", val),
            Ok(_) => (),
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
