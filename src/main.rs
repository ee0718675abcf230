use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use minicalc::{evaluate, parse, scan, Environment, Error};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Evaluates integer expressions with variables and assignment.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat SOURCE as the path of a file to run.
    #[arg(short, long)]
    file: bool,

    /// Print only the result instead of every pipeline stage.
    #[arg(short, long)]
    quiet: bool,

    /// Log pipeline stages to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Expression to run. Starts an interactive session when omitted.
    source: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(source) = args.source else {
        run_repl()?;
        return Ok(ExitCode::SUCCESS);
    };
    let source = if args.file {
        fs::read_to_string(&source)
            .with_context(|| format!("{source} not found. No such file or directory."))?
    } else {
        source
    };
    match run_script(&source, args.quiet) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            error!(category = err.category(), "run failed");
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_script(source: &str, quiet: bool) -> Result<(), Error> {
    let tokens = scan(source)?;
    let tree = parse(&tokens)?;
    let mut env = Environment::new();
    let value = evaluate(&tree, &mut env)?;
    if quiet {
        println!("{value}");
        return Ok(());
    }
    println!("Source: {source}");
    println!("\nTokens:");
    for token in tokens.iter() {
        println!("{token}");
    }
    println!("\nTree:\n{tree}");
    println!("\nResult: {value}");
    println!("Environment: {env}");
    Ok(())
}

fn run_repl() -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    let mut env = Environment::new();
    #[cfg(feature = "with-file-history")]
    if rl.load_history("history.txt").is_err() {
        println!("No previous history.");
    }
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str())?;
                match minicalc::run(&line, &mut env) {
                    Ok(value) => println!("{value}"),
                    Err(err) => println!("{err}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    #[cfg(feature = "with-file-history")]
    if let Err(err) = rl.save_history("history.txt") {
        tracing::warn!(error = %err, "could not save history");
    }
    Ok(())
}
