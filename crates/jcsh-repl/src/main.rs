//! jcsh CLI entry point.
//!
//! Usage:
//!   jcsh               # Interactive shell
//!   jcsh -c <command>  # Execute one command line and exit

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jcsh_repl::Repl;

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("jcsh: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => {
            Repl::new()?.run()?;
            Ok(ExitCode::SUCCESS)
        }

        Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("jcsh {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some("-c") => {
            let command = args.get(2).context("-c requires a command argument")?;
            let mut repl = Repl::new()?;
            match repl.execute_line(command) {
                Ok(_) => Ok(ExitCode::SUCCESS),
                Err(err) => {
                    eprintln!("jcsh: {err}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Some(unknown) => {
            eprintln!("jcsh: unknown option: {unknown}");
            eprintln!("Run 'jcsh --help' for usage.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_help() {
    println!(
        r#"jcsh v{} — a job-control shell

Usage:
  jcsh                 Interactive shell
  jcsh -c <command>    Execute one command line and exit

Options:
  -c <command>         Execute command string and exit
  -h, --help           Show this help
  -V, --version        Show version

Commands:
  <program> [args...] [< file] [> file | >> file] [&]
  jobs                 List tracked jobs
  fg <index>           Resume a job in the foreground
  bg <index>           Resume a job in the background
  wait-for <index>     Block until a background job exits
  wait-all             Block until every background job exits or stops
  pwd, cd [dir], exit
"#,
        env!("CARGO_PKG_VERSION")
    );
}
