//! Command-line host: script runner and interactive session

mod actions;
mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use quickbeam::{Interp, Payload, Value};

/// Run quickbeam scripts or start an interactive session.
#[derive(Parser, Debug)]
#[command(name = "quickbeam", version, about)]
struct Cli {
    /// Script to run; without one an interactive session starts
    script: Option<PathBuf>,

    /// Disable the shell-execution fallback for unmatched actions
    #[arg(long)]
    no_exec: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut interp = Interp::new();
    actions::install(&mut interp, !cli.no_exec);

    let outcome = match &cli.script {
        Some(path) => run_script(&mut interp, path),
        None => repl::run(&mut interp),
    };
    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_script(interp: &mut Interp, path: &Path) -> Result<ExitCode> {
    let name = path.to_string_lossy().into_owned();
    let bytes =
        std::fs::read(path).with_context(|| format!("could not read script {name}"))?;
    let source = String::from_utf8_lossy(&bytes);

    match interp.run(&source, &name) {
        Ok(value) => Ok(exit_code_for(&value)),
        Err(err) => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// A script's final Number is its exit status; any other final value
/// reports failure.
fn exit_code_for(value: &Value) -> ExitCode {
    match &*value.payload() {
        Payload::Number(n) => ExitCode::from((*n as i32) as u8),
        _ => ExitCode::FAILURE,
    }
}
