use std::{io, process::ExitCode};

use clap::Parser;
use qttt::{GameConfig, GameTerminal};
use tracing::error;

/// Quantum tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed for the collapse sampler, makes games reproducible
    #[arg(long)]
    seed: Option<u64>,

    /// Print the gate log after every turn
    #[arg(long)]
    show_circuit: bool,

    /// tracing filter directives, e.g. `qttt=debug`
    #[arg(long)]
    log: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match GameConfig::from_env() {
        Ok(config) => config.merge(args.seed, args.show_circuit, args.log),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    config.init_tracing();

    let stdin = io::stdin();
    let mut terminal = GameTerminal::new(stdin.lock(), io::stdout(), config);
    match terminal.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "terminal failed");
            ExitCode::FAILURE
        }
    }
}
