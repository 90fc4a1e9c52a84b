//! Expenses Engine CLI
//!
//! Reads a household ledger and prints the net pairwise debts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- household.ledger
//! cat household.ledger | cargo run
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: set to `debug` to trace every record and charge on stderr

use expenses_engine::{LedgerEngine, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut engine = LedgerEngine::new();

    match env::args().nth(1) {
        Some(path) => {
            let file = File::open(path)?;
            engine.process_reader(BufReader::new(file))?;
        }
        None => {
            let stdin = io::stdin();
            engine.process_reader(stdin.lock())?;
        }
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
