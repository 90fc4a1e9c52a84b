//! Inserts a ledger record at its chronological position.
//!
//! Reads a ledger on standard input and writes it to standard output with
//! the record given as the first argument emitted just before the first
//! record dated at or after it. Comments and blank lines pass through
//! untouched and never trigger the insertion.
//!
//! # Usage
//!
//! ```bash
//! ledger-insert 'BUY 2024-01-15 alice 10.00 snacks' < old.ledger > new.ledger
//! ```

use expenses_engine::Timestamp;
use std::env;
use std::io::{self, BufRead, Write};
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> io::Result<()> {
    let record = match env::args().nth(1) {
        Some(r) => r,
        None => {
            eprintln!("usage: ledger-insert '<RECORD LINE>'");
            process::exit(2);
        }
    };
    let at = match record_date(&record) {
        Some(at) => at,
        None => {
            eprintln!("Error: record argument has no parseable date");
            process::exit(2);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut inserted = false;

    for line in stdin.lock().lines() {
        let line = line?;
        if !inserted {
            if let Some(ts) = record_date(&line) {
                if ts >= at {
                    writeln!(out, "{}", record)?;
                    inserted = true;
                }
            }
        }
        writeln!(out, "{}", line)?;
    }

    if !inserted {
        writeln!(out, "{}", record)?;
    }

    Ok(())
}

/// Timestamp of a record line: its second whitespace token. Comments,
/// blank lines and unparseable dates yield `None`.
fn record_date(line: &str) -> Option<Timestamp> {
    if line.starts_with('#') {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
