//! # Expenses Engine
//!
//! Derives the pairwise debts of a shared household from an append-only
//! ledger of dated events: arrivals, departures, temporary absences,
//! transfers, shared purchases, and bills.
//!
//! ## Design Principles
//!
//! - **Integer cents**: all money is `i64` cents; no floating point
//! - **Derived debts**: nothing is stored beyond the net pair weights;
//!   every bill is re-distributed over who was there when
//! - **Two time axes**: presence (who is around) and obligation (who is
//!   renting) are independent interval sets
//! - **Deterministic output**: debts sorted by canonical pair order
//!
//! ## Example
//!
//! ```
//! use expenses_engine::LedgerEngine;
//! use std::io::Cursor;
//!
//! let ledger = "\
//! START 2024-01-01 alice
//! START 2024-01-01 bob
//! PAY 2024-02-01 alice 100.00 2024-01-01 2024-01-31
//! ";
//! let mut engine = LedgerEngine::new();
//! engine.process_reader(Cursor::new(ledger)).unwrap();
//!
//! let mut out = Vec::new();
//! engine.write_output(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "bob owes alice 50.00€\n");
//! ```

pub mod allocate;
pub mod engine;
pub mod error;
pub mod graph;
pub mod interval;
pub mod money;
pub mod record;
pub mod registry;
pub mod sweep;
pub mod time;

pub use engine::LedgerEngine;
pub use error::{EngineError, Result};
pub use graph::DebtGraph;
pub use interval::{Interval, IntervalStore};
pub use money::Cents;
pub use record::{OpRecord, RecordError};
pub use registry::{PersonId, PersonRegistry};
pub use sweep::Split;
pub use time::Timestamp;
