//! Core ledger dispatcher.
//!
//! Processes records strictly in received order and maintains the person
//! registry, the two interval stores, and the debt graph. The presence
//! store tracks who is physically around; the obligation store tracks who
//! is renting. `PAUSE`/`RESUME` touch only presence, so a paused person
//! keeps paying rent but stops sharing day-to-day bills.

use crate::allocate;
use crate::error::{EngineError, Result};
use crate::graph::DebtGraph;
use crate::interval::{Interval, IntervalStore};
use crate::money::Cents;
use crate::record::{self, OpRecord};
use crate::registry::{PersonId, PersonRegistry};
use crate::sweep::{self, Split};
use crate::time::Timestamp;
use log::debug;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};

/// The ledger processing engine.
///
/// Consumes one record at a time; each record is fully applied before the
/// next is read. The first error aborts the run.
///
/// # Output Ordering
///
/// The final debt table is emitted in ascending `(lo, hi)` id order, which
/// is deterministic for a given input.
pub struct LedgerEngine {
    registry: PersonRegistry,
    presence: IntervalStore,
    obligation: IntervalStore,
    graph: DebtGraph,
}

impl LedgerEngine {
    /// Creates a new empty engine.
    pub fn new() -> Self {
        LedgerEngine {
            registry: PersonRegistry::new(),
            presence: IntervalStore::new("presence"),
            obligation: IntervalStore::new("obligation"),
            graph: DebtGraph::new(),
        }
    }

    /// Processes ledger lines from a reader, strictly in order.
    pub fn process_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (idx, line) in reader.lines().enumerate() {
            let line_num = idx + 1;
            let line = line?;
            let parsed = record::parse_line(&line).map_err(|source| EngineError::Record {
                line: line_num,
                source,
            })?;
            if let Some(op) = parsed {
                self.apply(op, line_num)?;
            }
        }
        Ok(())
    }

    /// Applies a single parsed record; `line` is carried for diagnostics.
    pub fn apply(&mut self, op: OpRecord, line: usize) -> Result<()> {
        debug!("line {}: {:?}", line, op);
        match op {
            OpRecord::Start { at, nick } => self.start(at, &nick, line),
            OpRecord::Stop { at, nick } => self.stop(at, &nick, line),
            OpRecord::Pause { at, nick } => self.pause(at, &nick, line),
            OpRecord::Resume { at, nick } => self.resume(at, &nick, line),
            OpRecord::Transfer {
                from, to, amount, ..
            } => self.transfer(&from, &to, amount, line),
            OpRecord::Buy { at, nick, amount } => self.buy(at, &nick, amount, line),
            OpRecord::Pay {
                nick,
                amount,
                win_min,
                win_max,
                ..
            } => self.pay(&nick, amount, win_min, win_max, line),
        }
    }

    /// Writes the final debt table, one line per non-zero pair.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        self.graph.write_output(&self.registry, writer)?;
        Ok(())
    }

    /// The person registry.
    pub fn registry(&self) -> &PersonRegistry {
        &self.registry
    }

    /// The debt graph accumulated so far.
    pub fn graph(&self) -> &DebtGraph {
        &self.graph
    }

    /// The presence interval store.
    pub fn presence(&self) -> &IntervalStore {
        &self.presence
    }

    /// The obligation interval store.
    pub fn obligation(&self) -> &IntervalStore {
        &self.obligation
    }

    fn start(&mut self, at: Timestamp, nick: &str, line: usize) -> Result<()> {
        let p = self
            .registry
            .intern(nick)
            .map_err(|source| EngineError::Registry { line, source })?;
        self.presence.insert(p, at, Timestamp::POS_INF);
        self.obligation.insert(p, at, Timestamp::POS_INF);
        Ok(())
    }

    fn stop(&mut self, at: Timestamp, nick: &str, line: usize) -> Result<()> {
        match self.registry.lookup(nick) {
            Some(p) => {
                self.close_in(Store::Presence, p, at, nick, line)?;
                self.close_in(Store::Obligation, p, at, nick, line)?;
            }
            None => {
                // first mention on the way out: a retro-active stay
                let p = self
                    .registry
                    .intern(nick)
                    .map_err(|source| EngineError::Registry { line, source })?;
                self.presence.insert(p, Timestamp::NEG_INF, at);
                self.obligation.insert(p, Timestamp::NEG_INF, at);
            }
        }
        Ok(())
    }

    fn pause(&mut self, at: Timestamp, nick: &str, line: usize) -> Result<()> {
        let p = self.require(nick, line)?;
        self.close_in(Store::Presence, p, at, nick, line)
    }

    fn resume(&mut self, at: Timestamp, nick: &str, line: usize) -> Result<()> {
        let p = self.require(nick, line)?;
        if self.presence.has_open(p) {
            return Err(EngineError::AlreadyPresent {
                line,
                nick: nick.to_string(),
            });
        }
        self.presence.insert(p, at, Timestamp::POS_INF);
        Ok(())
    }

    fn transfer(&mut self, from: &str, to: &str, amount: Cents, line: usize) -> Result<()> {
        let from = self.require(from, line)?;
        let to = self.require(to, line)?;
        self.graph.add(from, to, amount);
        Ok(())
    }

    fn buy(&mut self, at: Timestamp, nick: &str, amount: Cents, line: usize) -> Result<()> {
        let payer = self.require(nick, line)?;

        let obligated: BTreeSet<PersonId> = self
            .obligation
            .intersect(at, at)
            .into_iter()
            .map(|iv| iv.owner)
            .collect();
        if obligated.is_empty() {
            return Err(EngineError::NobodyObligated { line });
        }

        let obligated: Vec<PersonId> = obligated.into_iter().collect();
        allocate::charge_flat(&mut self.graph, payer, amount, &obligated);
        Ok(())
    }

    fn pay(
        &mut self,
        nick: &str,
        amount: Cents,
        win_min: Timestamp,
        win_max: Timestamp,
        line: usize,
    ) -> Result<()> {
        let payer = self.require(nick, line)?;
        if win_min == win_max {
            // an empty window distributes nothing
            return Ok(());
        }

        let splits = self.billing_splits(win_min, win_max);
        allocate::charge_window(&mut self.graph, payer, amount, win_min, win_max, &splits);
        Ok(())
    }

    /// Splits the billing window by presence, refilling any stretch nobody
    /// was present for from the obligation store: absentees still carry
    /// the bills for time nobody else covered.
    fn billing_splits(&self, win_min: Timestamp, win_max: Timestamp) -> Vec<Split> {
        let base = self.store_splits(&self.presence, win_min, win_max);

        let mut filled = Vec::with_capacity(base.len());
        let mut cursor = win_min;
        for split in base {
            if cursor < split.min {
                filled.extend(self.store_splits(&self.obligation, cursor, split.min));
            }
            cursor = split.max;
            filled.push(split);
        }
        if cursor < win_max {
            filled.extend(self.store_splits(&self.obligation, cursor, win_max));
        }
        filled
    }

    fn store_splits(&self, store: &IntervalStore, w0: Timestamp, w1: Timestamp) -> Vec<Split> {
        let clipped: Vec<Interval> = store
            .intersect(w0, w1)
            .into_iter()
            .map(|iv| iv.clip(w0, w1))
            .collect();
        sweep::split(&clipped)
    }

    fn require(&self, nick: &str, line: usize) -> Result<PersonId> {
        self.registry
            .lookup(nick)
            .ok_or_else(|| EngineError::UnknownPerson {
                line,
                nick: nick.to_string(),
            })
    }

    fn close_in(
        &mut self,
        store: Store,
        p: PersonId,
        at: Timestamp,
        nick: &str,
        line: usize,
    ) -> Result<()> {
        let target = match store {
            Store::Presence => &mut self.presence,
            Store::Obligation => &mut self.obligation,
        };
        target
            .close_open(p, at)
            .ok_or_else(|| EngineError::NoOpenInterval {
                line,
                nick: nick.to_string(),
                store: target.label(),
            })?;
        Ok(())
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Store {
    Presence,
    Obligation,
}
