//! Cost allocation over splits, with a one-cent rounding buffer.
//!
//! Each occupant's share is computed in integer cents, truncating toward
//! zero; whenever the division leaves a remainder one cent is added (the
//! payer tip), so rounding never leaves the payer short. The collective
//! overpays by at most one cent per occupant per split.

use crate::graph::DebtGraph;
use crate::money::Cents;
use crate::registry::PersonId;
use crate::sweep::Split;
use crate::time::Timestamp;
use log::debug;

/// Charges every occupant of every split its share of `total`, paid by
/// `payer` over the window `[win_min, win_max]`.
///
/// A split of `d` seconds with `n` occupants costs each occupant
/// `total * d / (n * window)` cents plus the payer tip when inexact. The
/// payer's own share is never charged.
pub fn charge_window(
    graph: &mut DebtGraph,
    payer: PersonId,
    total: Cents,
    win_min: Timestamp,
    win_max: Timestamp,
    splits: &[Split],
) {
    let window = win_max.finite_secs() - win_min.finite_secs();

    for split in splits {
        let d = split.max.finite_secs() - split.min.finite_secs();
        let n = split.occupants.len() as i64;
        let cost = share(total, d, n * window);
        debug!(
            "split [{}, {}] x{}: {} each",
            split.min, split.max, n, cost
        );
        charge(graph, payer, cost, &split.occupants);
    }
}

/// Charges every listed occupant an equal share of `total`.
///
/// The slice must be non-empty; the caller rejects purchases nobody is
/// obligated for before getting here.
pub fn charge_flat(graph: &mut DebtGraph, payer: PersonId, total: Cents, occupants: &[PersonId]) {
    let cost = share(total, 1, occupants.len() as i64);
    debug!("flat x{}: {} each", occupants.len(), cost);
    charge(graph, payer, cost, occupants);
}

fn charge(graph: &mut DebtGraph, payer: PersonId, cost: Cents, occupants: &[PersonId]) {
    for &o in occupants {
        if o != payer {
            graph.add(payer, o, cost);
        }
    }
}

/// `total * num / den` in cents, truncated, plus one cent when inexact.
fn share(total: Cents, num: i64, den: i64) -> Cents {
    let num = i128::from(total.get()) * i128::from(num);
    let den = i128::from(den);
    let mut cost = num / den;
    if num % den != 0 {
        cost += 1;
    }
    Cents::new(cost as i64)
}
