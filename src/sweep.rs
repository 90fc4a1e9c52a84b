//! Sweep-line decomposition into constant-occupancy splits.
//!
//! Given intervals already clipped to a billing window, [`split`] yields the
//! minimal partition of the covered time into sub-intervals on which the set
//! of occupants is constant.

use crate::interval::Interval;
use crate::registry::PersonId;
use crate::time::Timestamp;
use std::collections::HashMap;

/// A maximal sub-interval `[min, max)` covered by a constant occupant set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub min: Timestamp,
    pub max: Timestamp,
    /// Owners whose intervals cover `[min, max)`, ascending by id.
    pub occupants: Vec<PersonId>,
}

/// Interval boundaries, ordered so that at equal timestamps every close is
/// processed before any open: under the half-open convention an interval
/// ending at `t` does not overlap one starting at `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Close,
    Open,
}

/// Decomposes clipped intervals into constant-occupancy splits.
///
/// Empty input intervals are ignored. Gaps nobody covers produce no split,
/// and zero-length stretches between equal timestamps are skipped. Adjacent
/// splits with identical occupants are merged, so consecutive output splits
/// always differ in occupancy.
pub fn split(intervals: &[Interval]) -> Vec<Split> {
    let mut events: Vec<(Timestamp, EventKind, PersonId)> = Vec::with_capacity(intervals.len() * 2);
    for iv in intervals {
        if iv.is_empty() {
            continue;
        }
        events.push((iv.min, EventKind::Open, iv.owner));
        events.push((iv.max, EventKind::Close, iv.owner));
    }
    events.sort_unstable();

    let mut live: HashMap<PersonId, u32> = HashMap::new();
    let mut splits: Vec<Split> = Vec::new();

    for window in events.windows(2) {
        let (at, kind, owner) = window[0];
        let next_at = window[1].0;
        toggle(&mut live, kind, owner);

        if at == next_at || live.is_empty() {
            continue;
        }

        let occupants = snapshot(&live);
        match splits.last_mut() {
            // same crowd straddling an interval boundary: extend
            Some(last) if last.max == at && last.occupants == occupants => last.max = next_at,
            _ => splits.push(Split {
                min: at,
                max: next_at,
                occupants,
            }),
        }
    }

    splits
}

fn toggle(live: &mut HashMap<PersonId, u32>, kind: EventKind, owner: PersonId) {
    match kind {
        EventKind::Open => *live.entry(owner).or_insert(0) += 1,
        EventKind::Close => {
            let n = live
                .get_mut(&owner)
                .expect("occupancy underflow: close without matching open");
            *n -= 1;
            if *n == 0 {
                live.remove(&owner);
            }
        }
    }
}

fn snapshot(live: &HashMap<PersonId, u32>) -> Vec<PersonId> {
    let mut ids: Vec<PersonId> = live.keys().copied().collect();
    ids.sort_unstable();
    ids
}
