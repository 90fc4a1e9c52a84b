//! Labelled half-open time intervals with an intersection index.
//!
//! A store holds `(owner, min, max)` records interpreted as `[min, max)`,
//! with `max = +inf` marking the owner's single open interval. The primary
//! index orders intervals by `max` so a window query range-scans from
//! `win_min` upward; a side map locates each owner's open interval, so
//! closing one is a plain delete-and-reinsert rather than a cursor mutation.

use crate::registry::PersonId;
use crate::time::Timestamp;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A labelled time interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub owner: PersonId,
    pub min: Timestamp,
    pub max: Timestamp,
}

impl Interval {
    /// Creates an interval; `min` must not exceed `max`.
    pub fn new(owner: PersonId, min: Timestamp, max: Timestamp) -> Self {
        debug_assert!(min <= max, "interval bounds out of order");
        Interval { owner, min, max }
    }

    /// Returns `true` if `max` is the `+inf` sentinel.
    pub fn is_open(&self) -> bool {
        self.max == Timestamp::POS_INF
    }

    /// Returns `true` if `[min, max)` contains no instant.
    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    /// This interval restricted to the window `[w0, w1]`.
    pub fn clip(&self, w0: Timestamp, w1: Timestamp) -> Interval {
        Interval {
            owner: self.owner,
            min: self.min.max(w0),
            max: self.max.min(w1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}]", self.owner, self.min, self.max)
    }
}

/// Key of the primary index: `max` first so intersection queries can scan
/// a contiguous range; the sequence number keeps equal `(max, owner)`
/// entries distinct.
type StoreKey = (Timestamp, PersonId, u64);

/// An indexed set of intervals keyed by owner.
#[derive(Debug)]
pub struct IntervalStore {
    label: &'static str,
    by_max: BTreeMap<StoreKey, Interval>,
    open_by_owner: HashMap<PersonId, StoreKey>,
    next_seq: u64,
}

impl IntervalStore {
    /// Creates an empty store; `label` names it in diagnostics.
    pub fn new(label: &'static str) -> Self {
        IntervalStore {
            label,
            by_max: BTreeMap::new(),
            open_by_owner: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Name of this store in diagnostics.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Adds an interval.
    ///
    /// No uniqueness check across owners; the caller must not create a
    /// second open interval for an owner that already has one.
    pub fn insert(&mut self, owner: PersonId, min: Timestamp, max: Timestamp) {
        let iv = Interval::new(owner, min, max);
        let key = self.next_key(max, owner);
        if iv.is_open() {
            let prev = self.open_by_owner.insert(owner, key);
            debug_assert!(prev.is_none(), "second open interval for one owner");
        }
        self.by_max.insert(key, iv);
        debug!("{}: insert {}", self.label, iv);
    }

    /// Returns `true` if the owner currently has an open interval.
    pub fn has_open(&self, owner: PersonId) -> bool {
        self.open_by_owner.contains_key(&owner)
    }

    /// Closes the owner's open interval at `end` and returns it, or `None`
    /// when the owner has none. The entry is re-keyed under its new `max`.
    pub fn close_open(&mut self, owner: PersonId, end: Timestamp) -> Option<Interval> {
        let key = self.open_by_owner.remove(&owner)?;
        let open = self
            .by_max
            .remove(&key)
            // Safety: the side map only holds keys present in the primary
            .expect("open-interval key resolves in the primary index");

        let closed = Interval::new(owner, open.min, end);
        let key = self.next_key(end, owner);
        self.by_max.insert(key, closed);
        debug!("{}: close {}", self.label, closed);
        Some(closed)
    }

    /// Every interval overlapping the window, scanned from `win_min` upward
    /// on the `max`-ordered index (which guarantees `iv.max >= win_min`).
    ///
    /// An interval matches when `iv.min < win_max`, or when it begins
    /// exactly at `win_max` and runs past it. The latter makes a point
    /// query (`win_min == win_max == t`) match every interval with
    /// `min <= t <= max` except the empty `[t, t]`; in a window query such
    /// intervals clip down to nothing.
    pub fn intersect(&self, win_min: Timestamp, win_max: Timestamp) -> Vec<Interval> {
        let mut matched = Vec::new();
        for iv in self.by_max.range((win_min, PersonId(0), 0)..).map(|(_, iv)| iv) {
            if iv.min < win_max || (iv.min == win_max && iv.max > win_max) {
                debug!("{}: match {}", self.label, iv);
                matched.push(*iv);
            }
        }
        matched
    }

    /// All intervals, in `max` order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.by_max.values()
    }

    fn next_key(&mut self, max: Timestamp, owner: PersonId) -> StoreKey {
        let seq = self.next_seq;
        self.next_seq += 1;
        (max, owner, seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn owners(ivs: &[Interval]) -> Vec<PersonId> {
        let mut ids: Vec<PersonId> = ivs.iter().map(|iv| iv.owner).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_close_open_rewrites_max() {
        let mut store = IntervalStore::new("test");
        let p = PersonId(0);
        store.insert(p, ts(10), Timestamp::POS_INF);
        assert!(store.has_open(p));

        let closed = store.close_open(p, ts(50)).unwrap();
        assert_eq!(closed, Interval::new(p, ts(10), ts(50)));
        assert!(!store.has_open(p));
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_close_open_without_open_interval() {
        let mut store = IntervalStore::new("test");
        let p = PersonId(0);
        assert!(store.close_open(p, ts(50)).is_none());

        store.insert(p, ts(0), ts(10));
        assert!(store.close_open(p, ts(50)).is_none());
    }

    #[test]
    fn test_open_intervals_are_tracked_per_owner() {
        let mut store = IntervalStore::new("test");
        let (a, b) = (PersonId(0), PersonId(1));
        store.insert(a, ts(0), Timestamp::POS_INF);
        store.insert(b, ts(5), Timestamp::POS_INF);

        store.close_open(a, ts(20)).unwrap();
        assert!(!store.has_open(a));
        assert!(store.has_open(b));
    }

    #[test]
    fn test_intersect_window() {
        let mut store = IntervalStore::new("test");
        let (a, b, c) = (PersonId(0), PersonId(1), PersonId(2));
        store.insert(a, ts(0), ts(10));
        store.insert(b, ts(20), ts(30));
        store.insert(c, ts(5), Timestamp::POS_INF);

        // [12, 25) overlaps b and c but not a
        assert_eq!(owners(&store.intersect(ts(12), ts(25))), vec![b, c]);
    }

    #[test]
    fn test_intersect_half_open_boundaries() {
        let mut store = IntervalStore::new("test");
        let p = PersonId(0);
        store.insert(p, ts(10), ts(20));

        // an interval ending at the window start still matches (max >= win_min)
        assert_eq!(store.intersect(ts(20), ts(30)).len(), 1);
        // a window ending at the interval start yields only a degenerate
        // match that clips to nothing
        let matched = store.intersect(ts(0), ts(10));
        assert_eq!(matched.len(), 1);
        assert!(matched[0].clip(ts(0), ts(10)).is_empty());
    }

    #[test]
    fn test_point_query_is_inclusive() {
        let mut store = IntervalStore::new("test");
        let (a, b, c, d) = (PersonId(0), PersonId(1), PersonId(2), PersonId(3));
        store.insert(a, ts(0), ts(10));
        store.insert(b, ts(10), Timestamp::POS_INF);
        store.insert(c, ts(10), ts(10));
        store.insert(d, ts(20), ts(30));

        // at t = 10: a just ended (inclusive), b just started, the empty
        // [10, 10] does not count, d is in the future
        assert_eq!(owners(&store.intersect(ts(10), ts(10))), vec![a, b]);
    }

    #[test]
    fn test_infinite_endpoints_match_every_window() {
        let mut store = IntervalStore::new("test");
        let (a, b) = (PersonId(0), PersonId(1));
        store.insert(a, Timestamp::NEG_INF, ts(100));
        store.insert(b, ts(0), Timestamp::POS_INF);

        assert_eq!(owners(&store.intersect(ts(1), ts(2))), vec![a, b]);
        let clipped = store.intersect(ts(1), ts(2))[0].clip(ts(1), ts(2));
        assert_eq!((clipped.min, clipped.max), (ts(1), ts(2)));
    }

    #[test]
    fn test_same_owner_closed_intervals_coexist() {
        let mut store = IntervalStore::new("test");
        let p = PersonId(0);
        store.insert(p, ts(0), Timestamp::POS_INF);
        store.close_open(p, ts(10)).unwrap();
        store.insert(p, ts(20), Timestamp::POS_INF);
        store.close_open(p, ts(30)).unwrap();

        assert_eq!(store.iter().count(), 2);
        assert_eq!(store.intersect(ts(0), ts(100)).len(), 2);
    }
}
