//! Merging intervals into the fewest disjoint ranges.
//!
//! [`MergeEngine`] owns the accumulated intervals. The default
//! [`MergeStrategy::Sweep`] collects everything first and merges once with a
//! sort and a linear sweep. The two incremental strategies merge on every
//! insert and exist for parity with older output.

use crate::models::Interval;
use clap::ValueEnum;

/// How [`MergeEngine::insert`] folds a new interval into the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MergeStrategy {
    /// Join with the first joinable entry only, otherwise append.
    ///
    /// One insert never merges more than one existing entry, so an interval
    /// bridging two entries leaves them apart.
    Incremental,
    /// Like `Incremental`, but keep joining the merged entry with the rest
    /// of the collection until nothing more can be joined.
    Rescan,
    /// Collect, then sort by lower bound and merge in one pass on `finish`.
    #[default]
    Sweep,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            MergeStrategy::Incremental => "incremental",
            MergeStrategy::Rescan => "rescan",
            MergeStrategy::Sweep => "sweep",
        };
        write!(f, "{name}")
    }
}

/// Exclusively owned, growing collection of intervals.
#[derive(Debug, Default)]
pub struct MergeEngine {
    strategy: MergeStrategy,
    intervals: Vec<Interval>,
}

impl MergeEngine {
    pub fn new(strategy: MergeStrategy) -> MergeEngine {
        MergeEngine {
            strategy,
            intervals: Vec::new(),
        }
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Number of intervals currently held.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Add an interval to the collection.
    ///
    /// Returns the entry it was merged into, or `None` when it was appended.
    /// With [`MergeStrategy::Sweep`] nothing is merged before `finish`.
    pub fn insert(&mut self, new: Interval) -> Option<Interval> {
        match self.strategy {
            MergeStrategy::Incremental => self.insert_first_fit(new),
            MergeStrategy::Rescan => self.insert_rescan(new),
            MergeStrategy::Sweep => {
                self.intervals.push(new);
                None
            }
        }
    }

    /// Hand back the final collection.
    pub fn finish(self) -> Vec<Interval> {
        match self.strategy {
            MergeStrategy::Sweep => merge_intervals(self.intervals),
            MergeStrategy::Incremental | MergeStrategy::Rescan => self.intervals,
        }
    }

    fn insert_first_fit(&mut self, new: Interval) -> Option<Interval> {
        match find_joinable(&self.intervals, &new, None) {
            Some((i, joined)) => {
                self.intervals[i] = joined;
                Some(joined)
            }
            None => {
                self.intervals.push(new);
                None
            }
        }
    }

    fn insert_rescan(&mut self, new: Interval) -> Option<Interval> {
        let mut slot = match find_joinable(&self.intervals, &new, None) {
            Some((i, joined)) => {
                self.intervals[i] = joined;
                i
            }
            None => {
                self.intervals.push(new);
                return None;
            }
        };

        // The merged entry may now bridge entries it could not reach before.
        while let Some((i, joined)) =
            find_joinable(&self.intervals, &self.intervals[slot], Some(slot))
        {
            self.intervals[slot] = joined;
            self.intervals.remove(i);
            if i < slot {
                slot -= 1;
            }
        }
        Some(self.intervals[slot])
    }
}

/// Index of the first entry joinable with `new` (skipping `skip`), and the
/// joined interval.
fn find_joinable(
    intervals: &[Interval],
    new: &Interval,
    skip: Option<usize>,
) -> Option<(usize, Interval)> {
    intervals
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .find_map(|(i, present)| new.join(present).map(|joined| (i, joined)))
}

/// Merge overlapping or adjacent intervals.
///
/// The result is sorted by lower bound, and no two entries overlap or touch.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|n| (n.lower(), n.upper()));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        // Sorted input: joinable iff interval.lower <= running upper.
        match merged.last().and_then(|current| current.join(&interval)) {
            Some(joined) => {
                merged.pop();
                merged.push(joined);
            }
            None => merged.push(interval),
        }
    }

    log::trace!("merge_intervals() merged into {} intervals", merged.len());
    merged
}
