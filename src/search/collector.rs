//! Collectors that rank finalized combinations as they are enumerated.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use crate::combination::Combination;

/// Trait for collecting enumerated combinations.
pub trait Collector: Send + Debug {
    /// Whether a combination with this leftover would be kept right now.
    fn accepts(&self, remaining_length: i64) -> bool;

    /// Collect a combination.
    fn collect(&mut self, combination: Combination);

    /// Get the final results, best first.
    fn results(&self) -> Vec<Combination>;

    /// Get the total number of combinations offered to `collect`.
    fn total_collected(&self) -> u64;
}

/// Keeps the `max_results` combinations with the least leftover.
///
/// Ties keep the earlier enumerated combination, so the output equals a
/// stable sort of everything collected followed by truncation.
#[derive(Debug)]
pub struct TopCombinationsCollector {
    max_results: usize,
    /// Max-heap on (remaining, sequence): the worst kept entry is on top.
    kept: BinaryHeap<RankedCombination>,
    next_sequence: u64,
    total_collected: u64,
}

#[derive(Debug, Clone)]
struct RankedCombination {
    remaining_length: i64,
    sequence: u64,
    combination: Combination,
}

impl RankedCombination {
    fn key(&self) -> (i64, u64) {
        (self.remaining_length, self.sequence)
    }
}

impl PartialEq for RankedCombination {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for RankedCombination {}

impl PartialOrd for RankedCombination {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedCombination {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl TopCombinationsCollector {
    /// Create a new collector keeping at most `max_results` combinations.
    pub fn new(max_results: usize) -> Self {
        TopCombinationsCollector {
            max_results,
            kept: BinaryHeap::with_capacity(max_results + 1),
            next_sequence: 0,
            total_collected: 0,
        }
    }

    /// Leftover of the worst kept combination, once the collector is full.
    pub fn worst_kept(&self) -> Option<i64> {
        if self.kept.len() < self.max_results {
            None
        } else {
            self.kept.peek().map(|ranked| ranked.remaining_length)
        }
    }
}

impl Collector for TopCombinationsCollector {
    fn accepts(&self, remaining_length: i64) -> bool {
        if self.max_results == 0 {
            return false;
        }
        // A later entry only displaces on a strictly smaller leftover.
        match self.worst_kept() {
            None => true,
            Some(worst) => remaining_length < worst,
        }
    }

    fn collect(&mut self, combination: Combination) {
        self.total_collected += 1;
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let remaining_length = combination.remaining_length();
        if !self.accepts(remaining_length) {
            return;
        }

        self.kept.push(RankedCombination {
            remaining_length,
            sequence,
            combination,
        });
        if self.kept.len() > self.max_results {
            self.kept.pop();
        }
    }

    fn results(&self) -> Vec<Combination> {
        self.kept
            .clone()
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.combination)
            .collect()
    }

    fn total_collected(&self) -> u64 {
        self.total_collected
    }
}
