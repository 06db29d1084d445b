//! Run statistics
//!
//! This module counts what a collection run did with its stubs and pages and
//! displays the totals at the end of the run.

use crate::state::StubOutcome;
use std::collections::BTreeMap;

/// Counters of a single collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Listing pages that yielded entries
    pages_walked: u64,

    /// Count of stubs by terminal outcome
    outcomes: BTreeMap<StubOutcome, u64>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_page(&mut self) {
        self.pages_walked += 1;
    }

    pub fn record(&mut self, outcome: StubOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: StubOutcome) -> u64 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn pages_walked(&self) -> u64 {
        self.pages_walked
    }

    /// Total number of stubs that reached an outcome
    pub fn stubs_seen(&self) -> u64 {
        self.outcomes.values().sum()
    }

    /// Number of stubs whose detail table was read successfully
    pub fn hydrated(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.was_hydrated())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `failures` - Number of failures recorded by the run
pub fn print_statistics(stats: &RunStats, failures: usize) {
    println!("=== Collection Statistics ===\n");

    println!("Overview:");
    println!("  Listing pages walked: {}", stats.pages_walked());
    println!("  Stubs seen: {}", stats.stubs_seen());
    println!("  Contents hydrated: {}", stats.hydrated());
    println!();

    println!("Stubs by Outcome:");
    for outcome in StubOutcome::all() {
        let count = stats.count(outcome);
        let percentage = if stats.stubs_seen() > 0 {
            (count as f64 / stats.stubs_seen() as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", outcome, count, percentage);
    }
    println!();

    println!("Failures: {}", failures);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut stats = RunStats::new();
        stats.record_page();
        stats.record_page();
        stats.record(StubOutcome::Skipped);
        stats.record(StubOutcome::Skipped);
        stats.record(StubOutcome::Reported);
        stats.record(StubOutcome::EmptyDropped);
        stats.record(StubOutcome::Failed);

        assert_eq!(stats.pages_walked(), 2);
        assert_eq!(stats.count(StubOutcome::Skipped), 2);
        assert_eq!(stats.count(StubOutcome::Unchanged), 0);
        assert_eq!(stats.stubs_seen(), 5);
        assert_eq!(stats.hydrated(), 2);
    }

    #[test]
    fn test_empty_stats() {
        let stats = RunStats::default();
        assert_eq!(stats.stubs_seen(), 0);
        assert_eq!(stats.hydrated(), 0);
        print_statistics(&stats, 0);
    }
}
