/// Stub outcome definitions for a collection run
use std::fmt;

/// Terminal state of a listing stub after the collector has handled it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StubOutcome {
    /// Already present in the baseline, or seen earlier in this run
    Skipped,

    /// Hydrated but the detail table had no rows yet
    EmptyDropped,

    /// Hydrated and identical to the stored version
    Unchanged,

    /// Hydrated and new or changed; returned to the caller
    Reported,

    /// Hydration failed and the run tolerated it
    Failed,
}

impl StubOutcome {
    /// Returns true if the stub's detail table was fetched and extracted
    ///
    /// `Failed` stubs are excluded whether the fetch or the extraction broke.
    pub fn was_hydrated(&self) -> bool {
        matches!(self, Self::EmptyDropped | Self::Unchanged | Self::Reported)
    }

    /// Stable lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::EmptyDropped => "empty_dropped",
            Self::Unchanged => "unchanged",
            Self::Reported => "reported",
            Self::Failed => "failed",
        }
    }

    /// Returns all outcomes in report order
    pub fn all() -> [Self; 5] {
        [
            Self::Skipped,
            Self::EmptyDropped,
            Self::Unchanged,
            Self::Reported,
            Self::Failed,
        ]
    }
}

impl fmt::Display for StubOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
