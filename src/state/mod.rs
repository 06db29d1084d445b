//! Per-stub collection state
//!
//! Every listing stub seen during a run ends in exactly one terminal
//! [`StubOutcome`]; no stub is revisited within the same run.

mod stub_outcome;

pub use stub_outcome::StubOutcome;
