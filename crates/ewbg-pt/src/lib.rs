#![deny(missing_docs)]
#![doc = "Phase-transition finder: scans the effective potential downward in temperature, brackets the point where the broken vacuum undercuts the symmetric one and bisects to the critical temperature."]

mod report;
mod scan;

pub use report::{PhaseTransitionPoint, ScanSample, TransitionReport, TransitionStatus};
pub use scan::{find_transition, ScanOpts};
