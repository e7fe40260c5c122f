//! Concurrent endpoint prober
//!
//! Checks the reachability of a list of URLs. Each URL becomes one
//! independent unit of work; failures degrade to a symbolic status for that
//! URL alone.

mod pool;
mod status;

pub use pool::{probe_all, probe_sequential, ProbeOptions};
pub use status::{ProbeReport, ProbeResult, ProbeStatus};
