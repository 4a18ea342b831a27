//! Conformance testing harness for the npf formatting engine.
//!
//! Drives the seed scenario table and the universal properties against
//! the real `npf-core`/`npf-abi` engine and folds the results into a
//! human- and machine-readable report.

#![forbid(unsafe_code)]

pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;

pub use error::HarnessError;
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use scenario::{PropertyResult, Scenario, ScenarioArg, ScenarioOutcome, ScenarioResult};
