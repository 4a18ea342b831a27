//! Drives the seed scenarios and universal properties against the live
//! engine and folds the results into a [`crate::report::ConformanceReport`].

use crate::report::ConformanceReport;
use crate::scenario::{self, PropertyResult, ScenarioResult, SEED_SCENARIOS};

pub struct TestRunner {
    pub campaign: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    pub fn run_scenarios(&self) -> Vec<ScenarioResult> {
        SEED_SCENARIOS.iter().map(scenario::evaluate).collect()
    }

    pub fn run_properties(&self) -> Vec<PropertyResult> {
        scenario::check_properties()
    }

    pub fn run(&self, timestamp: impl Into<String>) -> ConformanceReport {
        ConformanceReport::new(self.campaign.clone(), timestamp.into(), self.run_scenarios(), self.run_properties())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_seed_scenario_passes() {
        let runner = TestRunner::new("unit-test");
        for result in runner.run_scenarios() {
            assert!(
                result.passed,
                "{}: expected {:?}/{} got {:?}/{}",
                result.name, result.expected_output, result.expected_return, result.actual_output, result.actual_return
            );
        }
    }

    #[test]
    fn every_property_holds() {
        let runner = TestRunner::new("unit-test");
        for result in runner.run_properties() {
            assert!(result.passed, "{} failed: {:?}", result.property, result.detail);
        }
    }
}
