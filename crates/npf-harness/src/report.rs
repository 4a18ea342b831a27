//! Report generation for conformance results.

use serde::Serialize;

use crate::scenario::{PropertyResult, ScenarioResult};

/// A conformance report combining the seed scenario table with the
/// universal property checks.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    pub title: String,
    pub timestamp: String,
    pub scenarios: Vec<ScenarioResult>,
    pub properties: Vec<PropertyResult>,
}

impl ConformanceReport {
    #[must_use]
    pub fn new(title: String, timestamp: String, scenarios: Vec<ScenarioResult>, properties: Vec<PropertyResult>) -> Self {
        Self {
            title,
            timestamp,
            scenarios,
            properties,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|r| r.passed) && self.properties.iter().all(|r| r.passed)
    }

    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let scenarios_passed = self.scenarios.iter().filter(|r| r.passed).count();
        let properties_passed = self.properties.iter().filter(|r| r.passed).count();

        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Scenarios: {}/{} passed\n", scenarios_passed, self.scenarios.len()));
        out.push_str(&format!("- Properties: {}/{} held\n\n", properties_passed, self.properties.len()));

        out.push_str("## Scenarios\n\n");
        out.push_str("| Scenario | Expected | Actual | Status |\n");
        out.push_str("|----------|----------|--------|--------|\n");
        for r in &self.scenarios {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {:?} ({}) | {:?} ({}) | {} |\n",
                r.name, r.expected_output, r.expected_return, r.actual_output, r.actual_return, status
            ));
        }

        out.push_str("\n## Properties\n\n");
        out.push_str("| Property | Description | Status |\n");
        out.push_str("|----------|--------------|--------|\n");
        for r in &self.properties {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("| {} | {} | {} |\n", r.property, r.description, status));
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}
