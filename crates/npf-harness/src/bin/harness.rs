//! CLI entrypoint for the npf conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Conformance tooling for the npf formatting engine.
#[derive(Debug, Parser)]
#[command(name = "npf-harness")]
#[command(about = "Conformance testing harness for the npf formatting engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the seed scenarios and universal properties, printing a
    /// human-readable summary, and exit non-zero on any failure.
    Check,
    /// Run everything and write a markdown + JSON report.
    Report {
        /// Output path; `.json` is also written alongside with the same stem.
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let runner = npf_harness::TestRunner::new("npf-conformance");

    match cli.command {
        Command::Check => {
            let scenarios = runner.run_scenarios();
            let properties = runner.run_properties();

            let mut failed = false;
            for r in &scenarios {
                let status = if r.passed { "PASS" } else { "FAIL" };
                eprintln!("[{status}] scenario {}", r.name);
                if !r.passed {
                    failed = true;
                    eprintln!("    expected {:?} (ret {})", r.expected_output, r.expected_return);
                    eprintln!("    actual   {:?} (ret {})", r.actual_output, r.actual_return);
                }
            }
            for r in &properties {
                let status = if r.passed { "PASS" } else { "FAIL" };
                eprintln!("[{status}] property {} - {}", r.property, r.description);
                if !r.passed {
                    failed = true;
                    if let Some(detail) = &r.detail {
                        eprintln!("    {detail}");
                    }
                }
            }

            if failed {
                return Err(npf_harness::HarnessError::ConformanceFailure.into());
            }
            eprintln!("all scenarios and properties passed");
        }
        Command::Report { output } => {
            let timestamp = format!("{:?}", std::time::SystemTime::now());
            let report = runner.run(timestamp);

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&output, report.to_markdown()).map_err(|source| npf_harness::HarnessError::ReportWrite {
                path: output.clone(),
                source,
            })?;
            let json_path = output.with_extension("json");
            std::fs::write(&json_path, report.to_json()).map_err(|source| npf_harness::HarnessError::ReportWrite {
                path: json_path.clone(),
                source,
            })?;
            eprintln!(
                "Wrote report to {} and {}",
                output.display(),
                json_path.display()
            );

            if !report.all_passed() {
                return Err(npf_harness::HarnessError::ConformanceFailure.into());
            }
        }
    }

    Ok(())
}
