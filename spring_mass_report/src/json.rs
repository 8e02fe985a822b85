use std::io::Write;

use serde::Serialize;
use spring_mass_lib::{ComparisonReport, ComparisonSummary, Trajectory};

use crate::Result;

/// JSON layout of a comparison run.
#[derive(Debug, Serialize)]
pub struct ComparisonDocument<'a> {
    pub summary: ComparisonSummary,
    pub euler: &'a Trajectory,
    pub reference: &'a Trajectory,
}

impl<'a> From<&'a ComparisonReport> for ComparisonDocument<'a> {
    fn from(report: &'a ComparisonReport) -> Self {
        ComparisonDocument {
            summary: report.summary(),
            euler: report.euler(),
            reference: report.reference(),
        }
    }
}

pub fn write_comparison_json<W: Write>(writer: W, report: &ComparisonReport) -> Result<()> {
    serde_json::to_writer_pretty(writer, &ComparisonDocument::from(report))?;
    Ok(())
}
