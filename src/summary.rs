use std::path::PathBuf;

use serde::Serialize;

/// Outcome of one report group.
#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub group: &'static str,
    /// Whether the group's policy subtree existed in the export.
    pub present: bool,
    /// Policies extracted across the group's categories, after filtering.
    pub policies: usize,
    /// Idle roles carried into the report.
    pub roles: usize,
    /// Padded rows per role; 0 when no idle role matched any policy.
    pub rows_per_role: usize,
    /// Data rows written to the CSV file.
    pub rows_written: usize,
    pub output: PathBuf,
}

impl GroupReport {
    pub fn has_dependencies(&self) -> bool {
        self.rows_per_role > 0
    }
}

/// All group outcomes of one reporting run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// The export the reports were generated from.
    pub export: PathBuf,
    pub reports: Vec<GroupReport>,
}

impl RunSummary {
    pub fn missing_subtrees(&self) -> usize {
        self.reports.iter().filter(|r| !r.present).count()
    }

    pub fn total_rows(&self) -> usize {
        self.reports.iter().map(|r| r.rows_written).sum()
    }
}
