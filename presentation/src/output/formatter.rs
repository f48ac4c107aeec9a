//! Output formatter trait

use tally_application::TallyReport;

/// Trait for formatting tally reports
pub trait OutputFormatter {
    /// Format the report for reading
    fn format(&self, report: &TallyReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &TallyReport) -> String;
}
