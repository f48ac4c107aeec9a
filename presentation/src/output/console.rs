//! Console output formatter for tally reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use tally_application::{TallyReport, TaskReport, VoteEntry};
use tally_domain::{IdentityType, TallyStats};

/// Formats tally reports for console display
pub struct ConsoleFormatter {
    show_supporters: bool,
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self {
            show_supporters: true,
        }
    }

    pub fn with_supporters(mut self, show: bool) -> Self {
        self.show_supporters = show;
        self
    }

    /// Format the complete report
    pub fn format_report(&self, report: &TallyReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Vote Tally"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}    {} {}\n",
            "Partition:".cyan().bold(),
            report.partition_mode,
            "Ranking:".cyan().bold(),
            report.ranking_method
        ));

        if report.tasks.is_empty() {
            output.push_str(&format!("\n{}\n", "No votes counted.".dimmed()));
        }

        for task in &report.tasks {
            output.push_str(&self.format_task(task));
        }

        output.push_str(&Self::format_stats(&report.stats));
        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_report_json(report: &TallyReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_task(&self, task: &TaskReport) -> String {
        let mut output = String::new();
        if task.task.is_empty() {
            output.push_str(&Self::section_header("Votes"));
        } else {
            output.push_str(&Self::section_header(&format!("Task: {}", task.task)));
        }

        for vote in &task.votes {
            output.push_str(&self.format_vote(vote));
        }

        if !task.ranking.is_empty() {
            output.push_str(&format!("\n{}\n", "Ranking:".green().bold()));
            for entry in &task.ranking {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    format!("#{}", entry.rank).yellow().bold(),
                    first_line(&entry.text),
                    format!("({:.2})", entry.score).dimmed()
                ));
            }
        }
        output
    }

    fn format_vote(&self, vote: &VoteEntry) -> String {
        let mut output = format!(
            "\n{} {}\n",
            format!("[{}]", vote.support).yellow().bold(),
            first_line(&vote.text)
        );
        for line in vote.text.lines().skip(1) {
            output.push_str(&format!("    {}\n", line));
        }

        if self.show_supporters && !vote.supporters.is_empty() {
            let names: Vec<String> = vote
                .supporters
                .iter()
                .map(|s| match s.identity {
                    IdentityType::User => format!("{} {}", s.marker, s.name),
                    IdentityType::Plan => format!("{} {}", s.marker, s.name).dimmed().to_string(),
                })
                .collect();
            output.push_str(&Self::indent(&names.join("\n"), "      "));
            output.push('\n');
        }
        output
    }

    fn format_stats(stats: &TallyStats) -> String {
        let mut output = format!(
            "\n{} {} seen, {} counted, {} skipped",
            "Posts:".cyan().bold(),
            stats.posts_seen,
            stats.posts_counted,
            stats.posts_skipped
        );
        if stats.posts_forced > 0 {
            output.push_str(&format!(", {} forced", stats.posts_forced));
        }
        output.push('\n');
        if stats.lines_skipped > 0 {
            output.push_str(&format!(
                "{} {} vote-like lines could not be read\n",
                "Skipped:".yellow().bold(),
                stats.lines_skipped
            ));
        }
        if stats.plans_registered > 0 || stats.plans_rejected > 0 {
            output.push_str(&format!(
                "{} {} registered, {} rejected\n",
                "Plans:".cyan().bold(),
                stats.plans_registered,
                stats.plans_rejected
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &TallyReport) -> String {
        self.format_report(report)
    }

    fn format_json(&self, report: &TallyReport) -> String {
        Self::format_report_json(report)
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::{Origin, PartitionMode, Post, TallySettings, VoteCounter};

    fn report(posts: &[(&str, u64, &str)]) -> TallyReport {
        let mut counter = VoteCounter::new(
            TallySettings::default().with_partition_mode(PartitionMode::ByBlock),
        );
        counter.load_posts(
            posts
                .iter()
                .map(|&(author, id, text)| Post::new(Origin::new(author, id, id), text))
                .collect(),
        );
        for i in 0..counter.post_count() {
            counter.process_post(i, false);
        }
        TallyReport::from_counter(&counter)
    }

    #[test]
    fn test_format_lists_votes_and_supporters() {
        let report = report(&[
            ("Alice", 1, "[x] Build the wall\n-[x] Use stone"),
            ("Bob", 2, "[x] Build the wall\n-[x] Use stone"),
            ("Carol", 3, "[x][Army] Scouts"),
        ]);
        let text = ConsoleFormatter::new().format(&report);
        assert!(text.contains("Build the wall"));
        assert!(text.contains("    -Use stone"));
        assert!(text.contains("[x] Alice"));
        assert!(text.contains("Task: Army"));
        assert!(text.contains("3 seen, 3 counted, 0 skipped"));
    }

    #[test]
    fn test_format_without_supporters() {
        let report = report(&[("Alice", 1, "[x] Build the wall")]);
        let text = ConsoleFormatter::new().with_supporters(false).format(&report);
        assert!(text.contains("Build the wall"));
        assert!(!text.contains("Alice"));
    }

    #[test]
    fn test_format_empty_report() {
        let report = report(&[("Alice", 1, "No vote here")]);
        let text = ConsoleFormatter::new().format(&report);
        assert!(text.contains("No votes counted."));
    }

    #[test]
    fn test_format_json_is_valid() {
        let report = report(&[("Alice", 1, "[x] Build the wall")]);
        let json = ConsoleFormatter::new().format_json(&report);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["partition_mode"], "block");
        assert_eq!(value["tasks"][0]["votes"][0]["text"], "Build the wall");
        assert_eq!(value["stats"]["posts_counted"], 1);
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
