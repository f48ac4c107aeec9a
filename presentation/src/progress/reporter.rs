//! Progress reporting for tally runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tally_application::ports::progress::TallyProgressNotifier;
use tally_domain::{Post, PostOutcome, TallyStats};

/// Reports tally progress with a progress bar
///
/// The bar advances once per post that leaves the queue; deferred posts
/// advance it when they are finally counted.
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TallyProgressNotifier for ProgressReporter {
    fn on_tally_start(&self, total_posts: usize) {
        let bar = ProgressBar::new(total_posts as u64);
        bar.set_style(Self::bar_style());
        bar.set_prefix("Tallying");
        bar.set_message("Starting...");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_post_processed(&self, post: &Post, outcome: PostOutcome) {
        if outcome == PostOutcome::Deferred {
            return;
        }
        self.with_bar(|bar| {
            bar.set_message(post.origin().author().to_string());
            bar.inc(1);
        });
    }

    fn on_pass_complete(&self, pass: usize, deferred: usize) {
        self.with_bar(|bar| bar.set_message(format!("pass {}: {} deferred", pass, deferred)));
    }

    fn on_forcing(&self, remaining: usize) {
        self.with_bar(|bar| bar.set_message(format!("forcing {}", remaining).yellow().to_string()));
    }

    fn on_tally_complete(&self, stats: &TallyStats) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_with_message(format!(
                "{} ({} counted)",
                "complete!".green(),
                stats.posts_counted
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Prints one line per counted, skipped or deferred post to stderr.
pub struct SimpleProgress;

impl TallyProgressNotifier for SimpleProgress {
    fn on_tally_start(&self, total_posts: usize) {
        eprintln!("{} {} ({} posts)", "->".cyan(), "Tallying".bold(), total_posts);
    }

    fn on_post_processed(&self, post: &Post, outcome: PostOutcome) {
        let origin = post.origin();
        match outcome {
            PostOutcome::Counted { blocks } => {
                eprintln!("  {} #{} {} ({} blocks)", "v".green(), origin.post_number(), origin, blocks)
            }
            PostOutcome::Deferred => {
                eprintln!("  {} #{} {} (deferred)", "~".yellow(), origin.post_number(), origin)
            }
            PostOutcome::Skipped(reason) => eprintln!(
                "  {} #{} {} ({})",
                "-".dimmed(),
                origin.post_number(),
                origin,
                reason.as_str()
            ),
        }
    }

    fn on_forcing(&self, remaining: usize) {
        eprintln!("  {} forcing {} deferred posts", "!".yellow(), remaining);
    }

    fn on_tally_complete(&self, stats: &TallyStats) {
        eprintln!(
            "{} {} counted, {} skipped\n",
            "Done:".green().bold(),
            stats.posts_counted,
            stats.posts_skipped
        );
    }
}
