//! Progress notification port
//!
//! Defines the interface for reporting progress during a tally run.

use tally_domain::{Post, PostOutcome, TallyStats};

/// Callback for progress updates during a tally
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain log lines, etc.)
pub trait TallyProgressNotifier: Send + Sync {
    /// Called once the posts are loaded
    fn on_tally_start(&self, total_posts: usize);

    /// Called after each attempt to process a post
    fn on_post_processed(&self, post: &Post, outcome: PostOutcome);

    /// Called when a pass over the remaining posts ends with posts still deferred
    fn on_pass_complete(&self, _pass: usize, _deferred: usize) {}

    /// Called when deferral stops making progress and the rest are forced
    fn on_forcing(&self, _remaining: usize) {}

    /// Called when the tally finishes
    fn on_tally_complete(&self, stats: &TallyStats);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl TallyProgressNotifier for NoProgress {
    fn on_tally_start(&self, _total_posts: usize) {}
    fn on_post_processed(&self, _post: &Post, _outcome: PostOutcome) {}
    fn on_tally_complete(&self, _stats: &TallyStats) {}
}
