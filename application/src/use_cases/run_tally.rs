//! Run tally use case
//!
//! Loads a thread's posts and counts them in order. Posts whose references
//! point at votes not yet processed are deferred and retried on the next
//! pass; once a pass makes no progress, the rest are processed with force.

use crate::ports::post_source::{PostSource, PostSourceError};
use crate::ports::progress::{NoProgress, TallyProgressNotifier};
use crate::ports::tally_logger::{NoTallyLogger, TallyEvent, TallyEventLogger};
use crate::use_cases::report::TallyReport;
use std::sync::Arc;
use tally_domain::{PostOutcome, TallySettings, VoteCounter};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a tally run
#[derive(Error, Debug)]
pub enum RunTallyError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Post source error: {0}")]
    PostSource(#[from] PostSourceError),

    #[error("No posts to tally")]
    NoPosts,
}

impl RunTallyError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunTallyError::Cancelled)
    }
}

/// Result of a tally run
///
/// The counter is returned so callers can keep editing the storage
/// (merge, split, undo) and rebuild the report.
#[derive(Debug)]
pub struct RunTallyOutput {
    pub counter: VoteCounter,
    pub report: TallyReport,
    /// Number of passes over the deferred posts, including the first
    pub passes: usize,
}

/// Use case for tallying one thread
pub struct RunTallyUseCase<S: PostSource + 'static> {
    source: Arc<S>,
    logger: Arc<dyn TallyEventLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<S: PostSource + 'static> RunTallyUseCase<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            logger: Arc::new(NoTallyLogger),
            cancellation_token: None,
        }
    }

    /// Set a structured event logger
    pub fn with_logger(mut self, logger: Arc<dyn TallyEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, settings: TallySettings) -> Result<RunTallyOutput, RunTallyError> {
        self.execute_with_progress(settings, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        settings: TallySettings,
        progress: &dyn TallyProgressNotifier,
    ) -> Result<RunTallyOutput, RunTallyError> {
        self.check_cancelled()?;

        let source = self.source.describe();
        let posts = self.source.load_posts().await?;
        if posts.is_empty() {
            return Err(RunTallyError::NoPosts);
        }
        info!("Loaded {} posts from {}", posts.len(), source);

        let mut counter = VoteCounter::new(settings);
        counter.load_posts(posts);
        debug!(
            "Registered {} plans, partition mode {}",
            counter.plans().len(),
            counter.settings().partition_mode
        );

        progress.on_tally_start(counter.post_count());
        self.logger
            .log(TallyEvent::tally_started(&source, counter.post_count()));

        let mut pending: Vec<usize> = (0..counter.post_count()).collect();
        let mut passes = 0;
        while !pending.is_empty() {
            passes += 1;
            let deferred = self
                .run_pass(&mut counter, &pending, false, progress)
                .await?;
            if deferred.is_empty() {
                break;
            }
            progress.on_pass_complete(passes, deferred.len());

            if deferred.len() == pending.len() {
                warn!(
                    "{} posts still waiting on references; forcing them",
                    deferred.len()
                );
                progress.on_forcing(deferred.len());
                passes += 1;
                self.run_pass(&mut counter, &deferred, true, progress)
                    .await?;
                break;
            }
            debug!("Pass {} deferred {} posts", passes, deferred.len());
            pending = deferred;
        }

        let stats = counter.stats();
        info!(
            "Tally complete: {} counted, {} skipped, {} forced",
            stats.posts_counted, stats.posts_skipped, stats.posts_forced
        );
        progress.on_tally_complete(&stats);
        self.logger.log(TallyEvent::tally_completed(&stats));

        let report = TallyReport::from_counter(&counter);
        Ok(RunTallyOutput {
            counter,
            report,
            passes,
        })
    }

    /// Process the given posts in order, returning those that deferred.
    ///
    /// Cancellation is checked between posts, never inside one.
    async fn run_pass(
        &self,
        counter: &mut VoteCounter,
        indices: &[usize],
        force: bool,
        progress: &dyn TallyProgressNotifier,
    ) -> Result<Vec<usize>, RunTallyError> {
        let mut deferred = Vec::new();
        for &index in indices {
            self.check_cancelled()?;

            let outcome = counter.process_post(index, force);
            if outcome == PostOutcome::Deferred {
                deferred.push(index);
            }
            if let Some(post) = counter.posts().get(index) {
                progress.on_post_processed(post, outcome);
                self.logger
                    .log(TallyEvent::for_outcome(post, outcome, force));
            }

            tokio::task::yield_now().await;
        }
        Ok(deferred)
    }

    fn check_cancelled(&self) -> Result<(), RunTallyError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(RunTallyError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::post_source::StaticPostSource;
    use std::sync::Mutex;
    use tally_domain::{Origin, PartitionMode, Post, TallyStats, VoteLineBlock, parse_lines};

    fn post(author: &str, id: u64, text: &str) -> Post {
        Post::new(Origin::new(author, id, id), text)
    }

    fn use_case(posts: Vec<Post>) -> RunTallyUseCase<StaticPostSource> {
        RunTallyUseCase::new(Arc::new(StaticPostSource::new(posts)))
    }

    fn by_line() -> TallySettings {
        TallySettings::default().with_partition_mode(PartitionMode::ByLine)
    }

    fn supporters(output: &RunTallyOutput, text: &str) -> usize {
        let vote = VoteLineBlock::new(parse_lines(text)).unwrap();
        output.counter.storage().votes().voters_for_vote(&vote).len()
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl TallyEventLogger for RecordingLogger {
        fn log(&self, event: TallyEvent) {
            self.events.lock().unwrap().push(event.event_type());
        }
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl PostSource for FailingSource {
        async fn load_posts(&self) -> Result<Vec<Post>, PostSourceError> {
            Err(PostSourceError::NotFound("thread.json".to_string()))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[tokio::test]
    async fn test_counts_all_posts() {
        let output = use_case(vec![
            post("Alice", 1, "[x] Wall"),
            post("Bob", 2, "[x] Wall"),
            post("Carol", 3, "Just chatting"),
        ])
        .execute(by_line())
        .await
        .unwrap();

        assert_eq!(supporters(&output, "[x] Wall"), 2);
        assert_eq!(output.report.stats.posts_counted, 2);
        assert_eq!(output.report.stats.posts_skipped, 1);
        assert_eq!(output.passes, 1);
    }

    #[tokio::test]
    async fn test_deferred_post_is_retried() {
        let output = use_case(vec![
            post("Alice", 1, "[x] Bob"),
            post("Bob", 2, "[x] Flank left"),
        ])
        .execute(by_line())
        .await
        .unwrap();

        assert_eq!(supporters(&output, "[x] Flank left"), 2);
        assert_eq!(output.passes, 2);
        assert_eq!(output.report.stats.posts_forced, 0);
        assert!(output.counter.posts().iter().all(|p| p.is_processed()));
    }

    #[tokio::test]
    async fn test_cycle_is_forced() {
        let output = use_case(vec![
            post("Alice", 1, "[x] Bob"),
            post("Bob", 2, "[x] Alice"),
        ])
        .execute(by_line())
        .await
        .unwrap();

        assert!(output.counter.posts().iter().all(|p| p.is_processed()));
        assert!(output.report.stats.posts_forced >= 1);
        assert_eq!(output.report.stats.posts_counted, 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let err = use_case(vec![post("Alice", 1, "[x] Wall")])
            .with_cancellation(token)
            .execute(by_line())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Operation cancelled");
    }

    /// Cancels the run once it has seen `after` posts.
    struct CancelAfter {
        token: CancellationToken,
        after: usize,
        seen: Mutex<Vec<u64>>,
    }

    impl TallyProgressNotifier for CancelAfter {
        fn on_tally_start(&self, _total_posts: usize) {}

        fn on_post_processed(&self, post: &Post, _outcome: PostOutcome) {
            let mut seen = self.seen.lock().unwrap();
            seen.push(post.origin().post_id());
            if seen.len() >= self.after {
                self.token.cancel();
            }
        }

        fn on_tally_complete(&self, _stats: &TallyStats) {}
    }

    #[tokio::test]
    async fn test_cancelled_between_posts() {
        let token = CancellationToken::new();
        let notifier = CancelAfter {
            token: token.clone(),
            after: 1,
            seen: Mutex::new(Vec::new()),
        };
        let logger = Arc::new(RecordingLogger::default());

        let err = use_case(vec![
            post("Alice", 1, "[x] Wall"),
            post("Bob", 2, "[x] Moat"),
            post("Carol", 3, "[x] Tower"),
        ])
        .with_logger(logger.clone())
        .with_cancellation(token)
        .execute_with_progress(by_line(), &notifier)
        .await
        .unwrap_err();

        assert!(matches!(err, RunTallyError::Cancelled));
        assert_eq!(*notifier.seen.lock().unwrap(), [1]);
        let events = logger.events.lock().unwrap().clone();
        assert_eq!(events, ["tally_started", "post_processed"]);
    }

    #[tokio::test]
    async fn test_empty_thread_is_an_error() {
        let err = use_case(vec![]).execute(by_line()).await.unwrap_err();
        assert!(matches!(err, RunTallyError::NoPosts));
        assert!(!err.is_cancelled());
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let err = RunTallyUseCase::new(Arc::new(FailingSource))
            .execute(by_line())
            .await
            .unwrap_err();
        assert!(matches!(err, RunTallyError::PostSource(_)));
    }

    #[tokio::test]
    async fn test_logs_event_per_attempt() {
        let logger = Arc::new(RecordingLogger::default());
        use_case(vec![post("Alice", 1, "[x] Bob"), post("Bob", 2, "[x] Wall")])
            .with_logger(logger.clone())
            .execute(by_line())
            .await
            .unwrap();

        let events = logger.events.lock().unwrap().clone();
        assert_eq!(
            events,
            [
                "tally_started",
                "post_deferred",
                "post_processed",
                "post_processed",
                "tally_completed",
            ]
        );
    }
}
