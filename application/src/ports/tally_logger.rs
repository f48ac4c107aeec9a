//! Port for structured tally event logging.
//!
//! Defines the [`TallyEventLogger`] trait for recording what happened to
//! each post (counted, deferred, skipped) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures an audit
//! trail of the tally in a machine-readable format (JSONL).

use serde::Serialize;
use tally_domain::{Post, PostOutcome, SkipReason, TallyStats};

/// Which post an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRef {
    pub thread: String,
    pub author: String,
    pub post_id: u64,
    pub post_number: u64,
}

impl PostRef {
    fn of(post: &Post) -> Self {
        let origin = post.origin();
        Self {
            thread: origin.thread().to_string(),
            author: origin.author().to_string(),
            post_id: origin.post_id(),
            post_number: origin.post_number(),
        }
    }
}

/// A structured tally event, serialized with its name in a `type` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TallyEvent {
    TallyStarted {
        source: String,
        total_posts: usize,
    },
    PostProcessed {
        #[serde(flatten)]
        post: PostRef,
        blocks: usize,
        forced: bool,
    },
    PostDeferred {
        #[serde(flatten)]
        post: PostRef,
    },
    PostSkipped {
        #[serde(flatten)]
        post: PostRef,
        reason: SkipReason,
    },
    TallyCompleted {
        #[serde(flatten)]
        stats: TallyStats,
    },
}

impl TallyEvent {
    pub fn tally_started(source: &str, total_posts: usize) -> Self {
        Self::TallyStarted {
            source: source.to_string(),
            total_posts,
        }
    }

    /// Event for one processing attempt, typed by its outcome.
    pub fn for_outcome(post: &Post, outcome: PostOutcome, forced: bool) -> Self {
        let post = PostRef::of(post);
        match outcome {
            PostOutcome::Counted { blocks } => Self::PostProcessed {
                post,
                blocks,
                forced,
            },
            PostOutcome::Deferred => Self::PostDeferred { post },
            PostOutcome::Skipped(reason) => Self::PostSkipped { post, reason },
        }
    }

    pub fn tally_completed(stats: &TallyStats) -> Self {
        Self::TallyCompleted { stats: *stats }
    }

    /// The `type` value this event is written with.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TallyStarted { .. } => "tally_started",
            Self::PostProcessed { .. } => "post_processed",
            Self::PostDeferred { .. } => "post_deferred",
            Self::PostSkipped { .. } => "post_skipped",
            Self::TallyCompleted { .. } => "tally_completed",
        }
    }

    /// The post this event is about, if any.
    pub fn post(&self) -> Option<&PostRef> {
        match self {
            Self::PostProcessed { post, .. }
            | Self::PostDeferred { post }
            | Self::PostSkipped { post, .. } => Some(post),
            Self::TallyStarted { .. } | Self::TallyCompleted { .. } => None,
        }
    }
}

/// Port for logging tally events to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures are
/// silently ignored.
pub trait TallyEventLogger: Send + Sync {
    fn log(&self, event: TallyEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoTallyLogger;

impl TallyEventLogger for NoTallyLogger {
    fn log(&self, _event: TallyEvent) {}
}
