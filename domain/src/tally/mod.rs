//! Thread-level tally: posts, plans, tasks and the vote counter.

pub mod plan_registry;
pub mod post;
pub mod task_list;
pub mod vote_counter;

pub use plan_registry::{Plan, PlanRegistration, PlanRegistry};
pub use post::{Post, PostState, strip_spoilers};
pub use task_list::TaskList;
pub use vote_counter::{PostOutcome, SkipReason, TallyStats, VoteCounter};
