//! Proxy references to other users' votes and to named plans.

pub mod parsing;
pub mod resolver;

pub use parsing::{Reference, ReferenceLabel, parse_reference, plan_label};
pub use resolver::{ReferenceLookup, Resolution, ResolveContext, UserVote, resolve_line};
