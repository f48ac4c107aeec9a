//! Thread dump adapters implementing the post source port.

mod json_source;

pub use json_source::{JsonPostSource, RawPost};
