//! Vote line grammar and value types.
//!
//! - [`tokenizer`]: raw text to [`VoteLine`]
//! - [`markup`]: strip and balance inline BBCode
//! - [`VoteLineBlock`]: one countable unit of one or more lines
//! - [`Origin`]: who submitted a vote

pub mod block;
pub mod line;
pub mod marker;
pub mod markup;
pub mod origin;
pub mod tokenizer;

pub use block::VoteLineBlock;
pub use line::VoteLine;
pub use marker::{Marker, MarkerType};
pub use markup::{normalize_markup, strip_markup};
pub use origin::{IdentityType, Origin};
pub use tokenizer::{parse_line, parse_lines};
