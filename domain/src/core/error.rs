//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Malformed post text never surfaces here: lines that do not match the vote
/// grammar are simply absent from the tally. These variants cover contract
/// violations and configuration that the caller owns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("A vote block needs at least one line")]
    EmptyBlock,

    #[error(
        "Unknown partition mode: {0}. Valid: none, line, line_task, block, block_all"
    )]
    UnknownPartitionMode(String),
}
