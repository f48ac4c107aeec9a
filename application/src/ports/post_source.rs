//! Post source port.
//!
//! Defines the interface for loading a thread's posts. Infrastructure
//! adapters implement this (e.g., reading a JSON thread dump).

use async_trait::async_trait;
use tally_domain::Post;
use thiserror::Error;

/// Errors that can occur while loading posts
#[derive(Error, Debug)]
pub enum PostSourceError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed thread dump {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Thread dump not found: {0}")]
    NotFound(String),
}

/// Port for loading the posts of one thread.
///
/// Posts may be returned in any order; the tally sorts them by id.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn load_posts(&self) -> Result<Vec<Post>, PostSourceError>;

    /// Human-readable description for logs (e.g., the file path)
    fn describe(&self) -> String;
}

/// In-memory source, for tests and callers that already hold posts.
pub struct StaticPostSource {
    posts: Vec<Post>,
}

impl StaticPostSource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl PostSource for StaticPostSource {
    async fn load_posts(&self) -> Result<Vec<Post>, PostSourceError> {
        Ok(self.posts.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory posts", self.posts.len())
    }
}
