//! Thread dumps stored as JSON files.
//!
//! A dump is either a bare array of posts or an object carrying the thread
//! address alongside them:
//!
//! ```json
//! { "thread": "https://forum.example/threads/quest.123",
//!   "posts": [ { "author": "Alice", "id": 9001, "number": 12, "text": "[x] Wall" } ] }
//! ```
//!
//! Several files (e.g. one per page) can be read together; posts from all of
//! them are combined.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tally_application::ports::post_source::{PostSource, PostSourceError};
use tally_domain::{Origin, Post};
use tracing::debug;

/// One post as stored in a dump
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub author: String,
    /// Forum-wide post id; orders posts
    pub id: u64,
    /// Position in the thread; defaults to the id
    #[serde(default)]
    pub number: Option<u64>,
    pub text: String,
    #[serde(default)]
    pub permalink: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThreadDump {
    Posts(Vec<RawPost>),
    Thread {
        #[serde(default)]
        thread: Option<String>,
        posts: Vec<RawPost>,
    },
}

impl ThreadDump {
    fn into_parts(self) -> (Option<String>, Vec<RawPost>) {
        match self {
            ThreadDump::Posts(posts) => (None, posts),
            ThreadDump::Thread { thread, posts } => (thread, posts),
        }
    }
}

/// Post source reading one or more JSON thread dumps
pub struct JsonPostSource {
    paths: Vec<PathBuf>,
    thread: Option<String>,
}

impl JsonPostSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            thread: None,
        }
    }

    /// Thread address used for posts whose dump does not name one
    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    /// Parse one dump's contents.
    pub fn parse_dump(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<Vec<Post>, PostSourceError> {
        let dump: ThreadDump =
            serde_json::from_str(contents).map_err(|e| PostSourceError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let (thread, raw_posts) = dump.into_parts();
        let thread = thread.or_else(|| self.thread.clone()).unwrap_or_default();

        Ok(raw_posts
            .into_iter()
            .map(|raw| {
                let mut origin = Origin::new(raw.author, raw.id, raw.number.unwrap_or(raw.id))
                    .with_thread(thread.clone());
                if let Some(permalink) = raw.permalink {
                    origin = origin.with_permalink(permalink);
                }
                Post::new(origin, raw.text)
            })
            .collect())
    }

    async fn read_dump(&self, path: &Path) -> Result<Vec<Post>, PostSourceError> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PostSourceError::NotFound(path.display().to_string())
            } else {
                PostSourceError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;
        let posts = self.parse_dump(path, &contents)?;
        debug!("Read {} posts from {}", posts.len(), path.display());
        Ok(posts)
    }
}

#[async_trait]
impl PostSource for JsonPostSource {
    async fn load_posts(&self) -> Result<Vec<Post>, PostSourceError> {
        let dumps = try_join_all(self.paths.iter().map(|path| self.read_dump(path))).await?;
        Ok(dumps.into_iter().flatten().collect())
    }

    fn describe(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
