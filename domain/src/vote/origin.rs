//! Who contributed a vote.

use crate::core::agnostic;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Whether a supporter is a person or a named plan
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    #[default]
    User,
    Plan,
}

/// An author's identity for one contribution
///
/// Two origins are the same supporter when thread, identity type and the
/// agnostic author name match. Post id, number and permalink are metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Origin {
    author: String,
    identity: IdentityType,
    post_id: u64,
    post_number: u64,
    thread: String,
    permalink: String,
    #[serde(skip)]
    author_key: String,
}

impl Origin {
    pub fn new(author: impl Into<String>, post_id: u64, post_number: u64) -> Self {
        let author = author.into();
        Self {
            author_key: agnostic::normalize(&author),
            author,
            identity: IdentityType::User,
            post_id,
            post_number,
            thread: String::new(),
            permalink: String::new(),
        }
    }

    /// The plan identity derived from the post that declared it
    pub fn plan(name: impl Into<String>, declaring: &Origin) -> Self {
        let name = name.into();
        Self {
            author_key: agnostic::normalize(&name),
            author: name,
            identity: IdentityType::Plan,
            ..declaring.clone()
        }
    }

    pub fn with_thread(mut self, thread: impl Into<String>) -> Self {
        self.thread = thread.into();
        self
    }

    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = permalink.into();
        self
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn identity(&self) -> IdentityType {
        self.identity
    }

    pub fn is_user(&self) -> bool {
        self.identity == IdentityType::User
    }

    pub fn post_id(&self) -> u64 {
        self.post_id
    }

    pub fn post_number(&self) -> u64 {
        self.post_number
    }

    pub fn thread(&self) -> &str {
        &self.thread
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    /// Agnostic form of the author name
    pub fn author_key(&self) -> &str {
        &self.author_key
    }

    pub fn is_author(&self, name: &str) -> bool {
        self.author_key == agnostic::normalize(name)
    }

    fn key(&self) -> (&str, IdentityType, &str) {
        (&self.thread, self.identity, &self.author_key)
    }
}

impl PartialEq for Origin {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Origin {}

impl Hash for Origin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Origin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Origin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.identity {
            IdentityType::User => write!(f, "{}", self.author),
            IdentityType::Plan => write!(f, "Plan: {}", self.author),
        }
    }
}
