//! Search and sort over the post collection.
//!
//! Pure functions: the caller passes the full snapshot plus the search term
//! and sort key it currently shows, and gets back a fresh view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FeedError;
use crate::models::Post;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first
    #[default]
    Latest,
    Oldest,
    /// Most likes first
    Liked,
}

impl FromStr for SortKey {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(SortKey::Latest),
            "oldest" => Ok(SortKey::Oldest),
            "liked" => Ok(SortKey::Liked),
            other => Err(FeedError::validation(format!("Unknown sort order: {}", other))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Latest => "latest",
            SortKey::Oldest => "oldest",
            SortKey::Liked => "liked",
        };
        f.write_str(name)
    }
}

/// What the feed view is currently filtered and ordered by.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub search: String,
    pub sort: SortKey,
}

impl FeedQuery {
    pub fn new(search: impl Into<String>, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }

    /// Case-insensitive substring match on the post text or author name.
    pub fn matches(&self, post: &Post) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        post.text.to_lowercase().contains(&term) || post.user_name.to_lowercase().contains(&term)
    }

    /// Filter first, then sort. Ties keep their collection order.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let mut view: Vec<Post> = posts.iter().filter(|p| self.matches(p)).cloned().collect();
        // sort_by is stable
        match self.sort {
            SortKey::Latest => view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortKey::Oldest => view.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortKey::Liked => view.sort_by(|a, b| b.like_count().cmp(&a.like_count())),
        }
        view
    }
}
