//! Post CRUD, likes and the queried feed view.
//!
//! Every operation reloads the full `posts` snapshot, so the view is always
//! computed from what is persisted right now.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{self, Clock};
use crate::error::{FeedError, FeedResult};
use crate::models::{Post, Session};
use crate::notify::{Notice, NoticeKind};
use crate::query::FeedQuery;
use crate::repository::{JsonCollection, Repository};
use crate::storage::{KeyValueStore, POSTS_KEY};

/// Who may edit or delete a post.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipPolicy {
    /// Only the author, and only with a session
    #[default]
    Author,
    /// Anyone who can call the operation
    Open,
}

impl FromStr for OwnershipPolicy {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "author" => Ok(OwnershipPolicy::Author),
            "open" => Ok(OwnershipPolicy::Open),
            other => Err(FeedError::validation(format!("Unknown ownership policy: {}", other))),
        }
    }
}

pub struct FeedService {
    posts: Box<dyn Repository<Post> + Send + Sync>,
    clock: Arc<dyn Clock>,
    ownership: OwnershipPolicy,
}

impl FeedService {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ownership: OwnershipPolicy) -> Self {
        Self {
            posts: Box::new(JsonCollection::new(store, POSTS_KEY)),
            clock,
            ownership,
        }
    }

    pub fn ownership(&self) -> OwnershipPolicy {
        self.ownership
    }

    pub fn create_post(&self, session: Option<&Session>, text: &str, image_url: &str) -> FeedResult<Post> {
        let session = session.ok_or_else(|| FeedError::auth("Please login to create a post"))?;
        let text = text.trim();
        let image_url = image_url.trim();
        if text.is_empty() && image_url.is_empty() {
            return Err(FeedError::validation("Post cannot be empty"));
        }

        let now = self.clock.now();
        let post = Post {
            id: auth::generate_id(now),
            user_id: session.id.clone(),
            user_name: session.name.clone(),
            text: text.to_string(),
            image_url: image_url.to_string(),
            timestamp: now,
            likes: vec![],
            edited_at: None,
        };

        let mut posts = self.posts.get_all()?;
        posts.insert(0, post.clone());
        self.posts.save_all(&posts)?;
        info!(post_id = %post.id, user_id = %post.user_id, "post created");
        Ok(post)
    }

    /// Deleting an id that is not there is a no-op.
    pub fn delete_post(&self, session: Option<&Session>, post_id: &str) -> FeedResult<()> {
        let mut posts = self.posts.get_all()?;
        let Some(index) = posts.iter().position(|p| p.id == post_id) else {
            debug!(post_id, "delete of unknown post ignored");
            return Ok(());
        };
        self.check_owner(session, &posts[index])?;

        posts.remove(index);
        self.posts.save_all(&posts)?;
        info!(post_id, "post deleted");
        Ok(())
    }

    pub fn edit_post(
        &self,
        session: Option<&Session>,
        post_id: &str,
        new_text: &str,
        new_image_url: &str,
    ) -> FeedResult<Post> {
        let mut posts = self.posts.get_all()?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| FeedError::not_found("Post not found"))?;
        self.check_owner(session, post)?;

        let text = new_text.trim();
        let image_url = new_image_url.trim();
        if text.is_empty() && image_url.is_empty() {
            return Err(FeedError::validation("Post cannot be empty"));
        }

        post.text = text.to_string();
        post.image_url = image_url.to_string();
        post.edited_at = Some(self.clock.now());
        let updated = post.clone();

        self.posts.save_all(&posts)?;
        info!(post_id, "post edited");
        Ok(updated)
    }

    pub fn toggle_like(&self, session: Option<&Session>, post_id: &str) -> FeedResult<Post> {
        let session = session.ok_or_else(|| FeedError::auth("Please login to like posts"))?;
        let mut posts = self.posts.get_all()?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| FeedError::not_found("Post not found"))?;

        let liked = post.toggle_like(&session.id);
        let updated = post.clone();
        self.posts.save_all(&posts)?;
        debug!(post_id, user_id = %session.id, liked, "like toggled");
        Ok(updated)
    }

    pub fn get_post(&self, post_id: &str) -> FeedResult<Post> {
        self.posts
            .get_all()?
            .into_iter()
            .find(|p| p.id == post_id)
            .ok_or_else(|| FeedError::not_found("Post not found"))
    }

    /// The feed as it should be shown for `query`.
    pub fn query(&self, query: &FeedQuery) -> FeedResult<Vec<Post>> {
        let posts = self.posts.get_all()?;
        let view = query.apply(&posts);
        debug!(total = posts.len(), shown = view.len(), sort = %query.sort, "feed queried");
        Ok(view)
    }

    fn check_owner(&self, session: Option<&Session>, post: &Post) -> FeedResult<()> {
        if self.ownership == OwnershipPolicy::Open {
            return Ok(());
        }
        let session = session.ok_or_else(|| FeedError::auth("Please login to manage posts"))?;
        if !post.is_owned_by(&session.id) {
            return Err(FeedError::auth("You can only modify your own posts"));
        }
        Ok(())
    }
}

pub fn created_notice() -> Notice {
    Notice::success("Post created successfully!")
}

pub fn edited_notice() -> Notice {
    Notice::new("Post updated successfully!", NoticeKind::Edit)
}

pub fn deleted_notice() -> Notice {
    Notice::new("Post deleted successfully", NoticeKind::Delete)
}
