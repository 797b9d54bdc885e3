//! `FeedApp` wires both services to one store and one clock, and adds the
//! session-aware calls a front-end makes.

use std::sync::Arc;
use tracing::info;

use crate::auth::{Clock, SystemClock};
use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::feed::{FeedService, OwnershipPolicy};
use crate::identity::IdentityService;
use crate::image::{ImageInput, ImageLoader};
use crate::models::{Post, Session};
use crate::query::FeedQuery;
use crate::storage::{self, KeyValueStore, MemoryStore, SledStore};

pub struct FeedApp {
    pub identity: IdentityService,
    pub feed: FeedService,
}

impl FeedApp {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        bcrypt_cost: u32,
        ownership: OwnershipPolicy,
    ) -> FeedResult<Self> {
        storage::initialize(store.as_ref())?;
        Ok(Self {
            identity: IdentityService::new(store.clone(), clock.clone(), bcrypt_cost),
            feed: FeedService::new(store, clock, ownership),
        })
    }

    /// Open the Sled store named by the config.
    pub fn open(config: &FeedConfig) -> FeedResult<Self> {
        info!(data_dir = %config.data_dir.display(), ownership = ?config.ownership, "opening feed store");
        let store = SledStore::open(&config.data_dir)?;
        Self::new(
            Arc::new(store),
            Arc::new(SystemClock),
            config.bcrypt_cost,
            config.ownership,
        )
    }

    /// Throwaway in-memory app.
    pub fn in_memory(config: &FeedConfig) -> FeedResult<Self> {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock),
            config.bcrypt_cost,
            config.ownership,
        )
    }

    pub fn session(&self) -> FeedResult<Option<Session>> {
        self.identity.current_session()
    }

    /// Create a post as the logged-in user, waiting for the image first.
    pub async fn create_post(
        &self,
        text: &str,
        image: &ImageInput,
        loader: &dyn ImageLoader,
    ) -> FeedResult<Post> {
        let Some(session) = self.session()? else {
            return Err(FeedError::auth("Please login to create a post"));
        };
        let image_url = image.resolve(loader).await?;
        self.feed.create_post(Some(&session), text, &image_url)
    }

    pub async fn edit_post(
        &self,
        post_id: &str,
        text: &str,
        image: &ImageInput,
        loader: &dyn ImageLoader,
    ) -> FeedResult<Post> {
        let session = self.session()?;
        // Unknown ids fail before any file is read
        self.feed.get_post(post_id)?;
        let image_url = image.resolve(loader).await?;
        self.feed.edit_post(session.as_ref(), post_id, text, &image_url)
    }

    /// Edit only the fields given; the others keep their current value.
    pub async fn revise_post(
        &self,
        post_id: &str,
        text: Option<&str>,
        image: Option<&ImageInput>,
        loader: &dyn ImageLoader,
    ) -> FeedResult<Post> {
        let current = self.feed.get_post(post_id)?;
        let text = text.unwrap_or(current.text.as_str());
        let image = match image {
            Some(image) => image.clone(),
            None => ImageInput::url(current.image_url.clone()),
        };
        self.edit_post(post_id, text, &image, loader).await
    }

    pub fn delete_post(&self, post_id: &str) -> FeedResult<()> {
        let session = self.session()?;
        self.feed.delete_post(session.as_ref(), post_id)
    }

    pub fn toggle_like(&self, post_id: &str) -> FeedResult<Post> {
        let session = self.session()?;
        self.feed.toggle_like(session.as_ref(), post_id)
    }

    pub fn query(&self, query: &FeedQuery) -> FeedResult<Vec<Post>> {
        self.feed.query(query)
    }
}
