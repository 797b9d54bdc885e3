//! Whole-collection persistence over a `KeyValueStore`.
//!
//! A collection is read entirely, changed in memory and written back
//! entirely. Swapping in a transactional backend only needs a new
//! `Repository` implementation; the services never touch store keys.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::FeedResult;
use crate::models::Session;
use crate::storage::{KeyValueStore, CURRENT_USER_KEY};

pub trait Repository<T> {
    fn get_all(&self) -> FeedResult<Vec<T>>;
    fn save_all(&self, items: &[T]) -> FeedResult<()>;
}

/// A JSON array snapshot stored under a single key.
pub struct JsonCollection<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _item: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _item: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> for JsonCollection<T> {
    /// A missing key reads as an empty collection
    fn get_all(&self) -> FeedResult<Vec<T>> {
        match self.store.get(self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_all(&self, items: &[T]) -> FeedResult<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set(self.key, &raw)
    }
}

/// The single "who is logged in" slot of a store.
pub struct SessionSlot {
    store: Arc<dyn KeyValueStore>,
}

impl SessionSlot {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> FeedResult<Option<Session>> {
        match self.store.get(CURRENT_USER_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set(&self, session: &Session) -> FeedResult<()> {
        let raw = serde_json::to_string(session)?;
        self.store.set(CURRENT_USER_KEY, &raw)
    }

    pub fn clear(&self) -> FeedResult<()> {
        self.store.remove(CURRENT_USER_KEY)
    }
}
