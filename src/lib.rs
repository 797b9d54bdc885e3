//! feedlite: a small social feed kept in a key-value store
//!
//! Accounts (signup/login/session) and a post feed (create, edit, delete,
//! like, search, sort). Every collection lives in the store as a single
//! JSON snapshot that is read, changed and written back whole.
//!
//! The store sits behind `KeyValueStore` (Sled on disk, or in memory) and the
//! collections behind `Repository`, so the services never see raw keys.

pub mod error;
pub mod storage;
pub mod repository;
pub mod models;
pub mod auth;
pub mod identity;
pub mod feed;
// Pure search + sort over a post snapshot
pub mod query;
pub mod image;
pub mod notify;
pub mod format;
pub mod config;
pub mod logging;
pub mod app;

pub use app::FeedApp;
pub use error::{FeedError, FeedResult};
