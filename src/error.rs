use thiserror::Error;

use crate::notify::{Notice, NoticeKind};

/// Every failure a feed operation can report.
///
/// The first five variants carry a message meant for direct display. The
/// rest wrap infrastructure failures and show a generic message instead.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UnsupportedType(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FeedError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        FeedError::Conflict(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        FeedError::Auth(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        FeedError::NotFound(msg.into())
    }

    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        FeedError::UnsupportedType(msg.into())
    }

    /// True for failures caused by the caller's input rather than the store.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            FeedError::Validation(_)
                | FeedError::Conflict(_)
                | FeedError::Auth(_)
                | FeedError::NotFound(_)
                | FeedError::UnsupportedType(_)
        )
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        if self.is_user_facing() {
            return self.to_string();
        }
        tracing::error!("Internal error: {}", self);
        "Something went wrong, please try again".to_string()
    }

    pub fn notice_kind(&self) -> NoticeKind {
        NoticeKind::Error
    }

    pub fn to_notice(&self) -> Notice {
        Notice::new(self.user_message(), self.notice_kind())
    }
}

pub type FeedResult<T> = Result<T, FeedError>;
