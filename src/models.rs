use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. Never edited or deleted once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String, // lowercased + trimmed, unique across users
    pub password_hash: String,
}

impl User {
    pub fn session(&self) -> Session {
        Session {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Redacted copy of a `User` taken at login. Holds no secret.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub user_name: String, // author name as it was at creation time
    pub text: String,
    pub image_url: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// User ids that liked the post, each at most once
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub edited_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Add `user_id` to the likes if absent, otherwise remove it.
    /// Returns whether the user likes the post afterwards.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        if self.is_liked_by(user_id) {
            self.likes.retain(|id| id != user_id);
            false
        } else {
            self.likes.push(user_id.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> Post {
        Post {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            user_name: "Ana".to_string(),
            text: "hello".to_string(),
            image_url: String::new(),
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            likes: vec![],
            edited_at: None,
        }
    }

    #[test]
    fn post_uses_snapshot_field_names() {
        let json = serde_json::to_value(sample_post()).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["userName"], "Ana");
        assert_eq!(json["imageUrl"], "");
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
        assert!(json.get("editedAt").is_none());
    }

    #[test]
    fn post_reads_snapshot_without_optional_fields() {
        let raw = r#"{"id":"p2","userId":"u1","userName":"Ana","text":"hi","imageUrl":"","timestamp":1700000000000}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert!(post.likes.is_empty());
        assert!(!post.is_edited());
    }

    #[test]
    fn toggle_like_drops_duplicates_from_hand_edited_data() {
        let mut post = sample_post();
        post.likes = vec!["u2".to_string(), "u2".to_string()];
        assert!(!post.toggle_like("u2"));
        assert!(post.likes.is_empty());
    }

    #[test]
    fn session_has_no_password_field() {
        let user = User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "$2b$04$abc".to_string(),
        };
        let json = serde_json::to_value(user.session()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("passwordHash"));
        assert!(!obj.contains_key("password"));
    }
}
