//! Signup, login and session tracking over the `users` collection.

use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

use crate::auth::{self, Clock, MIN_PASSWORD_LEN};
use crate::error::{FeedError, FeedResult};
use crate::models::{Session, User};
use crate::notify::Notice;
use crate::repository::{JsonCollection, Repository, SessionSlot};
use crate::storage::{KeyValueStore, USERS_KEY};

const BAD_CREDENTIALS: &str = "Incorrect email or password";

pub struct IdentityService {
    users: Box<dyn Repository<User> + Send + Sync>,
    session: SessionSlot,
    clock: Arc<dyn Clock>,
    bcrypt_cost: u32,
    /// Hash checked when no account matches, so every login pays one verify
    decoy_hash: OnceLock<String>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, bcrypt_cost: u32) -> Self {
        Self {
            users: Box::new(JsonCollection::new(store.clone(), USERS_KEY)),
            session: SessionSlot::new(store),
            clock,
            bcrypt_cost,
            decoy_hash: OnceLock::new(),
        }
    }

    pub fn signup(&self, name: &str, email: &str, password: &str) -> FeedResult<Notice> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(FeedError::validation("All fields are required"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FeedError::validation(
                "Password must be at least 6 characters long",
            ));
        }
        let email = auth::normalize_email(email);
        if !auth::is_valid_email(&email) {
            return Err(FeedError::validation("Please enter a valid email address"));
        }

        let mut users = self.users.get_all()?;
        if users.iter().any(|u| auth::normalize_email(&u.email) == email) {
            return Err(FeedError::conflict(
                "An account with this email already exists",
            ));
        }

        let user = User {
            id: auth::generate_id(self.clock.now()),
            name: name.trim().to_string(),
            email,
            password_hash: auth::hash_password(password, self.bcrypt_cost)?,
        };
        info!(user_id = %user.id, email = %user.email, "user signed up");
        users.push(user);
        self.users.save_all(&users)?;

        Ok(Notice::success(
            "Account created successfully! Redirecting to login...",
        ))
    }

    /// Unknown email and wrong password fail with the same message.
    pub fn login(&self, email: &str, password: &str) -> FeedResult<Session> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(FeedError::validation("Email and password are required"));
        }

        let email = auth::normalize_email(email);
        let users = self.users.get_all()?;
        let mut matched = None;
        for user in users.iter().filter(|u| auth::normalize_email(&u.email) == email) {
            if auth::verify_password(password, &user.password_hash)? {
                matched = Some(user);
                break;
            }
        }

        let Some(user) = matched else {
            if users.iter().all(|u| auth::normalize_email(&u.email) != email) {
                auth::verify_password(password, self.decoy_hash()?)?;
            }
            warn!(email = %email, "rejected login");
            return Err(FeedError::auth(BAD_CREDENTIALS));
        };

        let session = user.session();
        self.session.set(&session)?;
        info!(user_id = %session.id, "user logged in");
        Ok(session)
    }

    pub fn logout(&self) -> FeedResult<()> {
        self.session.clear()?;
        info!("session cleared");
        Ok(())
    }

    pub fn current_session(&self) -> FeedResult<Option<Session>> {
        self.session.get()
    }

    pub fn is_authenticated(&self) -> FeedResult<bool> {
        Ok(self.current_session()?.is_some())
    }

    fn decoy_hash(&self) -> FeedResult<&str> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash.as_str());
        }
        let hash = auth::hash_password(&auth::generate_id(self.clock.now()), self.bcrypt_cost)?;
        Ok(self.decoy_hash.get_or_init(|| hash).as_str())
    }

    pub fn user_count(&self) -> FeedResult<usize> {
        Ok(self.users.get_all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_clock::StepClock;
    use crate::storage::MemoryStore;

    fn service() -> IdentityService {
        IdentityService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StepClock::new()),
            auth::MIN_BCRYPT_COST,
        )
    }

    #[test]
    fn test_signup_password_length_boundary() {
        let identity = service();
        let err = identity.signup("Ana", "ana@x.com", "12345").unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters long");
        assert!(matches!(err, FeedError::Validation(_)));

        let notice = identity.signup("Ana", "ana@x.com", "123456").unwrap();
        assert_eq!(notice.message, "Account created successfully! Redirecting to login...");
    }

    #[test]
    fn test_signup_requires_all_fields() {
        let identity = service();
        for (name, email, password) in [
            ("", "ana@x.com", "secret1"),
            ("Ana", "", "secret1"),
            ("Ana", "ana@x.com", ""),
            ("   ", "ana@x.com", "secret1"),
        ] {
            let err = identity.signup(name, email, password).unwrap_err();
            assert_eq!(err.to_string(), "All fields are required");
        }
        assert_eq!(identity.user_count().unwrap(), 0);
    }

    #[test]
    fn test_signup_rejects_bad_email() {
        let identity = service();
        let err = identity.signup("Ana", "ana.x.com", "secret1").unwrap_err();
        assert!(matches!(err, FeedError::Validation(_)));
        assert_eq!(err.to_string(), "Please enter a valid email address");
    }

    #[test]
    fn test_duplicate_email_conflicts_for_any_case_or_spacing() {
        let identity = service();
        identity.signup("Ana", "ana@x.com", "secret1").unwrap();

        for variant in ["ana@x.com", "ANA@X.COM", "  Ana@x.com  "] {
            let err = identity.signup("Other", variant, "secret2").unwrap_err();
            assert!(matches!(err, FeedError::Conflict(_)), "variant {variant:?}");
        }
        assert_eq!(identity.user_count().unwrap(), 1);
    }

    #[test]
    fn test_signup_normalizes_name_and_email() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let identity = IdentityService::new(store.clone(), Arc::new(StepClock::new()), auth::MIN_BCRYPT_COST);
        identity.signup("  Ana  ", " ANA@X.COM ", "secret1").unwrap();

        let repo: JsonCollection<User> = JsonCollection::new(store, USERS_KEY);
        let users = repo.get_all().unwrap();
        assert_eq!(users[0].name, "Ana");
        assert_eq!(users[0].email, "ana@x.com");
        assert_ne!(users[0].password_hash, "secret1");
    }

    #[test]
    fn test_login_success_returns_redacted_session() {
        let identity = service();
        identity.signup("Ana", "ana@x.com", "secret1").unwrap();

        let session = identity.login("ANA@X.COM", "secret1").unwrap();
        assert_eq!(session.email, "ana@x.com");
        assert_eq!(session.name, "Ana");
        assert_eq!(identity.current_session().unwrap(), Some(session.clone()));
        assert!(identity.is_authenticated().unwrap());

        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_login_failures_share_one_message() {
        let identity = service();
        identity.signup("Ana", "ana@x.com", "secret1").unwrap();

        let wrong_password = identity.login("ana@x.com", "SECRET1").unwrap_err();
        let unknown_email = identity.login("bob@x.com", "secret1").unwrap_err();

        assert!(matches!(wrong_password, FeedError::Auth(_)));
        assert!(matches!(unknown_email, FeedError::Auth(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(!identity.is_authenticated().unwrap());
    }

    #[test]
    fn test_unknown_email_still_runs_a_password_check() {
        let identity = service();
        identity.signup("Ana", "ana@x.com", "secret1").unwrap();
        assert!(identity.decoy_hash.get().is_none());

        let err = identity.login("nobody@x.com", "secret1").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");
        let decoy = identity.decoy_hash.get().expect("decoy hash used for unknown email");
        assert!(!auth::verify_password("secret1", decoy).unwrap());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let identity = service();
        let err = identity.login("", "secret1").unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required");
        let err = identity.login("ana@x.com", "").unwrap_err();
        assert!(matches!(err, FeedError::Validation(_)));
    }

    #[test]
    fn test_logout_is_unconditional() {
        let identity = service();
        identity.logout().unwrap();

        identity.signup("Ana", "ana@x.com", "secret1").unwrap();
        identity.login("ana@x.com", "secret1").unwrap();
        identity.logout().unwrap();
        assert_eq!(identity.current_session().unwrap(), None);
    }
}
