use bcrypt::{hash, verify};
use chrono::{DateTime, SubsecRound, Utc};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub const MIN_PASSWORD_LEN: usize = 6;

/// bcrypt's accepted work-factor range
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Basic `local@domain.tld` shape check, nothing more.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Opaque id: creation time in millis (base 36) followed by a random suffix.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u64;
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", to_base36(millis), &suffix[..12])
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Source of "now" for everything that stamps ids and posts.
///
/// Instants are stored as epoch milliseconds, so clocks must not hand out
/// finer precision than that.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ana@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("ana x@y.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ana"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  ANA@X.Com "), "ana@x.com");
    }

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("secret1", MIN_BCRYPT_COST).unwrap();
        assert_ne!(hashed, "secret1");
        assert!(verify_password("secret1", &hashed).unwrap());
        assert!(!verify_password("Secret1", &hashed).unwrap());
    }

    #[test]
    fn test_ids_are_distinct() {
        let now = Utc::now();
        let a = generate_id(now);
        let b = generate_id(now);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_system_clock_has_millisecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
