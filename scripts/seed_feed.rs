//! Seed script for the feedlite store
//!
//! Creates a few demo accounts and posts, with likes spread across them,
//! so the feed has something to search and sort.
//! Run: cargo run --bin seed_feed
//! Demo accounts all use the password `secret1`.

use feedlite::config::FeedConfig;
use feedlite::query::{FeedQuery, SortKey};
use feedlite::{logging, FeedApp, FeedError};
use tracing::info;

const PASSWORD: &str = "secret1";

const ACCOUNTS: [(&str, &str); 3] = [
    ("Ana", "ana@example.com"),
    ("Bruno", "bruno@example.com"),
    ("Chen", "chen@example.com"),
];

const POSTS: [(usize, &str, &str); 5] = [
    (0, "Hello feedlite!", ""),
    (1, "Morning run done, 10k in the rain", ""),
    (2, "", "https://picsum.photos/seed/feedlite/600/400"),
    (0, "Anyone up for board games tonight?", ""),
    (1, "Trying out the new search box", ""),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = FeedConfig::from_env();
    let _log_guard = logging::init(&config.log);
    let app = FeedApp::open(&config)?;

    for (name, email) in ACCOUNTS {
        match app.identity.signup(name, email, PASSWORD) {
            Ok(_) => info!(email, "created demo account"),
            Err(FeedError::Conflict(_)) => info!(email, "demo account already exists"),
            Err(err) => return Err(err.into()),
        }
    }

    let mut sessions = Vec::new();
    for (_, email) in ACCOUNTS {
        sessions.push(app.identity.login(email, PASSWORD)?);
    }

    let mut post_ids = Vec::new();
    for (author, text, image_url) in POSTS {
        let post = app.feed.create_post(Some(&sessions[author]), text, image_url)?;
        post_ids.push(post.id);
    }

    // Post i gets liked by the first i accounts, so "liked" sorting differs from "latest"
    for (i, post_id) in post_ids.iter().enumerate() {
        for session in sessions.iter().take(i) {
            app.feed.toggle_like(Some(session), post_id)?;
        }
    }

    app.identity.logout()?;

    let total = app.query(&FeedQuery::new("", SortKey::Latest))?.len();
    println!("✅ Seeded {} accounts and {} posts ({} posts in store)", ACCOUNTS.len(), POSTS.len(), total);
    println!("🔑 Log in with any demo email and password `{}`", PASSWORD);
    Ok(())
}
