//! Display helpers for rendering posts as text.

use chrono::{DateTime, Utc};

use crate::models::Post;

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {} ago", n, unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// "Just now", "5 minutes ago", ... or a calendar date after a week.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => plural(s / 60, "minute"),
        s if s < 86_400 => plural(s / 3_600, "hour"),
        s if s < 604_800 => plural(s / 86_400, "day"),
        _ => then.format("%b %-d, %Y").to_string(),
    }
}

pub fn like_label(count: usize) -> String {
    if count == 1 {
        "1 Like".to_string()
    } else {
        format!("{} Likes", count)
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}

pub fn post_timestamp(post: &Post, now: DateTime<Utc>) -> String {
    let mut stamp = relative_time(post.timestamp, now);
    if post.is_edited() {
        stamp.push_str(" (Edited)");
    }
    stamp
}

/// Multi-line card used by the CLI feed listing.
pub fn post_card(post: &Post, viewer_id: Option<&str>, now: DateTime<Utc>) -> String {
    let mut card = format!("{} · {}  [{}]\n", post.user_name, post_timestamp(post, now), post.id);
    if !post.text.is_empty() {
        card.push_str(&format!("  {}\n", post.text));
    }
    if !post.image_url.is_empty() {
        card.push_str(&format!("  [image] {}\n", truncate_text(&post.image_url, 60)));
    }
    let heart = match viewer_id {
        Some(id) if post.is_liked_by(id) => "❤️",
        _ => "🤍",
    };
    card.push_str(&format!("  {} {}", heart, like_label(post.like_count())));
    card
}
