use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn load(path: &str) -> Result<Self, anyhow::Error> {
        let data = fs::read_to_string(path)?;
        let credentials = serde_json::from_str(&data)?;
        Ok(credentials)
    }
}

/// A comment pulled from the live feed. `name` is the t1_ fullname used when
/// replying; `parent_id` may point at a comment (t1_) or a submission (t3_).
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub name: String,
    pub body: String,
    pub parent_id: String,
    pub author: String,
    pub subreddit: String,
    pub created_utc: f64,
    pub permalink: String,
}

/// One entry of a user's history, comment or submission alike.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityItem {
    pub id: String,
    pub subreddit: String,
    pub created_utc: f64,
    pub permalink: String,
}

/// Derived per-trigger result, never persisted.
#[derive(Debug, Clone)]
pub struct ActivitySummary {
    pub first: ActivityItem,
    pub rate_per_day: f64,
    pub comments_scanned: usize,
    pub submissions_scanned: usize,
}
