use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{FeedError, HandleError};
use crate::models::{ActivityItem, Comment, Credentials};
use crate::traits::Platform;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const PAGE_SIZE: usize = 100;
// How many dispatched fullnames the feed window remembers.
const WINDOW_CAP: usize = 1000;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

struct Session {
    token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Listing {
    #[serde(default)]
    pub(crate) data: ListingData,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub(crate) after: Option<String>,
    #[serde(default)]
    pub(crate) children: Vec<Thing>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Thing {
    #[serde(default)]
    pub(crate) data: ThingData,
}

// Reddit returns different field subsets for comments, submissions, and info
// lookups; defaults keep one wire struct workable for all three.
#[derive(Debug, Deserialize, Default)]
pub(crate) struct ThingData {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) body: String,
    #[serde(default)]
    pub(crate) parent_id: String,
    #[serde(default)]
    pub(crate) author: Option<String>,
    #[serde(default)]
    pub(crate) subreddit: String,
    #[serde(default)]
    pub(crate) created_utc: f64,
    #[serde(default)]
    pub(crate) permalink: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    json: ApiJson,
}

#[derive(Debug, Deserialize, Default)]
struct ApiJson {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

pub(crate) fn parse_listing(body: &str) -> serde_json::Result<(Option<String>, Vec<ThingData>)> {
    let listing: Listing = serde_json::from_str(body)?;
    let items = listing.data.children.into_iter().map(|t| t.data).collect();
    Ok((listing.data.after, items))
}

/// Filters out the author values Reddit uses for removed accounts.
pub(crate) fn usable_author(author: Option<&str>) -> Option<String> {
    match author {
        Some(name) if !name.is_empty() && name != "[deleted]" => Some(name.to_string()),
        _ => None,
    }
}

fn comment_from(data: ThingData) -> Comment {
    Comment {
        id: data.id,
        name: data.name,
        body: data.body,
        parent_id: data.parent_id,
        author: data.author.unwrap_or_default(),
        subreddit: data.subreddit,
        created_utc: data.created_utc,
        permalink: data.permalink,
    }
}

fn activity_from(data: ThingData) -> ActivityItem {
    ActivityItem {
        id: data.id,
        subreddit: data.subreddit,
        created_utc: data.created_utc,
        permalink: data.permalink,
    }
}

/// Password-grant OAuth client for the Reddit API. The token is cached with
/// its expiry and refreshed in place; a 401 mid-flight triggers one re-login
/// before the request is reported as failed.
pub struct RedditClient {
    http: reqwest::Client,
    credentials: Credentials,
    session: Option<Session>,
    window: HashSet<String>,
    window_order: VecDeque<String>,
}

impl RedditClient {
    pub fn new(credentials: Credentials) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        RedditClient {
            http,
            credentials,
            session: None,
            window: HashSet::new(),
            window_order: VecDeque::new(),
        }
    }

    pub async fn login(&mut self) -> Result<()> {
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(USER_AGENT, &self.credentials.user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Login failed with status: {}. Response: {}",
                status,
                error_text
            ));
        }

        let token: TokenResponse = response.json().await?;
        // Refresh a minute early so requests never race the expiry.
        let lifetime = token.expires_in.saturating_sub(60).max(60);
        self.session = Some(Session {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(())
    }

    async fn ensure_session(&mut self) -> Result<String> {
        let expired = match &self.session {
            Some(session) => Instant::now() >= session.expires_at,
            None => true,
        };
        if expired {
            self.login().await?;
        }
        match &self.session {
            Some(session) => Ok(session.token.clone()),
            None => Err(anyhow!("No session after login")),
        }
    }

    async fn get_text(&mut self, url: &str) -> Result<String> {
        let mut retried = false;
        loop {
            let token = self.ensure_session().await?;
            let response = self
                .http
                .get(url)
                .bearer_auth(&token)
                .header(USER_AGENT, &self.credentials.user_agent)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                self.session = None;
                continue;
            }
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(anyhow!(
                    "API request failed with status: {}. Response: {}",
                    status,
                    error_text
                ));
            }
            return Ok(response.text().await?);
        }
    }

    async fn post_form(&mut self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        let mut retried = false;
        loop {
            let token = self.ensure_session().await?;
            let response = self
                .http
                .post(url)
                .bearer_auth(&token)
                .header(USER_AGENT, &self.credentials.user_agent)
                .form(form)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                self.session = None;
                continue;
            }
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(anyhow!(
                    "API request failed with status: {}. Response: {}",
                    status,
                    error_text
                ));
            }
            return Ok(response.text().await?);
        }
    }

    /// One poll of the newest comments on the subreddit. Items already
    /// dispatched this session are dropped; the rest come back oldest first
    /// so handling preserves feed order.
    async fn fetch_new_comments(&mut self, subreddit: &str) -> Result<Vec<Comment>, FeedError> {
        // A failed login means bad credentials, not a transient blip.
        self.ensure_session()
            .await
            .map_err(|e| FeedError::Fatal(e.to_string()))?;

        let url = format!(
            "{}/r/{}/comments?limit={}&raw_json=1",
            API_BASE, subreddit, PAGE_SIZE
        );
        let body = self
            .get_text(&url)
            .await
            .map_err(|e| FeedError::Poll(e.to_string()))?;
        let (_, items) = parse_listing(&body).map_err(|e| FeedError::Poll(e.to_string()))?;

        let mut fresh = Vec::new();
        for item in items.into_iter().rev() {
            if item.name.is_empty() || !self.window.insert(item.name.clone()) {
                continue;
            }
            self.window_order.push_back(item.name.clone());
            fresh.push(comment_from(item));
        }
        while self.window_order.len() > WINDOW_CAP {
            if let Some(oldest) = self.window_order.pop_front() {
                self.window.remove(&oldest);
            }
        }
        Ok(fresh)
    }

    async fn fetch_parent_author(&mut self, comment: &Comment) -> Result<String, HandleError> {
        let url = format!(
            "{}/api/info?id={}&raw_json=1",
            API_BASE, comment.parent_id
        );
        let body = self
            .get_text(&url)
            .await
            .map_err(|e| HandleError::Resolution(e.to_string()))?;
        let (_, items) =
            parse_listing(&body).map_err(|e| HandleError::Resolution(e.to_string()))?;

        items
            .first()
            .and_then(|item| usable_author(item.author.as_deref()))
            .ok_or_else(|| {
                HandleError::Resolution(format!(
                    "parent {} has no resolvable author",
                    comment.parent_id
                ))
            })
    }

    /// Pages through /user/{name}/{feed} newest-first until `limit` items or
    /// the listing runs out.
    async fn fetch_user_history(
        &mut self,
        user: &str,
        feed: &str,
        limit: usize,
    ) -> Result<Vec<ActivityItem>, HandleError> {
        let mut items = Vec::new();
        let mut after: Option<String> = None;

        while items.len() < limit {
            let mut url = format!(
                "{}/user/{}/{}?sort=new&limit={}&raw_json=1",
                API_BASE, user, feed, PAGE_SIZE
            );
            if let Some(ref cursor) = after {
                url.push_str(&format!("&after={}", cursor));
            }

            let body = self
                .get_text(&url)
                .await
                .map_err(|e| HandleError::Fetch(e.to_string()))?;
            let (next, page) =
                parse_listing(&body).map_err(|e| HandleError::Fetch(e.to_string()))?;

            if page.is_empty() {
                break;
            }
            items.extend(page.into_iter().map(activity_from));

            match next {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        items.truncate(limit);
        Ok(items)
    }

    async fn post_reply(&mut self, comment: &Comment, text: &str) -> Result<(), HandleError> {
        let url = format!("{}/api/comment", API_BASE);
        let body = self
            .post_form(
                &url,
                &[
                    ("api_type", "json"),
                    ("thing_id", comment.name.as_str()),
                    ("text", text),
                ],
            )
            .await
            .map_err(|e| HandleError::Reply(e.to_string()))?;

        let response: ApiResponse =
            serde_json::from_str(&body).map_err(|e| HandleError::Reply(e.to_string()))?;
        if !response.json.errors.is_empty() {
            return Err(HandleError::Reply(format!(
                "API returned errors: {:?}",
                response.json.errors
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Platform for RedditClient {
    async fn poll_comments(&mut self, subreddit: &str) -> Result<Vec<Comment>, FeedError> {
        self.fetch_new_comments(subreddit).await
    }

    async fn parent_author(&mut self, comment: &Comment) -> Result<String, HandleError> {
        self.fetch_parent_author(comment).await
    }

    async fn user_comments(
        &mut self,
        user: &str,
        limit: usize,
    ) -> Result<Vec<ActivityItem>, HandleError> {
        self.fetch_user_history(user, "comments", limit).await
    }

    async fn user_submissions(
        &mut self,
        user: &str,
        limit: usize,
    ) -> Result<Vec<ActivityItem>, HandleError> {
        self.fetch_user_history(user, "submitted", limit).await
    }

    async fn reply(&mut self, comment: &Comment, text: &str) -> Result<(), HandleError> {
        self.post_reply(comment, text).await
    }
}
