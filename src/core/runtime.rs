use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Duration};

use crate::core::activity::{self, HISTORY_LIMIT};
use crate::error::FeedError;
use crate::error::HandleError;
use crate::models::Comment;
use crate::traits::Platform;

const POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Replied,
    AlreadySeen,
}

pub struct Runtime<P: Platform> {
    platform: P,
    seen: HashSet<String>,
    subreddit: String,
    trigger: String,
}

/// Case-insensitive substring test. A body containing the trigger anywhere
/// matches, including inside a longer word.
pub fn contains_trigger(body: &str, trigger: &str) -> bool {
    body.to_lowercase().contains(&trigger.to_lowercase())
}

impl<P: Platform> Runtime<P> {
    pub fn new(platform: P, seen: HashSet<String>, subreddit: &str, trigger: &str) -> Self {
        Runtime {
            platform,
            seen,
            subreddit: subreddit.to_string(),
            trigger: trigger.to_string(),
        }
    }

    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    /// The scan loop: poll, filter for the trigger, handle matches one at a
    /// time. A slow handler delays scanning of later comments; that is
    /// intentional, there is no parallel dispatch. The shutdown flag is
    /// checked between iterations so the loop can be stopped without signals.
    pub async fn run(&mut self, shutdown: Arc<AtomicBool>) -> Result<(), anyhow::Error> {
        println!(
            "Listening for \"{}\" in r/{}...",
            self.trigger, self.subreddit
        );

        while !shutdown.load(Ordering::SeqCst) {
            let batch = match self.platform.poll_comments(&self.subreddit).await {
                Ok(batch) => batch,
                Err(FeedError::Poll(reason)) => {
                    eprintln!("Feed read failed, retrying next tick: {}", reason);
                    Vec::new()
                }
                Err(err) => return Err(err.into()),
            };

            for comment in &batch {
                if !contains_trigger(&comment.body, &self.trigger) {
                    continue;
                }
                match self.handle_comment(comment).await {
                    Ok(Outcome::Replied) => {}
                    Ok(Outcome::AlreadySeen) => {}
                    Err(err) => eprintln!("Skipping comment {}: {}", comment.id, err),
                }
            }

            if shutdown.load(Ordering::SeqCst) {
                break;
            }
            sleep(Duration::from_secs(POLL_INTERVAL_SECS)).await;
        }

        Ok(())
    }

    /// Runs the activity check for one triggering comment. The id is marked
    /// seen only after a successful reply, so any failure here leaves the
    /// comment eligible for a retry on a future trigger.
    pub(crate) async fn handle_comment(&mut self, comment: &Comment) -> Result<Outcome, HandleError> {
        if self.seen.contains(&comment.id) {
            return Ok(Outcome::AlreadySeen);
        }

        let user = self.platform.parent_author(comment).await?;

        let comments = self.platform.user_comments(&user, HISTORY_LIMIT).await?;
        let submissions = self.platform.user_submissions(&user, HISTORY_LIMIT).await?;

        let summary =
            activity::summarize(&comments, &submissions, &comment.subreddit, comment.created_utc)?;
        let message = activity::compose_reply(&user, &comment.subreddit, &summary);

        self.platform.reply(comment, &message).await?;
        self.seen.insert(comment.id.clone());

        println!("{}", message);
        println!("{}", "-".repeat(50));
        println!(
            "Replied to {} (reddit.com{})",
            comment.author, comment.permalink
        );

        Ok(Outcome::Replied)
    }
}
