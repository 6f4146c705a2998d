use chrono::{Local, TimeZone};

use crate::error::HandleError;
use crate::models::{ActivityItem, ActivitySummary};

/// Upper bound on history items fetched per kind, matching the Reddit API's
/// practical listing limit.
pub const HISTORY_LIMIT: usize = 1000;

const WEEK_SECONDS: f64 = 60.0 * 60.0 * 24.0 * 7.0;

/// Reduces a user's raw history to the in-subreddit summary the reply is
/// built from: the earliest item on the subreddit, and the comments-per-day
/// rate over the 7 days leading up to the trigger.
pub fn summarize(
    comments: &[ActivityItem],
    submissions: &[ActivityItem],
    subreddit: &str,
    trigger_utc: f64,
) -> Result<ActivitySummary, HandleError> {
    let comments_scanned = comments.len();
    let submissions_scanned = submissions.len();

    let local_comments: Vec<&ActivityItem> = comments
        .iter()
        .filter(|c| c.subreddit.eq_ignore_ascii_case(subreddit))
        .collect();
    let local_submissions: Vec<&ActivityItem> = submissions
        .iter()
        .filter(|s| s.subreddit.eq_ignore_ascii_case(subreddit))
        .collect();

    let first = local_comments
        .iter()
        .chain(local_submissions.iter())
        .min_by(|a, b| a.created_utc.total_cmp(&b.created_utc))
        .ok_or_else(|| HandleError::NoActivity(subreddit.to_string()))?;

    let week_ago = trigger_utc - WEEK_SECONDS;
    let recent_comments = local_comments
        .iter()
        .filter(|c| c.created_utc > week_ago)
        .count();

    Ok(ActivitySummary {
        first: (**first).clone(),
        rate_per_day: recent_comments as f64 / 7.0,
        comments_scanned,
        submissions_scanned,
    })
}

/// Converts a Unix timestamp to a local-time "YYYY-MM-DD HH:MM:SS" string.
pub fn utc_to_human_readable(utc: f64) -> String {
    match Local.timestamp_opt(utc as i64, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::from("an unknown time"),
    }
}

pub fn compose_reply(user: &str, subreddit: &str, summary: &ActivitySummary) -> String {
    format!(
        "{} was first active in r/{} no later than {} [here](https://reddit.com{}). \
         In the past week, they have been active at a rate of {:.2} comments per day.\
         \n\n_Note: Due to Reddit API limitations, the earliest activity seen by the bot \
         might not be the actual earliest activity, but it provides an upper bound. \
         Furthermore, the bot will underestimate comment activity for users who have made \
         >1000 comments across Reddit in the past week. For this user, the bot scanned \
         {} comments and {} submissions._",
        user,
        subreddit,
        utc_to_human_readable(summary.first.created_utc),
        summary.first.permalink,
        summary.rate_per_day,
        summary.comments_scanned,
        summary.submissions_scanned,
    )
}
