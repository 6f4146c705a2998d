use thiserror::Error;

/// Per-comment failures. None of these stop the scan loop; the comment is
/// logged, skipped, and left out of the seen-set so a later trigger can retry.
#[derive(Debug, Error)]
pub enum HandleError {
    #[error("could not resolve the parent author: {0}")]
    Resolution(String),
    #[error("could not fetch user history: {0}")]
    Fetch(String),
    #[error("no activity found in r/{0}")]
    NoActivity(String),
    #[error("could not post reply: {0}")]
    Reply(String),
}

#[derive(Debug, Error)]
pub enum FeedError {
    /// Transient read failure; the loop retries on the next tick.
    #[error("comment feed read failed: {0}")]
    Poll(String),
    /// Unrecoverable, e.g. the login itself is rejected. Propagates to main,
    /// which flushes the seen-set before exiting.
    #[error("comment feed is unrecoverable: {0}")]
    Fatal(String),
}
