use async_trait::async_trait;

use crate::error::{FeedError, HandleError};
use crate::models::{ActivityItem, Comment};

/// Everything the runtime needs from Reddit. Kept narrow so tests can drive
/// the loop with a stub instead of the network.
#[async_trait]
pub trait Platform {
    /// Returns comments not yet dispatched this session, oldest first. An
    /// empty batch means nothing new since the last poll.
    async fn poll_comments(&mut self, subreddit: &str) -> Result<Vec<Comment>, FeedError>;

    /// The author of the comment's parent, i.e. the user being asked about.
    async fn parent_author(&mut self, comment: &Comment) -> Result<String, HandleError>;

    async fn user_comments(
        &mut self,
        user: &str,
        limit: usize,
    ) -> Result<Vec<ActivityItem>, HandleError>;

    async fn user_submissions(
        &mut self,
        user: &str,
        limit: usize,
    ) -> Result<Vec<ActivityItem>, HandleError>;

    async fn reply(&mut self, comment: &Comment, text: &str) -> Result<(), HandleError>;
}
