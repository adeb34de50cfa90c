//! Change notification payloads

use serde::{Deserialize, Serialize};

/// Broadcast after a successful append: the post's new comment count
///
/// Serializes as `{"postId": "...", "count": N}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentsUpdated {
    /// Post whose thread changed
    pub post_id: String,
    /// Length of the thread after the change
    pub count: usize,
}

impl CommentsUpdated {
    pub fn new(post_id: impl Into<String>, count: usize) -> Self {
        Self {
            post_id: post_id.into(),
            count,
        }
    }
}
