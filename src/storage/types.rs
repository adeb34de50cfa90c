//! Core data types for the comment store
//!
//! - `Comment`: one submitted entry in a post's thread
//! - `encode_comments` / `decode_comments`: the persisted blob format
//! - `count_label`: badge text for a comment count

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageResult;

/// Length of the random part of a comment ID
const ID_SUFFIX_LEN: usize = 9;

/// A single comment on a post
///
/// Serialized as `{id, name, email, message, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// `<millis>-<random suffix>`, unique within a post's list
    pub id: String,
    /// Author name (trimmed, non-empty)
    pub name: String,
    /// Author email (trimmed, non-empty, not otherwise validated)
    pub email: String,
    /// Comment body (trimmed, non-empty)
    pub message: String,
    /// Creation time, Unix milliseconds
    pub timestamp: i64,
}

impl Comment {
    /// Create a comment stamped with the current time and a fresh ID
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(name, email, message, Utc::now().timestamp_millis())
    }

    /// Create a comment with a specific timestamp
    pub fn with_timestamp(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: generate_id(timestamp),
            name: name.into(),
            email: email.into(),
            message: message.into(),
            timestamp,
        }
    }

    /// Creation time as a UTC datetime
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }

    /// Human-readable creation date, e.g. "October 18, 2026 at 09:30 AM"
    pub fn display_date(&self) -> String {
        self.created_at()
            .format("%B %-d, %Y at %I:%M %p")
            .to_string()
    }

    /// Uppercased first character of the author name, for avatars
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().and_then(|c| c.to_uppercase().next())
    }
}

/// Build a comment ID from a timestamp plus a random suffix.
///
/// Two IDs minted in the same millisecond collide only if their suffixes do.
fn generate_id(timestamp: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", timestamp, &suffix[..ID_SUFFIX_LEN])
}

/// Serialize a comment list into its persisted form (a JSON array)
pub fn encode_comments(comments: &[Comment]) -> StorageResult<String> {
    Ok(serde_json::to_string(comments)?)
}

/// Parse a persisted blob back into a comment list.
///
/// Returns `None` when the blob is not a valid comment list. Callers treat
/// that as an empty thread.
pub fn decode_comments(blob: &str) -> Option<Vec<Comment>> {
    serde_json::from_str(blob).ok()
}

/// Badge text for a comment count
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 comment".to_string()
    } else {
        format!("{} comments", count)
    }
}
