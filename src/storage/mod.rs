//! Comment Storage
//!
//! This module provides the persisted comment threads:
//!
//! - **types**: The `Comment` record and its persisted blob format
//! - **backend**: The injected `Storage` capability and its key-value stores
//! - **store**: `CommentStore`, the sole writer of comment threads
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   append → Validate → Prepend → Encode → KeyValueStore → ChangeHub
//!
//! Read Path:
//!   load → KeyValueStore → Decode (corrupt ⇒ empty) → Comments
//! ```
//!
//! # Example
//!
//! ```rust
//! use blog_comments::storage::{CommentStore, MemoryStore, Storage};
//!
//! let store = CommentStore::new(Storage::available(MemoryStore::new()));
//!
//! let comments = store
//!     .append("hello-world", "Alice", "alice@example.com", "Great post!")
//!     .unwrap();
//!
//! assert_eq!(comments.len(), 1);
//! assert_eq!(store.count("hello-world"), 1);
//! ```

pub mod backend;
pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use backend::{FileStore, KeyValueStore, MemoryStore, Storage};
pub use error::{CommentError, Field, StorageError, StorageResult, ValidationError};
pub use store::{CommentStore, DEFAULT_KEY_PREFIX};
pub use types::{count_label, decode_comments, encode_comments, Comment};
