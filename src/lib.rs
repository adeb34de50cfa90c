//! # Blog Comments
//!
//! Local comment threads for a static blog: a per-post comment store and a
//! live comment count that stays in sync with it.
//!
//! ## Features
//!
//! - **Per-post threads**: newest-first comment lists, one blob per post
//! - **Injected storage**: file, in-memory, or no backend at all
//! - **Graceful degradation**: missing or corrupt data reads as empty
//! - **Live counts**: projections follow change notifications per post
//!
//! ## Modules
//!
//! - [`storage`]: Comment records, backends, and the comment store
//! - [`notify`]: Change notification hub and subscriptions
//! - [`projector`]: Comment count projection
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use blog_comments::{CommentStore, CountProjector, MemoryStore, Storage};
//!
//! let store = CommentStore::new(Storage::available(MemoryStore::new()));
//! let badge = CountProjector::mounted(&store, "hello-world");
//! assert_eq!(badge.label(), "0 comments");
//!
//! store
//!     .append("hello-world", "Alice", "alice@example.com", "Great post!")
//!     .unwrap();
//!
//! assert_eq!(badge.label(), "1 comment");
//! ```

pub mod config;
pub mod notify;
pub mod projector;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    count_label, Comment, CommentError, CommentStore, FileStore, KeyValueStore, MemoryStore,
    Storage, StorageError, StorageResult, ValidationError,
};

pub use notify::{ChangeHub, CommentsUpdated, Subscription};

pub use projector::{get_count, CountProjector, ProjectorState};

pub use config::{BackendKind, Config, ConfigError, LoggingConfig, StorageConfig};
