//! Comment Store
//!
//! Owns every post's comment thread and is the only writer to it:
//! - Read path: key → backend → decode (corrupt or missing ⇒ empty)
//! - Write path: validate → prepend → encode → backend → notify

use crate::notify::{ChangeHub, CommentsUpdated, Subscription};
use crate::storage::backend::Storage;
use crate::storage::error::{CommentError, Field, StorageResult, ValidationError};
use crate::storage::types::{decode_comments, encode_comments, Comment};

/// Default prefix for storage keys
pub const DEFAULT_KEY_PREFIX: &str = "blog-comments-";

/// Per-post comment threads persisted through an injected [`Storage`]
#[derive(Debug)]
pub struct CommentStore {
    storage: Storage,
    key_prefix: String,
    hub: ChangeHub,
}

impl CommentStore {
    /// Create a store with the default key prefix
    pub fn new(storage: Storage) -> Self {
        Self::with_prefix(storage, DEFAULT_KEY_PREFIX)
    }

    /// Create a store whose keys are `<key_prefix><post_id>`
    pub fn with_prefix(storage: Storage, key_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            key_prefix: key_prefix.into(),
            hub: ChangeHub::new(),
        }
    }

    /// Storage key for a post's thread
    pub fn storage_key(&self, post_id: &str) -> String {
        format!("{}{}", self.key_prefix, post_id)
    }

    /// Whether a real backend is attached
    pub fn is_persistent(&self) -> bool {
        self.storage.is_available()
    }

    /// Read a post's thread, newest first
    ///
    /// A missing entry, a backend read failure, or a blob that does not parse
    /// as a comment list all yield an empty thread.
    pub fn load(&self, post_id: &str) -> Vec<Comment> {
        let key = self.storage_key(post_id);

        let blob = match self.storage.get_item(&key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(post_id = %post_id, error = %e, "Failed to read comments");
                return Vec::new();
            }
        };

        match decode_comments(&blob) {
            Some(comments) => {
                tracing::debug!(post_id = %post_id, count = comments.len(), "Loaded comments");
                comments
            }
            None => {
                tracing::warn!(post_id = %post_id, key = %key, "Ignoring corrupt comment data");
                Vec::new()
            }
        }
    }

    /// Number of comments on a post; 0 when no backend is available
    pub fn count(&self, post_id: &str) -> usize {
        self.load(post_id).len()
    }

    /// Add a comment to the front of a post's thread
    ///
    /// Fields are trimmed and must all be non-empty; otherwise nothing is
    /// written. On success the full thread is persisted, subscribers of
    /// `post_id` are notified with the new length, and the new thread is
    /// returned.
    pub fn append(
        &self,
        post_id: &str,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Vec<Comment>, CommentError> {
        let (name, email, message) = validate(name, email, message)?;

        let comment = Comment::new(name, email, message);
        let comment_id = comment.id.clone();

        let mut comments = self.load(post_id);
        comments.insert(0, comment);

        if !self.storage.is_available() {
            tracing::debug!(post_id = %post_id, "No storage backend, comment not persisted");
            return Ok(comments);
        }

        self.persist(post_id, &comments)?;

        tracing::info!(
            post_id = %post_id,
            comment_id = %comment_id,
            count = comments.len(),
            "Comment added"
        );

        self.hub
            .publish(&CommentsUpdated::new(post_id, comments.len()));

        Ok(comments)
    }

    /// Register a listener for changes to `post_id`
    pub fn subscribe<F>(&self, post_id: &str, callback: F) -> Subscription
    where
        F: Fn(&CommentsUpdated) + Send + Sync + 'static,
    {
        self.hub.subscribe(post_id, callback)
    }

    /// The notification hub this store publishes to
    pub fn hub(&self) -> &ChangeHub {
        &self.hub
    }

    /// Replace the whole stored thread for a post
    fn persist(&self, post_id: &str, comments: &[Comment]) -> StorageResult<()> {
        let blob = encode_comments(comments)?;
        self.storage.set_item(&self.storage_key(post_id), &blob)
    }
}

/// Trim the submitted fields, rejecting the first one that ends up empty
fn validate<'a>(
    name: &'a str,
    email: &'a str,
    message: &'a str,
) -> Result<(&'a str, &'a str, &'a str), ValidationError> {
    let name = non_empty(name, Field::Name)?;
    let email = non_empty(email, Field::Email)?;
    let message = non_empty(message, Field::Message)?;
    Ok((name, email, message))
}

fn non_empty(value: &str, field: Field) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError { field })
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::{FileStore, KeyValueStore, MemoryStore};
    use crate::storage::error::StorageError;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn memory_store() -> CommentStore {
        CommentStore::new(Storage::available(MemoryStore::new()))
    }

    /// Backend whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[test]
    fn test_load_unknown_post_is_empty() {
        let store = memory_store();
        assert!(store.load("never-written").is_empty());
        assert_eq!(store.count("never-written"), 0);
    }

    #[test]
    fn test_append_prepends_and_grows_by_one() {
        let store = memory_store();

        store.append("p1", "Alice", "a@example.com", "First").unwrap();
        let before = store.load("p1");

        let returned = store.append("p1", "Bob", "b@example.com", "Second").unwrap();
        let after = store.load("p1");

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0].name, "Bob");
        assert_eq!(after[1..], before[..]);
        assert_eq!(returned, after);
    }

    #[test]
    fn test_append_trims_fields() {
        let store = memory_store();
        let comments = store
            .append("p1", "  Alice ", "\ta@example.com\n", "  hello there  ")
            .unwrap();

        assert_eq!(comments[0].name, "Alice");
        assert_eq!(comments[0].email, "a@example.com");
        assert_eq!(comments[0].message, "hello there");
    }

    #[test]
    fn test_append_rejects_blank_fields_without_writing() {
        let store = memory_store();
        store.append("p1", "Alice", "a@example.com", "First").unwrap();
        let before = store.load("p1");

        let cases = [
            ("", "a@example.com", "msg", Field::Name),
            ("Bob", "   ", "msg", Field::Email),
            ("Bob", "b@example.com", "\n\t ", Field::Message),
            (" ", " ", " ", Field::Name),
        ];

        for (name, email, message, field) in cases {
            let err = store.append("p1", name, email, message).unwrap_err();
            match err {
                CommentError::Validation(e) => assert_eq!(e.field, field),
                other => panic!("Expected validation error, got {other:?}"),
            }
        }

        assert_eq!(store.load("p1"), before);
    }

    #[test]
    fn test_rejected_append_does_not_notify() {
        let store = memory_store();
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe("p1", move |_| *sink.lock().unwrap() += 1);

        assert!(store.append("p1", "", "a@example.com", "m").is_err());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_three_comments_newest_first() {
        let store = memory_store();
        for name in ["Alice", "Bob", "Carol"] {
            store
                .append("post-1", name, "someone@example.com", "Nice post")
                .unwrap();
        }

        let names: Vec<_> = store
            .load("post-1")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Carol", "Bob", "Alice"]);
        assert_eq!(store.count("post-1"), 3);
    }

    #[test]
    fn test_comment_ids_unique_within_post() {
        let store = memory_store();
        for i in 0..50 {
            store
                .append("p1", "Alice", "a@example.com", &format!("msg {i}"))
                .unwrap();
        }

        let mut ids: Vec<_> = store.load("p1").into_iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_posts_are_independent() {
        let store = memory_store();
        store.append("p1", "Alice", "a@example.com", "one").unwrap();
        store.append("p2", "Bob", "b@example.com", "two").unwrap();
        store.append("p2", "Carol", "c@example.com", "three").unwrap();

        assert_eq!(store.count("p1"), 1);
        assert_eq!(store.count("p2"), 2);
    }

    #[test]
    fn test_notification_matches_persisted_state() {
        let store = Arc::new(memory_store());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let reader = Arc::clone(&store);
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe("p1", move |event| {
            // Persisted before notification, so a re-read agrees
            let reread = reader.count(&event.post_id);
            sink.lock().unwrap().push((event.count, reread));
        });

        store.append("p1", "Alice", "a@example.com", "one").unwrap();
        store.append("p1", "Bob", "b@example.com", "two").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_corrupt_data_reads_as_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set_item("blog-comments-p3", "{not a list").unwrap();

        let store = CommentStore::new(Storage::available(SharedMemory(Arc::clone(&backend))));
        assert!(store.load("p3").is_empty());
        assert_eq!(store.count("p3"), 0);

        // Appending over corrupt data starts a fresh thread
        let comments = store.append("p3", "Alice", "a@example.com", "hi").unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(store.count("p3"), 1);
    }

    #[test]
    fn test_unavailable_storage_degrades_to_empty() {
        let store = CommentStore::new(Storage::Unavailable);
        assert!(!store.is_persistent());

        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe("p1", move |_| *sink.lock().unwrap() += 1);

        let comments = store.append("p1", "Alice", "a@example.com", "hi").unwrap();
        assert_eq!(comments.len(), 1);

        assert!(store.load("p1").is_empty());
        assert_eq!(store.count("p1"), 0);
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_unavailable_storage_still_validates() {
        let store = CommentStore::new(Storage::Unavailable);
        let err = store.append("p1", "Alice", "", "hi").unwrap_err();
        assert!(matches!(err, CommentError::Validation(_)));
    }

    #[test]
    fn test_write_failure_propagates_without_notifying() {
        let store = CommentStore::new(Storage::available(ReadOnlyStore));
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe("p1", move |_| *sink.lock().unwrap() += 1);

        let err = store.append("p1", "Alice", "a@example.com", "hi").unwrap_err();
        assert!(matches!(err, CommentError::Storage(_)));
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_custom_prefix_and_file_backend() {
        let dir = tempdir().unwrap();
        let files = FileStore::open(dir.path()).unwrap();
        let expected_path = files.item_path("site-a:hello");

        let store = CommentStore::with_prefix(Storage::available(files), "site-a:");
        assert_eq!(store.storage_key("hello"), "site-a:hello");

        store.append("hello", "Alice", "a@example.com", "hi").unwrap();
        assert!(expected_path.exists());

        // A second store over the same directory sees the thread
        let reopened = CommentStore::with_prefix(
            Storage::available(FileStore::open(dir.path()).unwrap()),
            "site-a:",
        );
        assert_eq!(reopened.load("hello"), store.load("hello"));
    }

    #[test]
    fn test_long_post_id_on_file_backend() {
        let dir = tempdir().unwrap();
        let store = CommentStore::new(Storage::available(FileStore::open(dir.path()).unwrap()));
        let post_id = "日本語のブログ記事".repeat(10);

        let comments = store.append(&post_id, "Alice", "a@example.com", "hi").unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(store.count(&post_id), 1);
    }

    /// Lets a test keep a handle on the backend the store writes to
    struct SharedMemory(Arc<MemoryStore>);

    impl KeyValueStore for SharedMemory {
        fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
            self.0.set_item(key, value)
        }
    }
}
