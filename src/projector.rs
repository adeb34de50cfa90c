//! Comment Count Projection
//!
//! A [`CountProjector`] shows the comment count for one post without owning
//! the thread. It reads the count once when mounted and then follows
//! [`CommentsUpdated`](crate::notify::CommentsUpdated) notifications for that
//! post. It never writes.

use std::sync::{Arc, Mutex, PoisonError};

use crate::notify::Subscription;
use crate::storage::{count_label, CommentStore};

/// Current comment count for a post; 0 when no backend is available
pub fn get_count(store: &CommentStore, post_id: &str) -> usize {
    store.count(post_id)
}

/// Lifecycle of a projector's displayed count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorState {
    /// Not mounted yet; nothing has been read
    Uninitialized,
    /// Count reflects the last read or the last matching notification
    Synced(usize),
}

/// Live comment count badge for a single post
#[derive(Debug)]
pub struct CountProjector {
    post_id: String,
    state: Arc<Mutex<ProjectorState>>,
    subscription: Option<Subscription>,
}

impl CountProjector {
    /// Create an unmounted projector
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            state: Arc::new(Mutex::new(ProjectorState::Uninitialized)),
            subscription: None,
        }
    }

    /// Create a projector and mount it on `store`
    pub fn mounted(store: &CommentStore, post_id: impl Into<String>) -> Self {
        let mut projector = Self::new(post_id);
        projector.mount(store);
        projector
    }

    /// Read the initial count and start following changes
    ///
    /// Mounting again replaces the previous subscription and restarts from
    /// `Uninitialized`. A notification that lands between subscribing and the
    /// initial read wins over that read.
    pub fn mount(&mut self, store: &CommentStore) {
        self.subscription = None;
        self.set_state(ProjectorState::Uninitialized);

        let state = Arc::clone(&self.state);
        let subscription = store.subscribe(&self.post_id, move |event| {
            *state.lock().unwrap_or_else(PoisonError::into_inner) =
                ProjectorState::Synced(event.count);
        });
        self.subscription = Some(subscription);

        let count = get_count(store, &self.post_id);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == ProjectorState::Uninitialized {
            *state = ProjectorState::Synced(count);
        }
        let synced = *state;
        drop(state);

        tracing::debug!(post_id = %self.post_id, state = ?synced, "Count projector mounted");
    }

    /// Stop following changes; the last count stays readable
    pub fn unmount(&mut self) {
        if self.subscription.take().is_some() {
            tracing::debug!(post_id = %self.post_id, "Count projector unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> ProjectorState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Displayed count (0 before the first mount)
    pub fn count(&self) -> usize {
        match self.state() {
            ProjectorState::Uninitialized => 0,
            ProjectorState::Synced(count) => count,
        }
    }

    /// Badge text, e.g. "3 comments"
    pub fn label(&self) -> String {
        count_label(self.count())
    }

    fn set_state(&self, new_state: ProjectorState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = new_state;
    }
}
