//! Change Notification Hub
//!
//! Keeps per-post listener lists and delivers [`CommentsUpdated`] events to
//! them synchronously. Subscriptions are released when their handle drops.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::messages::CommentsUpdated;

/// Unique identifier for a registered listener
pub type SubscriberId = u64;

/// Listener invoked for every change to a subscribed post
pub type Callback = Arc<dyn Fn(&CommentsUpdated) + Send + Sync>;

/// Listener registry: post ID → (subscriber ID → callback), in subscription order
type Registry = RwLock<HashMap<String, BTreeMap<SubscriberId, Callback>>>;

/// Delivers change notifications to per-post subscribers
#[derive(Clone, Default)]
pub struct ChangeHub {
    inner: Arc<HubInner>,
}

#[derive(Default)]
struct HubInner {
    subscriptions: Registry,
    next_id: AtomicU64,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for changes to `post_id`
    ///
    /// The listener stays registered until the returned handle is dropped or
    /// [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, post_id: &str, callback: F) -> Subscription
    where
        F: Fn(&CommentsUpdated) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        self.inner
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(post_id.to_string())
            .or_default()
            .insert(id, Arc::new(callback));

        tracing::debug!(post_id = %post_id, subscriber = id, "Subscribed to comment changes");

        Subscription {
            id,
            post_id: post_id.to_string(),
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every subscriber of its post, in subscription order
    ///
    /// Callbacks run on the calling thread after the registry lock is
    /// released, so a callback may subscribe or unsubscribe. A listener
    /// removed by an earlier callback is skipped; one added during delivery
    /// first hears the next event. Returns the number of listeners notified.
    pub fn publish(&self, event: &CommentsUpdated) -> usize {
        let listeners: Vec<(SubscriberId, Callback)> = {
            let subs = self
                .inner
                .subscriptions
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            subs.get(&event.post_id)
                .map(|listeners| {
                    listeners
                        .iter()
                        .map(|(id, callback)| (*id, Arc::clone(callback)))
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut delivered = 0;
        for (id, callback) in &listeners {
            if !self.inner.is_registered(&event.post_id, *id) {
                continue;
            }
            callback(event);
            delivered += 1;
        }

        if delivered > 0 {
            tracing::trace!(
                post_id = %event.post_id,
                count = event.count,
                subscribers = delivered,
                "Delivered comment change"
            );
        }

        delivered
    }

    /// Number of live subscribers for a post
    pub fn subscription_count(&self, post_id: &str) -> usize {
        self.inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(post_id)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for ChangeHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subs = self
            .inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ChangeHub")
            .field("posts", &subs.len())
            .finish()
    }
}

impl HubInner {
    fn is_registered(&self, post_id: &str, id: SubscriberId) -> bool {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(post_id)
            .is_some_and(|listeners| listeners.contains_key(&id))
    }

    fn remove(&self, post_id: &str, id: SubscriberId) {
        let mut subs = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(listeners) = subs.get_mut(post_id) {
            listeners.remove(&id);
            // Clean up empty post entries
            if listeners.is_empty() {
                subs.remove(post_id);
            }
        }
    }
}

/// Handle for a registered listener; dropping it unsubscribes
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    id: SubscriberId,
    post_id: String,
    hub: Weak<HubInner>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Release the listener now
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(&self.post_id, self.id);
            tracing::debug!(post_id = %self.post_id, subscriber = self.id, "Unsubscribed from comment changes");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("post_id", &self.post_id)
            .finish()
    }
}
