//! Comment Change Notifications
//!
//! Explicit publish/subscribe for comment threads. The [`CommentStore`]
//! publishes a [`CommentsUpdated`] event after every successful append;
//! projections subscribe per post ID and hold a [`Subscription`] for as long
//! as they are displayed.
//!
//! [`CommentStore`]: crate::storage::CommentStore

mod hub;
mod messages;

pub use hub::{Callback, ChangeHub, SubscriberId, Subscription};
pub use messages::CommentsUpdated;
