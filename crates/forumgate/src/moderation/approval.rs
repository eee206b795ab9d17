use super::{Cascade, NotifyError};
use forumgate_common::{Post, PostId, PostType};
use std::sync::{Arc, RwLock};

/// Notifies the subscribers of a topic and forum about a new reply
pub trait SubscriberNotifier {
    /// Tell subscribers about `cascade.reply`
    fn notify_subscribers(&self, cascade: &Cascade) -> Result<(), NotifyError>;
}

impl<T: SubscriberNotifier + ?Sized> SubscriberNotifier for &T {
    fn notify_subscribers(&self, cascade: &Cascade) -> Result<(), NotifyError> {
        (**self).notify_subscribers(cascade)
    }
}

/// Subscriber notifier that records every cascade
#[derive(Debug, Clone, Default)]
pub struct MemorySubscriberNotifier(Arc<RwLock<Vec<Cascade>>>);

impl MemorySubscriberNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Cascades triggered so far
    pub fn cascades(&self) -> Vec<Cascade> {
        self.0.read().map(|c| c.clone()).unwrap_or_default()
    }
}

impl SubscriberNotifier for MemorySubscriberNotifier {
    fn notify_subscribers(&self, cascade: &Cascade) -> Result<(), NotifyError> {
        self.0
            .write()
            .map_err(|_| NotifyError::Delivery("cascade log lock poisoned".into()))?
            .push(*cascade);
        Ok(())
    }
}

/// Cascade subscriber notifications for a reply that was just approved
///
/// Subscribers were not told about the reply while it was pending, so they are
/// told now. `ancestry` is nearest first: the topic, then (last) the forum.
/// Topics, and replies with fewer than two ancestors, produce no cascade.
pub fn on_approved(
    post: &Post,
    ancestry: &[PostId],
    subscribers: &impl SubscriberNotifier,
) -> Option<Cascade> {
    if post.post_type != PostType::Reply {
        return None;
    }
    let (topic, forum) = match ancestry {
        [topic, .., forum] => (*topic, *forum),
        _ => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                reply = %post.id,
                depth = ancestry.len(),
                "incomplete ancestry, skipping subscriber notification"
            );
            return None;
        }
    };

    let cascade = Cascade {
        reply: post.id,
        topic,
        forum,
    };
    if let Err(_e) = subscribers.notify_subscribers(&cascade) {
        #[cfg(feature = "tracing")]
        tracing::warn!(reply = %post.id, error = %_e, "subscriber notification failed");
    }
    Some(cascade)
}
