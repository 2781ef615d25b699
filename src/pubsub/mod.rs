//! Topic Bus
//!
//! Topic-keyed publish/subscribe with one bounded queue per subscriber.
//! Publishing never waits: a full queue drops the payload for that
//! subscriber only, a closed one is pruned from the registry. There is no
//! replay for late subscribers; clients re-read state when they subscribe.

mod notification;

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

pub use notification::Notification;

type Registry<P> = HashMap<String, HashMap<u64, mpsc::Sender<P>>>;

struct BusInner<P> {
    topics: Mutex<Registry<P>>,
    next_subscriber: AtomicU64,
    published: AtomicU64,
    buffer: usize,
}

impl<P> BusInner<P> {
    fn unsubscribe(&self, topic: &str, id: u64) {
        let mut topics = self.topics.lock();
        if let Some(subscribers) = topics.get_mut(topic) {
            subscribers.remove(&id);
            if subscribers.is_empty() {
                topics.remove(topic);
            }
        }
    }
}

/// Process-wide publish/subscribe bus, shared by cloning
pub struct TopicBus<P> {
    inner: Arc<BusInner<P>>,
}

impl<P> Clone for TopicBus<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Clone + Send + 'static> TopicBus<P> {
    /// Create a bus whose subscribers each queue up to `buffer` payloads
    pub fn new(buffer: usize) -> Self {
        Self {
            inner: Arc::new(BusInner {
                topics: Mutex::new(HashMap::new()),
                next_subscriber: AtomicU64::new(0),
                published: AtomicU64::new(0),
                buffer: buffer.max(1),
            }),
        }
    }

    /// Deliver `payload` to every live subscriber of `topic`.
    ///
    /// Returns the number of subscribers the payload was queued for.
    pub fn publish(&self, topic: &str, payload: P) -> usize {
        self.inner.published.fetch_add(1, Ordering::Relaxed);

        let mut topics = self.inner.topics.lock();
        let Some(subscribers) = topics.get_mut(topic) else {
            debug!(topic, "Publish with no subscribers");
            return 0;
        };

        let mut delivered = 0;
        subscribers.retain(|id, tx| match tx.try_send(payload.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(topic, subscriber = id, "Subscriber queue full, dropping payload");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        });
        if subscribers.is_empty() {
            topics.remove(topic);
        }

        debug!(topic, delivered, "Published");
        delivered
    }

    /// Open a subscription receiving every later publish to `topic`
    pub fn subscribe(&self, topic: impl Into<String>) -> Subscription<P> {
        let topic = topic.into();
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.buffer);

        self.inner
            .topics
            .lock()
            .entry(topic.clone())
            .or_default()
            .insert(id, tx);
        debug!(topic = %topic, subscriber = id, "Subscribed");

        Subscription {
            topic,
            id,
            rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Live subscribers registered for `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner.topics.lock().get(topic).map_or(0, HashMap::len)
    }

    /// Topics with at least one registered subscriber
    pub fn topic_count(&self) -> usize {
        self.inner.topics.lock().len()
    }

    /// Total publish calls since the bus was created
    pub fn published_count(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }
}

/// A live subscription; dropping it removes the registration from the bus
pub struct Subscription<P> {
    topic: String,
    id: u64,
    rx: mpsc::Receiver<P>,
    bus: Weak<BusInner<P>>,
}

impl<P> Subscription<P> {
    /// Topic this subscription listens on
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next payload; `None` once the bus is gone
    pub async fn recv(&mut self) -> Option<P> {
        self.rx.recv().await
    }
}

impl<P> Unpin for Subscription<P> {}

impl<P> Stream for Subscription<P> {
    type Item = P;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<P>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<P> Drop for Subscription<P> {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(&self.topic, self.id);
            debug!(topic = %self.topic, subscriber = self.id, "Unsubscribed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let bus: TopicBus<u32> = TopicBus::new(8);
        assert_eq!(bus.publish("nobody", 1), 0);
        assert_eq!(bus.published_count(), 1);
        assert_eq!(bus.topic_count(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_preserves_order() {
        let bus: TopicBus<u32> = TopicBus::new(8);
        let mut a = bus.subscribe("t");
        let mut b = bus.subscribe("t");

        for i in 0..3 {
            assert_eq!(bus.publish("t", i), 2);
        }

        for sub in [&mut a, &mut b] {
            for i in 0..3 {
                assert_eq!(sub.recv().await, Some(i));
            }
        }
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let bus: TopicBus<&'static str> = TopicBus::new(8);
        let mut one = bus.subscribe("one");
        let _two = bus.subscribe("two");

        bus.publish("two", "for two");
        bus.publish("one", "for one");

        assert_eq!(one.next().await, Some("for one"));
    }

    #[tokio::test]
    async fn test_drop_unregisters_subscriber() {
        let bus: TopicBus<u32> = TopicBus::new(8);
        for _ in 0..10 {
            let sub = bus.subscribe("t");
            assert_eq!(bus.subscriber_count("t"), 1);
            drop(sub);
        }
        assert_eq!(bus.subscriber_count("t"), 0);
        assert_eq!(bus.topic_count(), 0);
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let bus: TopicBus<u32> = TopicBus::new(1);
        let mut slow = bus.subscribe("t");

        assert_eq!(bus.publish("t", 1), 1);
        assert_eq!(bus.publish("t", 2), 0);

        assert_eq!(slow.recv().await, Some(1));
        let next = tokio::time::timeout(Duration::from_millis(20), slow.recv()).await;
        assert!(next.is_err());
        assert_eq!(bus.subscriber_count("t"), 1);
    }

    #[tokio::test]
    async fn test_subscription_outliving_bus_ends() {
        let bus: TopicBus<u32> = TopicBus::new(4);
        let mut sub = bus.subscribe("t");
        drop(bus);
        assert_eq!(sub.recv().await, None);
    }
}
