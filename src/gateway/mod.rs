//! Subscription Gateway
//!
//! Each client subscription maps to exactly one topic bus subscription.
//! Payloads pass through untouched; dropping the returned subscription
//! (for example when the client connection closes) unregisters it.

use crate::pubsub::{Notification, Subscription, TopicBus};
use crate::topics;
use crate::types::{EventId, SurveyId, TableId};

/// Opens topic subscriptions on behalf of clients
#[derive(Clone)]
pub struct SubscriptionGateway {
    bus: TopicBus<Notification>,
}

impl SubscriptionGateway {
    pub fn new(bus: TopicBus<Notification>) -> Self {
        Self { bus }
    }

    /// Membership lists of one table
    pub fn table_updates(&self, table_id: TableId) -> Subscription<Notification> {
        self.bus.subscribe(topics::table_update(table_id))
    }

    /// Chat messages of one table of one event
    pub fn chat_updates(&self, event_id: EventId, table_id: TableId) -> Subscription<Notification> {
        self.bus.subscribe(topics::chat_update(event_id, table_id))
    }

    /// Full survey objects after each advance or answer
    pub fn survey_updates(&self, survey_id: SurveyId) -> Subscription<Notification> {
        self.bus.subscribe(topics::survey_update(survey_id))
    }

    /// Currently open subscriptions on a topic
    pub fn active_subscriptions(&self, topic: &str) -> usize {
        self.bus.subscriber_count(topic)
    }
}
