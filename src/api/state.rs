//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheBackend, InMemoryCache};
use crate::config::ServerConfig;
use crate::coordinator::PresenceCoordinator;
use crate::durable::{DurableStore, InMemoryDurableStore};
use crate::gateway::SubscriptionGateway;
use crate::hosting::HostingService;
use crate::presence::PresenceStore;
use crate::pubsub::{Notification, TopicBus};
use crate::relay::Relay;

/// Components shared by every request, wired around one topic bus
pub struct AppState {
    pub coordinator: PresenceCoordinator,
    pub relay: Relay,
    pub hosting: HostingService,
    pub gateway: SubscriptionGateway,
    pub bus: TopicBus<Notification>,
    /// SSE keep-alive interval
    pub keep_alive: Duration,
}

impl AppState {
    /// Wire all components over the given backends
    pub fn new(
        config: &ServerConfig,
        cache: Arc<dyn CacheBackend>,
        durable: Arc<dyn DurableStore>,
    ) -> Self {
        let bus = TopicBus::new(config.subscriber_buffer);

        Self {
            coordinator: PresenceCoordinator::new(PresenceStore::new(cache), bus.clone()),
            relay: Relay::new(durable.clone(), bus.clone(), config.chat_page_size),
            hosting: HostingService::new(
                durable,
                config.table_limit,
                config.default_user_capacity,
            ),
            gateway: SubscriptionGateway::new(bus.clone()),
            bus,
            keep_alive: config.keep_alive,
        }
    }

    /// State backed entirely by process memory
    pub fn in_memory(config: &ServerConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryCache::new()),
            Arc::new(InMemoryDurableStore::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics;
    use crate::types::SwitchTableRequest;

    #[tokio::test]
    async fn test_components_share_one_bus() {
        let state = AppState::in_memory(&ServerConfig::default());
        let mut sub = state.gateway.table_updates(5);

        state
            .coordinator
            .switch_table(SwitchTableRequest::join(1, "A", 5))
            .await
            .unwrap();

        assert!(sub.recv().await.is_some());
        assert_eq!(state.bus.subscriber_count(&topics::table_update(5)), 1);
    }
}
