//! Presence Coordinator
//!
//! Applies table switches to the presence store and publishes refreshed
//! membership lists. Switches for one participant run strictly one after
//! another; different participants proceed independently.
//!
//! Join is applied before leave: a crash between the two leaves the
//! participant listed twice rather than nowhere.

use tracing::{debug, info, warn};

use crate::error::PresenceResult;
use crate::presence::PresenceStore;
use crate::pubsub::{Notification, TopicBus};
use crate::topics;
use crate::types::{Participant, ParticipantId, SwitchTableRequest, TableId};
use crate::utils::KeyedLocks;

/// Owns every mutation of presence records
pub struct PresenceCoordinator {
    store: PresenceStore,
    bus: TopicBus<Notification>,
    locks: KeyedLocks<ParticipantId>,
}

impl PresenceCoordinator {
    pub fn new(store: PresenceStore, bus: TopicBus<Notification>) -> Self {
        Self {
            store,
            bus,
            locks: KeyedLocks::new(),
        }
    }

    /// Move a participant to `request.table_id`, or out of any table when `None`.
    ///
    /// Returns the participant's public identity as acknowledgment.
    pub async fn switch_table(&self, request: SwitchTableRequest) -> PresenceResult<Participant> {
        let participant_id = request.participant_id;
        let _turn = self.locks.lock(participant_id).await;

        let participant = request.participant();
        let old_table = self.store.get_location(participant_id).await?;

        match request.table_id {
            Some(new_table) if old_table == Some(new_table) => {
                if self.store.refresh_member(new_table, &participant).await? {
                    self.publish_members(new_table).await?;
                    info!(participant_id, table_id = new_table, "Seated participant renamed");
                } else {
                    debug!(participant_id, table_id = new_table, "Already seated, nothing to do");
                }
                return Ok(participant);
            }
            Some(new_table) => {
                self.store.append_member(new_table, &participant).await?;
                self.store.set_location(participant_id, new_table).await?;
                self.publish_members(new_table).await?;
            }
            None => {
                self.store.clear_location(participant_id).await?;
            }
        }

        if let Some(old_table) = old_table {
            let removed = self.store.remove_member(old_table, participant_id).await?;
            if !removed {
                warn!(participant_id, table_id = old_table, "Participant was not listed at previous table");
            }
            self.publish_members(old_table).await?;
        }

        info!(
            participant_id,
            from = ?old_table,
            to = ?request.table_id,
            "Table switch applied"
        );
        Ok(participant)
    }

    /// Current occupants of a table
    pub async fn members(&self, table_id: TableId) -> PresenceResult<Vec<Participant>> {
        self.store.list_members(table_id).await
    }

    /// Table a participant is seated at
    pub async fn location(&self, participant_id: ParticipantId) -> PresenceResult<Option<TableId>> {
        self.store.get_location(participant_id).await
    }

    async fn publish_members(&self, table_id: TableId) -> PresenceResult<()> {
        let members = self.store.list_members(table_id).await?;
        self.bus
            .publish(&topics::table_update(table_id), Notification::Members(members));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBackend, InMemoryCache};
    use std::sync::Arc;

    fn setup() -> (PresenceCoordinator, TopicBus<Notification>, Arc<InMemoryCache>) {
        let cache = Arc::new(InMemoryCache::new());
        let bus = TopicBus::new(16);
        let coordinator = PresenceCoordinator::new(PresenceStore::new(cache.clone()), bus.clone());
        (coordinator, bus, cache)
    }

    fn members(list: &[(u64, &str)]) -> Notification {
        Notification::Members(list.iter().map(|(id, n)| Participant::new(*id, *n)).collect())
    }

    #[tokio::test]
    async fn test_join_then_switch_publishes_both_tables() {
        let (coordinator, bus, _) = setup();

        coordinator.switch_table(SwitchTableRequest::join(1, "A", 5)).await.unwrap();
        assert_eq!(coordinator.members(5).await.unwrap(), vec![Participant::new(1, "A")]);

        let mut old_sub = bus.subscribe(topics::table_update(5));
        let mut new_sub = bus.subscribe(topics::table_update(7));

        let ack = coordinator.switch_table(SwitchTableRequest::join(1, "A", 7)).await.unwrap();
        assert_eq!(ack, Participant::new(1, "A"));

        assert_eq!(coordinator.members(7).await.unwrap(), vec![Participant::new(1, "A")]);
        assert!(coordinator.members(5).await.unwrap().is_empty());
        assert_eq!(coordinator.location(1).await.unwrap(), Some(7));

        assert_eq!(old_sub.recv().await, Some(members(&[])));
        assert_eq!(new_sub.recv().await, Some(members(&[(1, "A")])));
    }

    #[tokio::test]
    async fn test_self_switch_is_noop() {
        let (coordinator, bus, _) = setup();
        coordinator.switch_table(SwitchTableRequest::join(1, "A", 5)).await.unwrap();
        let before = bus.published_count();

        coordinator.switch_table(SwitchTableRequest::join(1, "A", 5)).await.unwrap();

        assert_eq!(coordinator.members(5).await.unwrap(), vec![Participant::new(1, "A")]);
        assert_eq!(bus.published_count(), before);
    }

    #[tokio::test]
    async fn test_self_switch_with_new_name_renames_in_place() {
        let (coordinator, bus, _) = setup();
        coordinator.switch_table(SwitchTableRequest::join(1, "Ada", 5)).await.unwrap();
        coordinator.switch_table(SwitchTableRequest::join(2, "B", 5)).await.unwrap();
        let mut sub = bus.subscribe(topics::table_update(5));

        coordinator.switch_table(SwitchTableRequest::join(1, "Ada L", 5)).await.unwrap();

        assert_eq!(
            coordinator.members(5).await.unwrap(),
            vec![Participant::new(1, "Ada L"), Participant::new(2, "B")]
        );
        assert_eq!(sub.recv().await, Some(members(&[(1, "Ada L"), (2, "B")])));
    }

    #[tokio::test]
    async fn test_leave_clears_location_and_is_repeatable() {
        let (coordinator, _, cache) = setup();
        coordinator.switch_table(SwitchTableRequest::join(1, "A", 5)).await.unwrap();

        coordinator.switch_table(SwitchTableRequest::leave(1, "A")).await.unwrap();
        assert!(coordinator.members(5).await.unwrap().is_empty());
        assert_eq!(coordinator.location(1).await.unwrap(), None);

        let ack = coordinator.switch_table(SwitchTableRequest::leave(1, "A")).await.unwrap();
        assert_eq!(ack.id, 1);
        assert_eq!(cache.key_count(), 0);
    }

    #[tokio::test]
    async fn test_leave_without_seat_publishes_nothing() {
        let (coordinator, bus, _) = setup();
        coordinator.switch_table(SwitchTableRequest::leave(9, "Z")).await.unwrap();
        assert_eq!(bus.published_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_listing_at_old_table_is_swallowed() {
        let (coordinator, _, cache) = setup();
        // Location says table 5 but the list never got the entry
        cache.set("1u", r#"{"tableId":5}"#.to_string()).await.unwrap();

        coordinator.switch_table(SwitchTableRequest::join(1, "A", 6)).await.unwrap();
        assert_eq!(coordinator.members(6).await.unwrap(), vec![Participant::new(1, "A")]);
        assert_eq!(coordinator.location(1).await.unwrap(), Some(6));
    }

    #[tokio::test]
    async fn test_store_outage_surfaces_as_transient() {
        let (coordinator, _, cache) = setup();
        cache.set_available(false);
        let err = coordinator
            .switch_table(SwitchTableRequest::join(1, "A", 5))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }
}
