//! Event and table management
//!
//! Every check runs before the first write, so a rejected request leaves
//! the store untouched. Table creation for one event is serialized so the
//! count check and the insert see the same table count.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::durable::DurableStore;
use crate::error::{PresenceError, PresenceResult};
use crate::types::{Event, EventId, EventTable, NewEvent, NewTable, TableId, User, UserId};
use crate::utils::KeyedLocks;

/// Creates events and their tables on behalf of hosts
pub struct HostingService {
    durable: Arc<dyn DurableStore>,
    table_limit: usize,
    default_user_capacity: u32,
    event_locks: KeyedLocks<EventId>,
}

impl HostingService {
    pub fn new(durable: Arc<dyn DurableStore>, table_limit: usize, default_user_capacity: u32) -> Self {
        Self {
            durable,
            table_limit,
            default_user_capacity,
            event_locks: KeyedLocks::new(),
        }
    }

    /// Register a user
    pub async fn create_user(&self, user: User) -> PresenceResult<User> {
        self.durable.insert_user(user).await
    }

    /// Create an event together with its main room
    pub async fn create_event(&self, input: NewEvent) -> PresenceResult<Event> {
        let host = self.require_user(input.host_id).await?;

        let event = self
            .durable
            .insert_event(Event {
                id: 0,
                name: input.name,
                description: input.description,
                org_name: input.org_name,
                start_time: input.start_time,
                end_time: input.end_time,
                user_capacity: input.user_capacity,
                host_id: Some(host.id),
                time_created: Utc::now(),
            })
            .await?;

        let main_room = format!("{} Main Room", event.name);
        self.durable
            .insert_table(EventTable {
                id: 0,
                event_id: event.id,
                name: main_room.clone(),
                description: Some(main_room),
                user_capacity: input.user_capacity.unwrap_or(self.default_user_capacity),
                head_id: host.id,
            })
            .await?;

        info!(event_id = event.id, host = host.id, "Event created");
        Ok(event)
    }

    /// Add a breakout table to an event (host only)
    pub async fn create_table(&self, input: NewTable) -> PresenceResult<EventTable> {
        let _turn = self.event_locks.lock(input.event_id).await;

        let existing = self.durable.count_tables(input.event_id).await?;
        if existing >= self.table_limit {
            return Err(PresenceError::CapacityExceeded {
                limit: self.table_limit,
            });
        }

        let event = self.require_event(input.event_id).await?;
        if event.host_id != Some(input.sender_id) {
            return Err(PresenceError::PermissionDenied(
                "cannot create table because user is not the owner of this event".to_string(),
            ));
        }
        let head = self.require_user(input.head).await?;

        let table = self
            .durable
            .insert_table(EventTable {
                id: 0,
                event_id: event.id,
                name: input.name,
                description: input.description,
                user_capacity: input.user_capacity.unwrap_or(self.default_user_capacity),
                head_id: head.id,
            })
            .await?;

        info!(event_id = event.id, table_id = table.id, "Table created");
        Ok(table)
    }

    /// One user
    pub async fn user(&self, user_id: UserId) -> PresenceResult<User> {
        self.require_user(user_id).await
    }

    /// Every registered user
    pub async fn users(&self) -> PresenceResult<Vec<User>> {
        self.durable.list_users().await
    }

    /// Every event; hosts are hidden from the listing
    pub async fn events(&self) -> PresenceResult<Vec<Event>> {
        let mut events = self.durable.list_events().await?;
        for event in &mut events {
            event.host_id = None;
        }
        Ok(events)
    }

    /// Event details; the host is hidden unless `viewer` is the host
    pub async fn event(&self, event_id: EventId, viewer: Option<UserId>) -> PresenceResult<Event> {
        let mut event = self.require_event(event_id).await?;
        if viewer != event.host_id {
            event.host_id = None;
        }
        Ok(event)
    }

    /// Tables of an event, main room first
    pub async fn tables(&self, event_id: EventId) -> PresenceResult<Vec<EventTable>> {
        self.require_event(event_id).await?;
        self.durable.list_tables(event_id).await
    }

    /// Durable details of one table
    pub async fn table_info(&self, table_id: TableId) -> PresenceResult<EventTable> {
        self.durable
            .find_table(table_id)
            .await?
            .ok_or_else(|| PresenceError::not_found("table", table_id))
    }

    async fn require_event(&self, event_id: EventId) -> PresenceResult<Event> {
        self.durable
            .find_event(event_id)
            .await?
            .ok_or_else(|| PresenceError::not_found("event", event_id))
    }

    async fn require_user(&self, user_id: UserId) -> PresenceResult<User> {
        self.durable
            .find_user(user_id)
            .await?
            .ok_or_else(|| PresenceError::not_found("user", user_id))
    }
}
