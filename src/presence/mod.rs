//! Presence Store
//!
//! Holds, per table, the ordered list of seated participants and, per
//! participant, the table they sit at. The two sides are independent cache
//! keys with no referential guarantee; only the coordinator mutates them.

use std::sync::Arc;

use tracing::warn;

use crate::cache::CacheBackend;
use crate::error::PresenceResult;
use crate::topics::{location_key, table_key};
use crate::types::{LocationRecord, Participant, ParticipantId, TableId};

/// Typed view of presence records over a cache backend
#[derive(Clone)]
pub struct PresenceStore {
    cache: Arc<dyn CacheBackend>,
}

impl PresenceStore {
    pub fn new(cache: Arc<dyn CacheBackend>) -> Self {
        Self { cache }
    }

    /// Current occupants of a table in join order (empty if none on record)
    pub async fn list_members(&self, table_id: TableId) -> PresenceResult<Vec<Participant>> {
        let raw = self.cache.list_range(&table_key(table_id)).await?;
        let members = raw
            .iter()
            .filter_map(|entry| match serde_json::from_str::<Participant>(entry) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(table_id, entry = %entry, error = %e, "Skipping malformed member record");
                    None
                }
            })
            .collect();
        Ok(members)
    }

    /// Append a participant to the tail of a table's list (no dedup)
    pub(crate) async fn append_member(
        &self,
        table_id: TableId,
        participant: &Participant,
    ) -> PresenceResult<()> {
        let entry = serde_json::to_string(participant)?;
        self.cache.list_push(&table_key(table_id), entry).await
    }

    /// Remove the most recent listing of a participant, matched by id so a
    /// changed display name still clears the old entry; returns whether one
    /// was found
    pub(crate) async fn remove_member(
        &self,
        table_id: TableId,
        participant_id: ParticipantId,
    ) -> PresenceResult<bool> {
        let key = table_key(table_id);
        let Some(entry) = self.last_entry_for(&key, participant_id).await? else {
            return Ok(false);
        };
        let removed = self.cache.list_remove_last(&key, &entry).await?;
        Ok(removed > 0)
    }

    /// Overwrite the participant's most recent listing with its current
    /// name, keeping the seat order; returns whether the list changed
    pub(crate) async fn refresh_member(
        &self,
        table_id: TableId,
        participant: &Participant,
    ) -> PresenceResult<bool> {
        let key = table_key(table_id);
        let fresh = serde_json::to_string(participant)?;
        match self.last_entry_for(&key, participant.id).await? {
            Some(entry) if entry == fresh => Ok(false),
            Some(entry) => self.cache.list_replace_last(&key, &entry, fresh).await,
            None => {
                self.cache.list_push(&key, fresh).await?;
                Ok(true)
            }
        }
    }

    /// Raw record nearest the tail whose id matches
    async fn last_entry_for(
        &self,
        key: &str,
        participant_id: ParticipantId,
    ) -> PresenceResult<Option<String>> {
        let raw = self.cache.list_range(key).await?;
        Ok(raw.into_iter().rev().find(|entry| {
            serde_json::from_str::<Participant>(entry)
                .map_or(false, |p| p.id == participant_id)
        }))
    }

    /// Table a participant currently sits at
    pub async fn get_location(&self, participant_id: ParticipantId) -> PresenceResult<Option<TableId>> {
        let Some(raw) = self.cache.get(&location_key(participant_id)).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<LocationRecord>(&raw) {
            Ok(record) => Ok(Some(record.table_id)),
            Err(e) => {
                warn!(participant_id, error = %e, "Ignoring malformed location record");
                Ok(None)
            }
        }
    }

    pub(crate) async fn set_location(
        &self,
        participant_id: ParticipantId,
        table_id: TableId,
    ) -> PresenceResult<()> {
        let record = serde_json::to_string(&LocationRecord { table_id })?;
        self.cache.set(&location_key(participant_id), record).await
    }

    pub(crate) async fn clear_location(&self, participant_id: ParticipantId) -> PresenceResult<()> {
        self.cache.delete(&location_key(participant_id)).await?;
        Ok(())
    }
}
