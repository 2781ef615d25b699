//! Presence records stored in the cache

use serde::{Deserialize, Serialize};

use super::{ParticipantId, TableId};

/// A participant seated at a table.
///
/// Field order is part of the stored form: membership removal matches the
/// serialized record exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    /// Create a new participant record
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Where a participant currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(rename = "tableId")]
    pub table_id: TableId,
}

/// Table switch request; `table_id: None` means leave without rejoining
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchTableRequest {
    #[serde(rename = "participantId")]
    pub participant_id: ParticipantId,
    #[serde(rename = "participantName")]
    pub participant_name: String,
    #[serde(rename = "tableId", default)]
    pub table_id: Option<TableId>,
}

impl SwitchTableRequest {
    /// Join (or switch to) a table
    pub fn join(participant_id: ParticipantId, name: impl Into<String>, table_id: TableId) -> Self {
        Self {
            participant_id,
            participant_name: name.into(),
            table_id: Some(table_id),
        }
    }

    /// Leave the current table without rejoining
    pub fn leave(participant_id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            participant_id,
            participant_name: name.into(),
            table_id: None,
        }
    }

    /// The participant record this request would seat
    pub fn participant(&self) -> Participant {
        Participant::new(self.participant_id, self.participant_name.clone())
    }
}
