//! Chat message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, TableId, UserId};

/// A chat message posted at a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "eventId")]
    pub event_id: EventId,
    #[serde(rename = "tableId")]
    pub table_id: TableId,
    pub message: String,
    #[serde(rename = "timeSent")]
    pub time_sent: DateTime<Utc>,
}

/// Chat send request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatMessage {
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    #[serde(rename = "eventId")]
    pub event_id: EventId,
    #[serde(rename = "tableId")]
    pub table_id: TableId,
    pub message: String,
}
