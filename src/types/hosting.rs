//! Users, events and event tables

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{is_blank, EventId, TableId, UserId};

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "linkedinLink", default)]
    pub linkedin_link: String,
}

impl User {
    /// Create a user with only the required fields
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            title: String::new(),
            linkedin_link: String::new(),
        }
    }
}

/// A hosted live event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(rename = "orgName")]
    pub org_name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    /// As given at creation; only the main room falls back to a default
    #[serde(rename = "userCapacity", default)]
    pub user_capacity: Option<u32>,
    /// Hidden from callers who are not the host
    #[serde(rename = "hostId")]
    pub host_id: Option<UserId>,
    #[serde(rename = "timeCreated")]
    pub time_created: DateTime<Utc>,
}

/// A breakout table within an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    pub id: TableId,
    #[serde(rename = "eventId")]
    pub event_id: EventId,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(rename = "userCapacity")]
    pub user_capacity: u32,
    #[serde(rename = "headId")]
    pub head_id: UserId,
}

/// Event creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "orgName")]
    pub org_name: String,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "userCapacity", default)]
    pub user_capacity: Option<u32>,
    #[serde(rename = "hostId")]
    pub host_id: UserId,
}

/// Table creation request, issued by the event host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTable {
    #[serde(rename = "eventId")]
    pub event_id: EventId,
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "userCapacity", default)]
    pub user_capacity: Option<u32>,
    /// User heading the table
    pub head: UserId,
}
