//! Topic names and cache keys
//!
//! These strings are shared with external consumers and must not change.

use crate::types::{EventId, ParticipantId, SurveyId, TableId};

/// Membership updates for one table
pub fn table_update(table_id: TableId) -> String {
    format!("TABLE_UPDATE{}", table_id)
}

/// Chat messages for one table of one event
pub fn chat_update(event_id: EventId, table_id: TableId) -> String {
    format!("CHAT_UPDATE_EVENT_{}_TABLE_{}", event_id, table_id)
}

/// Question advances and answers for one survey
pub fn survey_update(survey_id: SurveyId) -> String {
    format!("SURVEY_UPDATE_{}", survey_id)
}

/// Cache key of a table's membership list
pub fn table_key(table_id: TableId) -> String {
    format!("{}t", table_id)
}

/// Cache key of a participant's location record
pub fn location_key(participant_id: ParticipantId) -> String {
    format!("{}u", participant_id)
}
