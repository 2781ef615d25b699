//! Data types for the table presence server
//!
//! Presence records live only in the cache; everything else mirrors the
//! entities owned by the durable store.

mod chat;
mod hosting;
mod participant;
mod survey;

pub use chat::{ChatMessage, NewChatMessage};
pub use hosting::{Event, EventTable, NewEvent, NewTable, User};
pub use participant::{LocationRecord, Participant, SwitchTableRequest};
pub use survey::{Survey, SurveyAnswer, SurveyAnswerInput, SurveyQuestion};

/// Identifier of a participant (a user seated at a table)
pub type ParticipantId = u64;

/// Identifier of an event table (breakout room)
pub type TableId = u64;

/// Identifier of a hosted event
pub type EventId = u64;

/// Identifier of a user record
pub type UserId = u64;

/// Identifier of a survey
pub type SurveyId = u64;

/// Identifier of a survey question
pub type QuestionId = u64;

/// True for `None` or an empty string (for skip_serializing_if on optional text)
pub fn is_blank(val: &Option<String>) -> bool {
    val.as_deref().map_or(true, str::is_empty)
}
