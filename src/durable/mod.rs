//! Durable store boundary
//!
//! Users, events, tables, chat history and surveys belong to the relational
//! store. The presence subsystem only finds, counts and saves through this
//! trait and never persists presence itself.

mod memory;

use async_trait::async_trait;

use crate::error::PresenceResult;
use crate::types::{
    ChatMessage, Event, EventId, EventTable, QuestionId, Survey, SurveyAnswer, SurveyId,
    SurveyQuestion, TableId, User, UserId,
};

pub use memory::InMemoryDurableStore;

/// Find/save/count access to durable entities.
///
/// `insert_*` methods assign the identifier (and any nested identifiers)
/// and return the stored record.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn find_user(&self, id: UserId) -> PresenceResult<Option<User>>;
    async fn insert_user(&self, user: User) -> PresenceResult<User>;
    /// All users in id order
    async fn list_users(&self) -> PresenceResult<Vec<User>>;

    async fn find_event(&self, id: EventId) -> PresenceResult<Option<Event>>;
    async fn insert_event(&self, event: Event) -> PresenceResult<Event>;
    /// All events in id order
    async fn list_events(&self) -> PresenceResult<Vec<Event>>;

    async fn find_table(&self, id: TableId) -> PresenceResult<Option<EventTable>>;
    async fn insert_table(&self, table: EventTable) -> PresenceResult<EventTable>;
    async fn count_tables(&self, event_id: EventId) -> PresenceResult<usize>;
    async fn list_tables(&self, event_id: EventId) -> PresenceResult<Vec<EventTable>>;

    async fn insert_chat_message(&self, message: ChatMessage) -> PresenceResult<ChatMessage>;
    /// Messages of one table, newest first, after skipping `offset`
    async fn list_chat_messages(
        &self,
        event_id: EventId,
        table_id: TableId,
        offset: usize,
        limit: usize,
    ) -> PresenceResult<Vec<ChatMessage>>;

    async fn find_survey(&self, id: SurveyId) -> PresenceResult<Option<Survey>>;
    async fn insert_survey(&self, survey: Survey) -> PresenceResult<Survey>;
    /// All surveys in id order
    async fn list_surveys(&self) -> PresenceResult<Vec<Survey>>;
    /// Overwrite an existing survey record
    async fn save_survey(&self, survey: &Survey) -> PresenceResult<()>;
    async fn find_question(&self, id: QuestionId) -> PresenceResult<Option<SurveyQuestion>>;
    async fn insert_answer(&self, answer: SurveyAnswer) -> PresenceResult<SurveyAnswer>;
}
