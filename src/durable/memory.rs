//! In-memory durable store used by the server binary and tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::DurableStore;
use crate::error::{PresenceError, PresenceResult};
use crate::types::{
    ChatMessage, Event, EventId, EventTable, QuestionId, Survey, SurveyAnswer, SurveyId,
    SurveyQuestion, TableId, User, UserId,
};

#[derive(Default)]
struct Records {
    users: HashMap<UserId, User>,
    events: HashMap<EventId, Event>,
    tables: HashMap<TableId, EventTable>,
    chat: Vec<ChatMessage>,
    surveys: HashMap<SurveyId, Survey>,
    answers: Vec<SurveyAnswer>,
}

/// Durable store kept in process memory
pub struct InMemoryDurableStore {
    records: RwLock<Records>,
    next_id: AtomicU64,
    available: AtomicBool,
}

impl InMemoryDurableStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records::default()),
            next_id: AtomicU64::new(1),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the database going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Answers recorded for one question
    pub fn answers_for(&self, question_id: QuestionId) -> Vec<SurveyAnswer> {
        self.records
            .read()
            .answers
            .iter()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn ensure_available(&self) -> PresenceResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PresenceError::StoreUnavailable(
                "database is not reachable".to_string(),
            ))
        }
    }
}

impl Default for InMemoryDurableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurableStore for InMemoryDurableStore {
    async fn find_user(&self, id: UserId) -> PresenceResult<Option<User>> {
        self.ensure_available()?;
        Ok(self.records.read().users.get(&id).cloned())
    }

    async fn insert_user(&self, mut user: User) -> PresenceResult<User> {
        self.ensure_available()?;
        user.id = self.allocate_id();
        self.records.write().users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> PresenceResult<Vec<User>> {
        self.ensure_available()?;
        let mut users: Vec<User> = self.records.read().users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn find_event(&self, id: EventId) -> PresenceResult<Option<Event>> {
        self.ensure_available()?;
        Ok(self.records.read().events.get(&id).cloned())
    }

    async fn insert_event(&self, mut event: Event) -> PresenceResult<Event> {
        self.ensure_available()?;
        event.id = self.allocate_id();
        self.records.write().events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn list_events(&self) -> PresenceResult<Vec<Event>> {
        self.ensure_available()?;
        let mut events: Vec<Event> = self.records.read().events.values().cloned().collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    async fn find_table(&self, id: TableId) -> PresenceResult<Option<EventTable>> {
        self.ensure_available()?;
        Ok(self.records.read().tables.get(&id).cloned())
    }

    async fn insert_table(&self, mut table: EventTable) -> PresenceResult<EventTable> {
        self.ensure_available()?;
        table.id = self.allocate_id();
        self.records.write().tables.insert(table.id, table.clone());
        Ok(table)
    }

    async fn count_tables(&self, event_id: EventId) -> PresenceResult<usize> {
        self.ensure_available()?;
        Ok(self
            .records
            .read()
            .tables
            .values()
            .filter(|t| t.event_id == event_id)
            .count())
    }

    async fn list_tables(&self, event_id: EventId) -> PresenceResult<Vec<EventTable>> {
        self.ensure_available()?;
        let mut tables: Vec<EventTable> = self
            .records
            .read()
            .tables
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect();
        tables.sort_by_key(|t| t.id);
        Ok(tables)
    }

    async fn insert_chat_message(&self, mut message: ChatMessage) -> PresenceResult<ChatMessage> {
        self.ensure_available()?;
        message.id = self.allocate_id();
        self.records.write().chat.push(message.clone());
        Ok(message)
    }

    async fn list_chat_messages(
        &self,
        event_id: EventId,
        table_id: TableId,
        offset: usize,
        limit: usize,
    ) -> PresenceResult<Vec<ChatMessage>> {
        self.ensure_available()?;
        let records = self.records.read();
        let mut messages: Vec<ChatMessage> = records
            .chat
            .iter()
            .filter(|m| m.event_id == event_id && m.table_id == table_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.time_sent.cmp(&a.time_sent).then(b.id.cmp(&a.id)));
        Ok(messages.into_iter().skip(offset).take(limit).collect())
    }

    async fn find_survey(&self, id: SurveyId) -> PresenceResult<Option<Survey>> {
        self.ensure_available()?;
        Ok(self.records.read().surveys.get(&id).cloned())
    }

    async fn insert_survey(&self, mut survey: Survey) -> PresenceResult<Survey> {
        self.ensure_available()?;
        survey.id = self.allocate_id();
        for question in &mut survey.questions {
            question.id = self.allocate_id();
            question.survey_id = survey.id;
        }
        self.records.write().surveys.insert(survey.id, survey.clone());
        Ok(survey)
    }

    async fn list_surveys(&self) -> PresenceResult<Vec<Survey>> {
        self.ensure_available()?;
        let mut surveys: Vec<Survey> = self.records.read().surveys.values().cloned().collect();
        surveys.sort_by_key(|s| s.id);
        Ok(surveys)
    }

    async fn save_survey(&self, survey: &Survey) -> PresenceResult<()> {
        self.ensure_available()?;
        let mut records = self.records.write();
        if !records.surveys.contains_key(&survey.id) {
            return Err(PresenceError::not_found("survey", survey.id));
        }
        records.surveys.insert(survey.id, survey.clone());
        Ok(())
    }

    async fn find_question(&self, id: QuestionId) -> PresenceResult<Option<SurveyQuestion>> {
        self.ensure_available()?;
        Ok(self
            .records
            .read()
            .surveys
            .values()
            .flat_map(|s| s.questions.iter())
            .find(|q| q.id == id)
            .cloned())
    }

    async fn insert_answer(&self, mut answer: SurveyAnswer) -> PresenceResult<SurveyAnswer> {
        self.ensure_available()?;
        answer.id = self.allocate_id();
        self.records.write().answers.push(answer.clone());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn message(event_id: EventId, table_id: TableId, text: &str, minutes: i64) -> ChatMessage {
        ChatMessage {
            id: 0,
            user_id: 1,
            event_id,
            table_id,
            message: text.to_string(),
            time_sent: Utc::now() + Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = InMemoryDurableStore::new();
        let a = store.insert_user(User::new(0, "A", "a@x.io")).await.unwrap();
        let b = store.insert_user(User::new(0, "B", "b@x.io")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.find_user(a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(store.list_users().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_chat_listing_is_newest_first_per_table() {
        let store = InMemoryDurableStore::new();
        store.insert_chat_message(message(1, 2, "first", 0)).await.unwrap();
        store.insert_chat_message(message(1, 2, "second", 1)).await.unwrap();
        store.insert_chat_message(message(1, 3, "elsewhere", 2)).await.unwrap();

        let page = store.list_chat_messages(1, 2, 0, 10).await.unwrap();
        let texts: Vec<&str> = page.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);

        let skipped = store.list_chat_messages(1, 2, 1, 10).await.unwrap();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].message, "first");
    }

    #[tokio::test]
    async fn test_survey_questions_get_ids() {
        let store = InMemoryDurableStore::new();
        let survey = store
            .insert_survey(Survey {
                id: 0,
                name: "Poll".to_string(),
                questions: vec![SurveyQuestion {
                    id: 0,
                    survey_id: 0,
                    prompt: "Tea?".to_string(),
                    choices: vec!["yes".to_string(), "no".to_string()],
                    answers: vec![],
                }],
                curr_question: None,
            })
            .await
            .unwrap();

        let question = &survey.questions[0];
        assert_eq!(question.survey_id, survey.id);
        let found = store.find_question(question.id).await.unwrap().unwrap();
        assert_eq!(found.prompt, "Tea?");
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = InMemoryDurableStore::new();
        store.set_available(false);
        assert!(store.find_event(1).await.unwrap_err().is_transient());
    }
}
