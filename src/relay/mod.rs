//! Message/Survey Relay
//!
//! Records chat messages and survey progress through the durable store,
//! then publishes the new state to the matching topic. The write is the
//! source of truth; the publish is advisory and never rolls it back.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::durable::DurableStore;
use crate::error::{PresenceError, PresenceResult};
use crate::pubsub::{Notification, TopicBus};
use crate::topics;
use crate::types::{
    ChatMessage, EventId, NewChatMessage, Survey, SurveyAnswer, SurveyAnswerInput, SurveyId,
    TableId,
};
use crate::utils::KeyedLocks;

/// Chat and survey relay
pub struct Relay {
    durable: Arc<dyn DurableStore>,
    bus: TopicBus<Notification>,
    survey_locks: KeyedLocks<SurveyId>,
    /// Surveys with their in-memory answer lists, kept for the process lifetime
    live_surveys: Mutex<HashMap<SurveyId, Survey>>,
    chat_page_size: usize,
}

impl Relay {
    pub fn new(
        durable: Arc<dyn DurableStore>,
        bus: TopicBus<Notification>,
        chat_page_size: usize,
    ) -> Self {
        Self {
            durable,
            bus,
            survey_locks: KeyedLocks::new(),
            live_surveys: Mutex::new(HashMap::new()),
            chat_page_size,
        }
    }

    /// Record a chat message and publish it to the table's chat topic
    pub async fn send_message(&self, input: NewChatMessage) -> PresenceResult<ChatMessage> {
        let user = self
            .durable
            .find_user(input.sender_id)
            .await?
            .ok_or_else(|| PresenceError::not_found("user", input.sender_id))?;
        self.require_event(input.event_id).await?;
        self.require_table(input.table_id).await?;

        let message = self
            .durable
            .insert_chat_message(ChatMessage {
                id: 0,
                user_id: user.id,
                event_id: input.event_id,
                table_id: input.table_id,
                message: input.message,
                time_sent: Utc::now(),
            })
            .await?;

        self.bus.publish(
            &topics::chat_update(message.event_id, message.table_id),
            Notification::Chat(message.clone()),
        );
        debug!(
            event_id = message.event_id,
            table_id = message.table_id,
            sender = message.user_id,
            "Chat message relayed"
        );
        Ok(message)
    }

    /// One page of a table's chat history in chronological order.
    ///
    /// `offset` counts back from the newest message.
    pub async fn chat_messages(
        &self,
        event_id: EventId,
        table_id: TableId,
        offset: usize,
    ) -> PresenceResult<Vec<ChatMessage>> {
        self.require_event(event_id).await?;
        self.require_table(table_id).await?;

        let mut page = self
            .durable
            .list_chat_messages(event_id, table_id, offset, self.chat_page_size)
            .await?;
        page.reverse();
        Ok(page)
    }

    /// Advance a survey to its next question and publish the whole survey
    pub async fn next_survey_question(&self, survey_id: SurveyId) -> PresenceResult<Survey> {
        let _turn = self.survey_locks.lock(survey_id).await;

        let mut survey = self.load_survey(survey_id).await?;
        let index = survey.advance();
        self.durable.save_survey(&survey).await?;
        self.live_surveys.lock().insert(survey_id, survey.clone());

        self.bus.publish(
            &topics::survey_update(survey_id),
            Notification::Survey(survey.clone()),
        );
        info!(survey_id, question = index, "Survey advanced");
        Ok(survey)
    }

    /// Record an answer, attach it to the survey's current question and republish
    pub async fn answer_survey(&self, input: SurveyAnswerInput) -> PresenceResult<bool> {
        let question = self
            .durable
            .find_question(input.question_id)
            .await?
            .ok_or_else(|| PresenceError::not_found("question", input.question_id))?;
        let survey_id = question.survey_id;

        let _turn = self.survey_locks.lock(survey_id).await;

        let answer = self
            .durable
            .insert_answer(SurveyAnswer {
                id: 0,
                question_id: question.id,
                answer: input.answer,
            })
            .await?;

        let mut survey = self.load_survey(survey_id).await?;
        if let Some(current) = survey.current_question_mut() {
            current.answers.push(answer);
        }
        self.live_surveys.lock().insert(survey_id, survey.clone());

        self.bus
            .publish(&topics::survey_update(survey_id), Notification::Survey(survey));
        debug!(survey_id, question_id = question.id, "Survey answer relayed");
        Ok(true)
    }

    /// Live view of a survey, including answers gathered so far
    pub async fn survey(&self, survey_id: SurveyId) -> PresenceResult<Option<Survey>> {
        let cached = self.live_surveys.lock().get(&survey_id).cloned();
        if cached.is_some() {
            return Ok(cached);
        }
        self.durable.find_survey(survey_id).await
    }

    /// Every survey, live state preferred over the stored copy
    pub async fn surveys(&self) -> PresenceResult<Vec<Survey>> {
        let stored = self.durable.list_surveys().await?;
        let live = self.live_surveys.lock();
        Ok(stored
            .into_iter()
            .map(|s| live.get(&s.id).cloned().unwrap_or(s))
            .collect())
    }

    async fn load_survey(&self, survey_id: SurveyId) -> PresenceResult<Survey> {
        self.survey(survey_id)
            .await?
            .ok_or_else(|| PresenceError::not_found("survey", survey_id))
    }

    async fn require_event(&self, event_id: EventId) -> PresenceResult<()> {
        match self.durable.find_event(event_id).await? {
            Some(_) => Ok(()),
            None => Err(PresenceError::not_found("event", event_id)),
        }
    }

    async fn require_table(&self, table_id: TableId) -> PresenceResult<()> {
        match self.durable.find_table(table_id).await? {
            Some(_) => Ok(()),
            None => Err(PresenceError::not_found("table", table_id)),
        }
    }
}
