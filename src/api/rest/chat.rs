//! Chat endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::respond;
use crate::api::state::AppState;
use crate::types::{EventId, NewChatMessage, TableId};

/// Query parameters for chat history
#[derive(Debug, Deserialize)]
pub struct ChatParams {
    #[serde(rename = "eventId")]
    pub event_id: EventId,
    #[serde(rename = "tableId")]
    pub table_id: TableId,
    /// Messages to skip, counting back from the newest
    #[serde(default)]
    pub offset: usize,
}

/// POST /api/chat - Send a chat message to a table
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewChatMessage>,
) -> impl IntoResponse {
    respond(state.relay.send_message(input).await)
}

/// GET /api/chat - One page of a table's chat, oldest first
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChatParams>,
) -> impl IntoResponse {
    respond(
        state
            .relay
            .chat_messages(params.event_id, params.table_id, params.offset)
            .await,
    )
}
