//! SSE subscription handlers

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::Stream;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::pubsub::{Notification, Subscription};
use crate::types::{EventId, SurveyId, TableId};

/// GET /api/subscribe/tables/:table_id - Stream membership lists
pub async fn table_updates(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<TableId>,
) -> impl IntoResponse {
    let subscription = state.gateway.table_updates(table_id);
    stream_subscription(subscription, "table_update", state.keep_alive)
}

/// GET /api/subscribe/chat/:event_id/:table_id - Stream chat messages
pub async fn chat_updates(
    State(state): State<Arc<AppState>>,
    Path((event_id, table_id)): Path<(EventId, TableId)>,
) -> impl IntoResponse {
    let subscription = state.gateway.chat_updates(event_id, table_id);
    stream_subscription(subscription, "chat_update", state.keep_alive)
}

/// GET /api/subscribe/surveys/:survey_id - Stream survey objects
pub async fn survey_updates(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<SurveyId>,
) -> impl IntoResponse {
    let subscription = state.gateway.survey_updates(survey_id);
    stream_subscription(subscription, "survey_update", state.keep_alive)
}

/// Forward every payload of `subscription` as one SSE event.
///
/// The subscription lives inside the stream, so it is dropped (and
/// unregistered from the bus) when the client disconnects.
fn stream_subscription(
    mut subscription: Subscription<Notification>,
    event_name: &'static str,
    keep_alive: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!(topic = %subscription.topic(), "SSE subscription opened");

    let stream = async_stream::stream! {
        while let Some(payload) = subscription.recv().await {
            match serde_json::to_string(&payload) {
                Ok(data) => {
                    yield Ok::<_, Infallible>(Event::default().event(event_name).data(data));
                }
                Err(e) => {
                    warn!(topic = %subscription.topic(), error = %e, "Failed to encode payload");
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default().interval(keep_alive))
}
