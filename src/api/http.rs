//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{chat, events, surveys, tables};
use super::sse::handler as sse;
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Presence
        .route("/api/tables/switch", post(tables::switch_table))
        .route("/api/tables/:table_id", get(tables::table_info))
        .route("/api/tables/:table_id/members", get(tables::members))
        // Events and tables
        .route("/api/users", get(events::list_users).post(events::create_user))
        .route("/api/users/:user_id", get(events::get_user))
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route("/api/events/:event_id", get(events::get_event))
        .route(
            "/api/events/:event_id/tables",
            get(events::list_tables).post(events::create_table),
        )
        // Chat
        .route("/api/chat", get(chat::list_messages).post(chat::send_message))
        // Surveys
        .route("/api/surveys", get(surveys::list_surveys))
        .route("/api/surveys/answer", post(surveys::answer_survey))
        .route("/api/surveys/:survey_id", get(surveys::get_survey))
        .route("/api/surveys/:survey_id/next", post(surveys::next_question))
        // Subscriptions
        .route("/api/subscribe/tables/:table_id", get(sse::table_updates))
        .route("/api/subscribe/chat/:event_id/:table_id", get(sse::chat_updates))
        .route("/api/subscribe/surveys/:survey_id", get(sse::survey_updates))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let state = Arc::new(AppState::in_memory(&ServerConfig::default()));
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }
}
