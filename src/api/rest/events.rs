//! Event, table and user management endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::respond;
use crate::api::state::AppState;
use crate::types::{EventId, NewEvent, NewTable, User, UserId};

/// Query parameters for event lookup
#[derive(Debug, Deserialize)]
pub struct EventParams {
    /// Requesting user; the host is only revealed to the host
    #[serde(rename = "userId")]
    pub user_id: Option<UserId>,
}

/// Body of a table creation request; the event comes from the path
#[derive(Debug, Deserialize)]
pub struct CreateTableBody {
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "userCapacity", default)]
    pub user_capacity: Option<u32>,
    pub head: UserId,
}

/// Body of a user registration request
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "linkedinLink", default)]
    pub linkedin_link: String,
}

/// POST /api/users - Register a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserBody>,
) -> impl IntoResponse {
    let user = User {
        id: 0,
        name: body.name,
        email: body.email,
        title: body.title,
        linkedin_link: body.linkedin_link,
    };
    respond(state.hosting.create_user(user).await)
}

/// GET /api/users - All users
pub async fn list_users(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.hosting.users().await)
}

/// GET /api/users/:user_id - One user
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    respond(state.hosting.user(user_id).await)
}

/// GET /api/events - All events, hosts hidden
pub async fn list_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.hosting.events().await)
}

/// POST /api/events - Create an event and its main room
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewEvent>,
) -> impl IntoResponse {
    respond(state.hosting.create_event(input).await)
}

/// GET /api/events/:event_id - Event details
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<EventId>,
    Query(params): Query<EventParams>,
) -> impl IntoResponse {
    respond(state.hosting.event(event_id, params.user_id).await)
}

/// GET /api/events/:event_id/tables - Tables of an event
pub async fn list_tables(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<EventId>,
) -> impl IntoResponse {
    respond(state.hosting.tables(event_id).await)
}

/// POST /api/events/:event_id/tables - Add a table (host only)
pub async fn create_table(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<EventId>,
    Json(body): Json<CreateTableBody>,
) -> impl IntoResponse {
    let input = NewTable {
        event_id,
        sender_id: body.sender_id,
        name: body.name,
        description: body.description,
        user_capacity: body.user_capacity,
        head: body.head,
    };
    respond(state.hosting.create_table(input).await)
}
