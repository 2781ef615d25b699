//! Table presence endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use super::respond;
use crate::api::state::AppState;
use crate::types::{SwitchTableRequest, TableId};

/// POST /api/tables/switch - Join, switch or leave (`tableId: null`) a table
pub async fn switch_table(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SwitchTableRequest>,
) -> impl IntoResponse {
    respond(state.coordinator.switch_table(request).await)
}

/// GET /api/tables/:table_id/members - Current occupants in join order
pub async fn members(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<TableId>,
) -> impl IntoResponse {
    respond(state.coordinator.members(table_id).await)
}

/// GET /api/tables/:table_id - Durable table details
pub async fn table_info(
    State(state): State<Arc<AppState>>,
    Path(table_id): Path<TableId>,
) -> impl IntoResponse {
    respond(state.hosting.table_info(table_id).await)
}
