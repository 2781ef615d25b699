//! Live survey endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{respond, ApiError};
use crate::api::state::AppState;
use crate::types::{SurveyAnswerInput, SurveyId};

/// GET /api/surveys - All surveys
pub async fn list_surveys(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(state.relay.surveys().await)
}

/// GET /api/surveys/:survey_id - Live survey with answers so far
pub async fn get_survey(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<SurveyId>,
) -> impl IntoResponse {
    match state.relay.survey(survey_id).await {
        Ok(Some(survey)) => (StatusCode::OK, Json(survey)).into_response(),
        Ok(None) => {
            let error = ApiError::not_found(format!("survey {} not found", survey_id));
            (StatusCode::NOT_FOUND, Json(error)).into_response()
        }
        Err(e) => respond::<()>(Err(e)),
    }
}

/// POST /api/surveys/:survey_id/next - Advance to the next question
pub async fn next_question(
    State(state): State<Arc<AppState>>,
    Path(survey_id): Path<SurveyId>,
) -> impl IntoResponse {
    respond(state.relay.next_survey_question(survey_id).await)
}

/// POST /api/surveys/answer - Submit an answer to a question
pub async fn answer_survey(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SurveyAnswerInput>,
) -> impl IntoResponse {
    respond(state.relay.answer_survey(input).await)
}
