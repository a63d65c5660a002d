use crate::analysis::{AnalysisResult, analyze_story};
use crate::challenges::{ChallengeBoard, Submission, challenge_board_at, submit_answers};
use crate::daily::{ExampleMap, daily_prompt_at, tense_examples_at};
use crate::errors::AppError;
use crate::models::{AnalyzeRequest, GrammarError, LevelQuery, PromptResponse, SubmitRequest};
use crate::state::AppState;
use crate::stats::{ProgressReport, build_report, remove_completed, remove_mistake, save_mistake};
use crate::theme::{DailyTheme, today_theme};
use crate::theory::{TENSES_GUIDE, TheoryGuide};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::Utc;

pub async fn index() -> Html<String> {
    Html(render_index(&today_theme()))
}

pub async fn get_theme() -> Json<DailyTheme> {
    Json(today_theme())
}

pub async fn get_prompt(State(state): State<AppState>) -> Result<Json<PromptResponse>, AppError> {
    Ok(Json(daily_prompt_at(&state, Utc::now()).await?))
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    Ok(Json(analyze_story(&state, &payload.text).await?))
}

pub async fn latest_analysis(State(state): State<AppState>) -> Result<Json<AnalysisResult>, AppError> {
    state
        .latest_analysis
        .lock()
        .await
        .clone()
        .map(Json)
        .ok_or_else(|| AppError::not_found("no analysis yet"))
}

pub async fn get_theory() -> Json<TheoryGuide> {
    Json(TENSES_GUIDE)
}

pub async fn get_examples(State(state): State<AppState>) -> Result<Json<ExampleMap>, AppError> {
    Ok(Json(tense_examples_at(&state, Utc::now()).await?))
}

pub async fn get_challenges(
    State(state): State<AppState>,
    Query(query): Query<LevelQuery>,
) -> Result<Json<ChallengeBoard>, AppError> {
    Ok(Json(challenge_board_at(&state, query.level, Utc::now()).await?))
}

pub async fn submit_challenge(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<Submission>, AppError> {
    Ok(Json(submit_answers(&state, &id, payload.answers).await?))
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressReport> {
    Json(build_report(&state.store).await)
}

pub async fn add_mistake(
    State(state): State<AppState>,
    Json(error): Json<GrammarError>,
) -> Result<StatusCode, AppError> {
    if error.id.trim().is_empty() {
        return Err(AppError::bad_request("mistake must have an id"));
    }
    let added = save_mistake(&state.store, error).await?;
    Ok(if added { StatusCode::CREATED } else { StatusCode::OK })
}

pub async fn delete_mistake(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    if remove_mistake(&state.store, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("no saved mistake '{id}'")))
    }
}

pub async fn delete_completed(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if remove_completed(&state.store, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("no completed challenge '{id}'")))
    }
}
