//! Study session endpoints
//!
//! Every endpoint returns the session snapshot taken after the transition.

use axum::{
    extract::{Path, State},
    Json,
};
use vibe_cards_core::{retry_persist, Score};

use crate::error::Result;
use crate::models::*;
use crate::services::sessions::UserSession;
use crate::AppState;

fn respond<T>(user: &mut UserSession, result: T) -> Json<ActionResponse<T>> {
    Json(ActionResponse {
        result,
        session: user.session.snapshot(&user.decks),
    })
}

/// GET /api/users/:user/session
pub async fn snapshot(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<SessionSnapshot>> {
    state.with_user(&user, move |user, _| {
        Ok(Json(user.session.snapshot(&user.decks)))
    })
    .await
}

/// POST /api/users/:user/session/select
pub async fn select(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<SelectListRequest>,
) -> Result<Json<SessionSnapshot>> {
    state.with_user(&user, move |user, _| {
        user.session.select_list(&user.decks, &payload.list)?;
        Ok(Json(user.session.snapshot(&user.decks)))
    })
    .await
}

/// POST /api/users/:user/session/start
pub async fn start(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionSnapshot>> {
    state.with_user(&user, move |user, _| {
        user.session.start(&user.decks, payload.into())?;
        Ok(Json(user.session.snapshot(&user.decks)))
    })
    .await
}

/// POST /api/users/:user/session/restart
pub async fn restart(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<SessionSnapshot>> {
    state.with_user(&user, move |user, _| {
        user.session.restart(&user.decks)?;
        Ok(Json(user.session.snapshot(&user.decks)))
    })
    .await
}

/// POST /api/users/:user/session/exit
pub async fn exit(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<ActionResponse<Score>>> {
    state.with_user(&user, move |user, _| {
        let score = user.session.exit()?;
        Ok(respond(user, score))
    })
    .await
}

/// POST /api/users/:user/session/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<AdvanceRequest>,
) -> Result<Json<ActionResponse<Position>>> {
    state.with_user(&user, move |user, _| {
        let position = user.session.advance(&user.decks, payload.direction)?;
        Ok(respond(user, position))
    })
    .await
}

/// POST /api/users/:user/session/reveal
pub async fn reveal(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<ActionResponse<RevealOutcome>>> {
    state.with_user(&user, move |user, _| {
        let outcome = user.session.reveal(&user.decks)?;
        Ok(respond(user, outcome))
    })
    .await
}

/// POST /api/users/:user/session/write
pub async fn write(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<WriteAnswerRequest>,
) -> Result<Json<ActionResponse<GradeReport>>> {
    state.with_user(&user, move |user, store| {
        let report = user
            .session
            .submit_write(&mut user.decks, store, &payload.answer)?;
        Ok(respond(user, report))
    })
    .await
}

/// POST /api/users/:user/session/choice
pub async fn choice(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<ChoiceRequest>,
) -> Result<Json<ActionResponse<ChoiceOutcome>>> {
    state.with_user(&user, move |user, store| {
        let outcome = user
            .session
            .submit_choice(&mut user.decks, store, &payload.option)?;
        Ok(respond(user, outcome))
    })
    .await
}

/// POST /api/users/:user/session/self-grade
pub async fn self_grade(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<SelfGradeRequest>,
) -> Result<Json<ActionResponse<Position>>> {
    state.with_user(&user, move |user, store| {
        let position = user
            .session
            .self_grade(&mut user.decks, store, payload.correct)?;
        Ok(respond(user, position))
    })
    .await
}

/// POST /api/users/:user/session/persist
///
/// Retries saving the in-memory deck lists after a storage failure.
pub async fn persist(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<SessionSnapshot>> {
    state.with_user(&user, move |user, store| {
        retry_persist(store, &user.decks)?;
        Ok(Json(user.session.snapshot(&user.decks)))
    })
    .await
}
