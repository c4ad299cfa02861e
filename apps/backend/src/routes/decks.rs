//! Deck list endpoints

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};
use vibe_cards_core::{CoreError, PersistHook};

use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// GET /api/users/:user/decks
pub async fn list(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<DeckListResponse>> {
    state.with_user(&user, move |user, _| {
        Ok(Json(DeckListResponse {
            lists: user.decks.summaries(),
        }))
    })
    .await
}

/// GET /api/users/:user/decks/:name
pub async fn show(
    State(state): State<AppState>,
    Path((user, name)): Path<(String, String)>,
) -> Result<Json<DeckCardsResponse>> {
    state.with_user(&user, move |user, _| {
        let cards = user
            .decks
            .cards(&name)
            .ok_or_else(|| CoreError::UnknownList(name.clone()))?
            .to_vec();
        Ok(Json(DeckCardsResponse { name, cards }))
    })
    .await
}

/// GET /api/users/:user/export
///
/// All deck lists in the stored file format.
pub async fn export(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<([(header::HeaderName, String); 1], Json<DeckLists>)> {
    let disposition = format!("attachment; filename=\"{user}_deck.json\"");
    state.with_user(&user, move |user, _| {
        Ok((
            [(header::CONTENT_DISPOSITION, disposition)],
            Json(user.decks.clone()),
        ))
    })
    .await
}

/// POST /api/users/:user/decks
pub async fn create(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(payload): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<DeckListResponse>)> {
    state.with_user(&user, move |user, store| {
        user.decks.create_list(&payload.name)?;
        store.persist(&user.decks)?;
        Ok((
            StatusCode::CREATED,
            Json(DeckListResponse {
                lists: user.decks.summaries(),
            }),
        ))
    })
    .await
}

/// DELETE /api/users/:user/decks/:name
pub async fn delete(
    State(state): State<AppState>,
    Path((user, name)): Path<(String, String)>,
) -> Result<Json<DeckListResponse>> {
    state.with_user(&user, move |user, store| {
        let removed = user.decks.delete_list(&name)?;
        tracing::info!(list = %name, cards = removed.len(), "deck list deleted");
        store.persist(&user.decks)?;
        Ok(Json(DeckListResponse {
            lists: user.decks.summaries(),
        }))
    })
    .await
}

/// POST /api/users/:user/decks/:name/cards
pub async fn add_card(
    State(state): State<AppState>,
    Path((user, name)): Path<(String, String)>,
    Json(payload): Json<NewCard>,
) -> Result<(StatusCode, Json<CreateCardResponse>)> {
    state.with_user(&user, move |user, store| {
        let id = user.decks.add_card(&name, payload)?;
        store.persist(&user.decks)?;
        Ok((StatusCode::CREATED, Json(CreateCardResponse { id })))
    })
    .await
}

/// DELETE /api/users/:user/decks/:name/cards/:id
pub async fn remove_card(
    State(state): State<AppState>,
    Path((user, name, id)): Path<(String, String, i64)>,
) -> Result<StatusCode> {
    state.with_user(&user, move |user, store| {
        user.decks.remove_card(&name, id)?;
        store.persist(&user.decks)?;
        Ok(StatusCode::NO_CONTENT)
    })
    .await
}
