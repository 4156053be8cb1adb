use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{auth::extractors::CurrentUser, error::AppError, state::AppState};

use super::{
    dto::{ListQuery, NewPublication, PublicationPatch, PublicationRead, StateUpdate},
    repo::Publication,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/publications",
            get(list_publications).post(create_publication),
        )
        .route(
            "/publications/:id",
            get(get_publication)
                .put(update_publication)
                .patch(set_publication_state)
                .delete(delete_publication),
        )
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

#[instrument(skip(state))]
pub async fn list_publications(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<PublicationRead>>, AppError> {
    let rows = Publication::list(
        &state.db,
        q.tab.is_offer(),
        non_empty(q.university.as_deref()),
        non_empty(q.faculty.as_deref()),
        non_empty(q.subject.as_deref()),
        q.limit,
        q.offset,
    )
    .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_publication(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicationRead>, AppError> {
    let publication = Publication::get(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("publication"))?;
    Ok(Json(publication.into()))
}

#[instrument(skip_all)]
pub async fn create_publication(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<NewPublication>,
) -> Result<(StatusCode, Json<PublicationRead>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".into()));
    }

    let publication = Publication::create(&state.db, user.id, &payload).await?;
    info!(publication_id = %publication.id, user_id = %user.id, "publication created");
    Ok((StatusCode::CREATED, Json(publication.into())))
}

#[instrument(skip_all)]
pub async fn update_publication(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<PublicationPatch>,
) -> Result<Json<PublicationRead>, AppError> {
    let existing = Publication::get(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("publication"))?;
    if existing.author_id != user.id {
        warn!(publication_id = %id, user_id = %user.id, "edit denied");
        return Err(AppError::Forbidden("not enough permissions to edit"));
    }

    let updated = Publication::update_partial(&state.db, id, &payload)
        .await?
        .ok_or(AppError::NotFound("publication"))?;
    info!(publication_id = %id, user_id = %user.id, "publication updated");
    Ok(Json(updated.into()))
}

#[instrument(skip_all)]
pub async fn set_publication_state(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<StateUpdate>,
) -> Result<Json<PublicationRead>, AppError> {
    let existing = Publication::get(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("publication"))?;
    if existing.author_id != user.id {
        warn!(publication_id = %id, user_id = %user.id, "state change denied");
        return Err(AppError::Forbidden("not enough permissions to update state"));
    }

    let updated = Publication::set_active(&state.db, id, payload.is_active)
        .await?
        .ok_or(AppError::NotFound("publication"))?;
    info!(publication_id = %id, is_active = payload.is_active, "publication state changed");
    Ok(Json(updated.into()))
}

#[instrument(skip_all)]
pub async fn delete_publication(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, AppError> {
    let existing = Publication::get(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("publication"))?;
    if existing.author_id != user.id {
        warn!(publication_id = %id, user_id = %user.id, "delete denied");
        return Err(AppError::Forbidden("not enough permissions to delete"));
    }

    Publication::delete(&state.db, id).await?;
    info!(publication_id = %id, user_id = %user.id, "publication deleted");
    Ok(StatusCode::NO_CONTENT)
}
