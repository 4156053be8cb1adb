use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    publications::{dto::PublicationRead, repo::Publication},
    state::AppState,
};

use super::dto::MeResponse;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(me))
        .route("/users/me/publications", get(my_publications))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse::from(user))
}

/// Owner view: deactivated listings are included, unlike the public profile.
#[instrument(skip_all)]
pub async fn my_publications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PublicationRead>>, AppError> {
    let rows = Publication::list_all_by_author(&state.db, user.id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
