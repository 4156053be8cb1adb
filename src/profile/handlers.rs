use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    publications::repo::Publication,
    state::AppState,
    users::{dto::MeResponse, repo::User},
};

use super::{
    dto::{AvatarResponse, ProfileUpdate, UserProfile},
    services::{self, MAX_AVATAR_BYTES},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/:id", get(get_profile).put(update_profile))
        .route(
            "/profile/avatar",
            // Generous body cap so oversized images reach our own 413 check
            // instead of dying in the multipart reader.
            patch(upload_avatar).layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES * 2)),
        )
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    let publications = Publication::list_by_author(&state.db, id).await?;
    Ok(Json(UserProfile::new(
        user,
        publications.into_iter().map(Into::into).collect(),
    )))
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<MeResponse>, AppError> {
    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    if target.id != caller.id {
        warn!(user_id = %caller.id, target = %id, "profile edit denied");
        return Err(AppError::Forbidden("not enough permissions to edit"));
    }

    let updated = User::update_profile(
        &state.db,
        id,
        &payload.name,
        &payload.university,
        &payload.bio,
    )
    .await?
    .ok_or(AppError::NotFound("user"))?;

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(MeResponse::from(updated)))
}

#[instrument(skip_all)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let avatar = services::store_avatar(&state, &user, &content_type, body).await?;
        info!(user_id = %user.id, %avatar, "avatar updated");
        return Ok(Json(AvatarResponse { avatar }));
    }

    Err(AppError::Validation("file field is required".into()))
}
