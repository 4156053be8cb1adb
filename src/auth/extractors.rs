use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{error::AppError, state::AppState, users::repo::User};

use super::jwt::JwtKeys;

/// Resolves the caller from the `Authorization: Bearer` header: verifies the
/// token, then loads the user named by its `sub` claim. Handlers receive the
/// full row and do their own ownership comparisons.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated("missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthenticated("invalid Authorization header"))?;

        let claims = JwtKeys::from_ref(state).verify(token)?;

        let user = User::find_by_email(&state.db, &claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated("user no longer exists"))?;

        Ok(CurrentUser(user))
    }
}
