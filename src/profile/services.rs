use bytes::Bytes;
use tracing::warn;
use uuid::Uuid;

use crate::{error::AppError, state::AppState, users::repo::User};

/// Upload ceiling for avatar images.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

/// Validates and stores a new avatar for `user`, removing the previous file
/// best-effort, and records the public URL on the user row. Returns that URL.
pub async fn store_avatar(
    state: &AppState,
    user: &User,
    content_type: &str,
    body: Bytes,
) -> Result<String, AppError> {
    if !content_type.starts_with("image/") {
        return Err(AppError::InvalidMediaType);
    }
    if body.len() > MAX_AVATAR_BYTES {
        return Err(AppError::PayloadTooLarge(MAX_AVATAR_BYTES));
    }

    // A stale or already-removed old file must not fail the upload.
    if let Some(old) = user.avatar.as_deref().and_then(filename_from_url) {
        if let Err(e) = state.avatars.delete(old).await {
            warn!(error = %e, user_id = %user.id, "failed to remove previous avatar");
        }
    }

    let ext = ext_from_mime(content_type).unwrap_or("bin");
    let filename = format!("{}_{}.{}", user.id, Uuid::new_v4().simple(), ext);
    state.avatars.save(&filename, body).await?;

    let url = state.avatars.public_url(&filename);
    let updated = User::set_avatar(&state.db, user.id, &url).await?;
    if updated.is_none() {
        // The caller authenticated moments ago; a missing row here means the
        // account vanished mid-request.
        return Err(AppError::Persistence("failed to update avatar in database"));
    }

    Ok(url)
}

fn filename_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|s| !s.is_empty())
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use time::OffsetDateTime;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "student@uni.example".into(),
            name: "Sam".into(),
            university: "UL".into(),
            password_hash: "$argon2id$fake".into(),
            avatar: None,
            bio: None,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn ext_from_mime_known_and_unknown() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("application/pdf"), None);
    }

    #[test]
    fn filename_from_url_takes_last_segment() {
        assert_eq!(
            filename_from_url("/static/avatars/abc_1.png"),
            Some("abc_1.png")
        );
        assert_eq!(filename_from_url("bare.png"), Some("bare.png"));
        assert_eq!(filename_from_url("/static/avatars/"), None);
    }

    #[tokio::test]
    async fn rejects_non_image_uploads() {
        let state = AppState::fake();
        let err = store_avatar(&state, &test_user(), "text/plain", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidMediaType));
    }

    #[tokio::test]
    async fn rejects_oversized_uploads() {
        let state = AppState::fake();
        let body = Bytes::from(vec![0u8; MAX_AVATAR_BYTES + 1]);
        let err = store_avatar(&state, &test_user(), "image/png", body)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }
}
