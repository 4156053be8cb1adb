use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::User;

/// Public part of a user, embedded as publication author and on profile
/// pages. `bio` and `avatar` render as empty strings when unset.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub university: String,
    pub bio: String,
    pub avatar: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            university: u.university,
            bio: u.bio.unwrap_or_default(),
            avatar: u.avatar.unwrap_or_default(),
        }
    }
}

/// The caller's own view; the only user payload that carries the email.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub university: String,
    pub bio: String,
    pub avatar: String,
    pub created_at: OffsetDateTime,
}

impl From<User> for MeResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            university: u.university,
            bio: u.bio.unwrap_or_default(),
            avatar: u.avatar.unwrap_or_default(),
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
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
    fn public_user_hides_email_and_coerces_nulls() {
        let json = serde_json::to_value(PublicUser::from(sample_user())).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["bio"], "");
        assert_eq!(json["avatar"], "");
    }

    #[test]
    fn me_response_keeps_email_and_drops_hash() {
        let json = serde_json::to_value(MeResponse::from(sample_user())).unwrap();
        assert_eq!(json["email"], "student@uni.example");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn user_row_never_serializes_password_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
