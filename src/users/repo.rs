use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub university: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Point lookup on the unique email key.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, university, password_hash, avatar, bio, is_active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, university, password_hash, avatar, bio, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Inserting a taken email trips the unique constraint, which the error
    /// layer reports as a duplicate registration.
    pub async fn create(
        db: &PgPool,
        name: &str,
        university: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, university, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, university, password_hash, avatar, bio, is_active, created_at
            "#,
        )
        .bind(name)
        .bind(university)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Full overwrite of the three editable profile fields.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        name: &str,
        university: &str,
        bio: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, university = $3, bio = $4
            WHERE id = $1
            RETURNING id, email, name, university, password_hash, avatar, bio, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(university)
        .bind(bio)
        .fetch_optional(db)
        .await
    }

    pub async fn set_avatar(
        db: &PgPool,
        id: Uuid,
        url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET avatar = $2
            WHERE id = $1
            RETURNING id, email, name, university, password_hash, avatar, bio, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(url)
        .fetch_optional(db)
        .await
    }
}
