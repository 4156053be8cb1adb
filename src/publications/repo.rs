use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{NewPublication, PublicationPatch};

/// Publication row joined with its author's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct Publication {
    pub id: Uuid,
    pub author_id: Uuid,
    pub is_offer: bool,
    pub title: String,
    pub university: String,
    pub faculty: String,
    pub subject: String,
    pub price: f64,
    pub description: String,
    pub bought: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub author_name: String,
    pub author_university: String,
    pub author_bio: Option<String>,
    pub author_avatar: Option<String>,
}

const SELECT: &str = r#"
    SELECT p.id, p.author_id, p.is_offer, p.title, p.university, p.faculty, p.subject,
           p.price, p.description, p.bought, p.is_active, p.created_at,
           u.name AS author_name, u.university AS author_university,
           u.bio AS author_bio, u.avatar AS author_avatar
"#;

impl Publication {
    /// Public listing: active rows only, optional filters ANDed, newest first.
    pub async fn list(
        db: &PgPool,
        is_offer: bool,
        university: Option<&str>,
        faculty: Option<&str>,
        subject: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Publication>, sqlx::Error> {
        sqlx::query_as::<_, Publication>(&format!(
            r#"
            {SELECT}
            FROM publications p
            JOIN users u ON u.id = p.author_id
            WHERE p.is_offer = $1
              AND p.is_active = TRUE
              AND ($2::text IS NULL OR p.university = $2)
              AND ($3::text IS NULL OR p.faculty = $3)
              AND ($4::text IS NULL OR p.subject = $4)
            ORDER BY p.created_at DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(is_offer)
        .bind(university)
        .bind(faculty)
        .bind(subject)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    /// Point lookup; inactive rows stay addressable by id.
    pub async fn get(db: &PgPool, id: Uuid) -> Result<Option<Publication>, sqlx::Error> {
        sqlx::query_as::<_, Publication>(&format!(
            r#"
            {SELECT}
            FROM publications p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Active listings of one author, for the public profile page.
    pub async fn list_by_author(
        db: &PgPool,
        author_id: Uuid,
    ) -> Result<Vec<Publication>, sqlx::Error> {
        sqlx::query_as::<_, Publication>(&format!(
            r#"
            {SELECT}
            FROM publications p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1 AND p.is_active = TRUE
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(author_id)
        .fetch_all(db)
        .await
    }

    /// Everything an author owns, deactivated rows included ("my publications").
    pub async fn list_all_by_author(
        db: &PgPool,
        author_id: Uuid,
    ) -> Result<Vec<Publication>, sqlx::Error> {
        sqlx::query_as::<_, Publication>(&format!(
            r#"
            {SELECT}
            FROM publications p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at DESC
            "#
        ))
        .bind(author_id)
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        author_id: Uuid,
        new: &NewPublication,
    ) -> Result<Publication, sqlx::Error> {
        sqlx::query_as::<_, Publication>(&format!(
            r#"
            WITH p AS (
                INSERT INTO publications
                    (author_id, is_offer, title, university, faculty, subject, price, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            {SELECT}
            FROM p
            JOIN users u ON u.id = p.author_id
            "#
        ))
        .bind(author_id)
        .bind(new.is_offer)
        .bind(&new.title)
        .bind(&new.university)
        .bind(&new.faculty)
        .bind(&new.subject)
        .bind(new.price)
        .bind(&new.description)
        .fetch_one(db)
        .await
    }

    /// Applies only the fields present in the patch; absent ones keep their
    /// stored values.
    pub async fn update_partial(
        db: &PgPool,
        id: Uuid,
        patch: &PublicationPatch,
    ) -> Result<Option<Publication>, sqlx::Error> {
        sqlx::query_as::<_, Publication>(&format!(
            r#"
            WITH p AS (
                UPDATE publications
                SET title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    price = COALESCE($4, price)
                WHERE id = $1
                RETURNING *
            )
            {SELECT}
            FROM p
            JOIN users u ON u.id = p.author_id
            "#
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .fetch_optional(db)
        .await
    }

    pub async fn set_active(
        db: &PgPool,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Publication>, sqlx::Error> {
        sqlx::query_as::<_, Publication>(&format!(
            r#"
            WITH p AS (
                UPDATE publications
                SET is_active = $2
                WHERE id = $1
                RETURNING *
            )
            {SELECT}
            FROM p
            JOIN users u ON u.id = p.author_id
            "#
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(db)
        .await
    }

    /// Hard delete.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM publications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
