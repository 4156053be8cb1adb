use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::dto::PublicUser;

use super::repo::Publication;

/// Listing tab: `help` shows offers, `need` shows requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Need,
    Help,
}

impl Tab {
    pub fn is_offer(self) -> bool {
        matches!(self, Tab::Help)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub tab: Tab,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub subject: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct NewPublication {
    pub is_offer: bool,
    pub title: String,
    pub university: String,
    pub faculty: String,
    pub subject: String,
    #[serde(default)]
    pub price: f64,
    pub description: String,
}

/// Partial edit; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct PublicationPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct StateUpdate {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct PublicationRead {
    pub id: Uuid,
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
    pub author: PublicUser,
}

impl From<Publication> for PublicationRead {
    fn from(p: Publication) -> Self {
        Self {
            id: p.id,
            is_offer: p.is_offer,
            title: p.title,
            university: p.university,
            faculty: p.faculty,
            subject: p.subject,
            price: p.price,
            description: p.description,
            bought: p.bought,
            is_active: p.is_active,
            created_at: p.created_at,
            author: PublicUser {
                id: p.author_id,
                name: p.author_name,
                university: p.author_university,
                bio: p.author_bio.unwrap_or_default(),
                avatar: p.author_avatar.unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_parses_need_and_help_only() {
        assert_eq!(serde_json::from_str::<Tab>(r#""need""#).unwrap(), Tab::Need);
        assert_eq!(serde_json::from_str::<Tab>(r#""help""#).unwrap(), Tab::Help);
        assert!(serde_json::from_str::<Tab>(r#""offers""#).is_err());
    }

    #[test]
    fn help_means_offers() {
        assert!(Tab::Help.is_offer());
        assert!(!Tab::Need.is_offer());
    }

    #[test]
    fn list_query_fills_paging_defaults() {
        let q: ListQuery = serde_json::from_str(r#"{"tab": "help"}"#).unwrap();
        assert_eq!(q.limit, 100);
        assert_eq!(q.offset, 0);
        assert!(q.university.is_none());
    }

    #[test]
    fn new_publication_price_defaults_to_free() {
        let p: NewPublication = serde_json::from_str(
            r#"{
                "is_offer": true,
                "title": "Calculus tutoring",
                "university": "UL",
                "faculty": "Science",
                "subject": "Math",
                "description": "First session free"
            }"#,
        )
        .unwrap();
        assert_eq!(p.price, 0.0);
    }

    #[test]
    fn patch_with_single_field_leaves_rest_unset() {
        let patch: PublicationPatch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(patch.description.as_deref(), Some("x"));
        assert!(patch.title.is_none());
        assert!(patch.price.is_none());
    }
}
