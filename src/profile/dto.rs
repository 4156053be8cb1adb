use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::publications::dto::PublicationRead;
use crate::users::{dto::PublicUser, repo::User};

/// Body for `PUT /profile/:id`. All three fields are required; the update is
/// a full overwrite.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub university: String,
    pub bio: String,
}

/// Public profile page: user fields plus the active listings and their counts.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub created_at: OffsetDateTime,
    pub active_offers: usize,
    pub active_requests: usize,
    pub publications: Vec<PublicationRead>,
}

impl UserProfile {
    pub fn new(user: User, publications: Vec<PublicationRead>) -> Self {
        let active_offers = publications.iter().filter(|p| p.is_offer).count();
        let active_requests = publications.len() - active_offers;
        Self {
            created_at: user.created_at,
            user: user.into(),
            active_offers,
            active_requests,
            publications,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "student@uni.example".into(),
            name: "Sam".into(),
            university: "UL".into(),
            password_hash: "$argon2id$fake".into(),
            avatar: None,
            bio: Some("hi".into()),
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn listing(is_offer: bool) -> PublicationRead {
        PublicationRead {
            id: Uuid::new_v4(),
            is_offer,
            title: "Calculus tutoring".into(),
            university: "UL".into(),
            faculty: "Science".into(),
            subject: "Math".into(),
            price: 10.0,
            description: "weekly".into(),
            bought: 0,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
            author: PublicUser {
                id: Uuid::new_v4(),
                name: "Sam".into(),
                university: "UL".into(),
                bio: String::new(),
                avatar: String::new(),
            },
        }
    }

    #[test]
    fn counts_offers_and_requests() {
        let profile = UserProfile::new(user(), vec![listing(true), listing(true), listing(false)]);
        assert_eq!(profile.active_offers, 2);
        assert_eq!(profile.active_requests, 1);
    }

    #[test]
    fn profile_json_has_no_email() {
        let profile = UserProfile::new(user(), vec![]);
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["bio"], "hi");
        assert_eq!(json["active_offers"], 0);
    }
}
