use crate::entities::{CardColors, SocialLinks, card_entity as cards};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Editable card content submitted by the builder. Values are stored as
/// submitted; `template` and `colors` fall back to the catalog defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CardFields {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "Analyst")]
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub social: SocialLinks,
    pub colors: Option<CardColors>,
    #[schema(example = "modern-geometric")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedCard {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub social: SocialLinks,
    pub colors: CardColors,
    pub template: String,
    pub slug: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<cards::Model> for CardResponse {
    fn from(m: cards::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            title: m.title,
            company: m.company,
            email: m.email,
            phone: m.phone,
            website: m.website,
            bio: m.bio,
            profile_image: m.profile_image,
            social: m.social,
            colors: m.colors,
            template: m.template,
            slug: m.slug,
            is_public: m.is_public,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// What an anonymous visitor sees; owner and edit metadata are withheld.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicCardResponse {
    pub id: Uuid,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub social: SocialLinks,
    pub colors: CardColors,
    pub template: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<cards::Model> for PublicCardResponse {
    fn from(m: cards::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            title: m.title,
            company: m.company,
            email: m.email,
            phone: m.phone,
            website: m.website,
            bio: m.bio,
            profile_image: m.profile_image,
            social: m.social,
            colors: m.colors,
            template: m.template,
            slug: m.slug,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardWithViews {
    #[serde(flatten)]
    pub card: CardResponse,
    pub views: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardListResponse {
    pub cards: Vec<CardWithViews>,
    pub total_views: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetVisibilityRequest {
    pub is_public: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ViewCountResponse {
    pub card_id: Uuid,
    pub views: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ShareQuery {
    /// QR image edge in pixels: 100, 150 or 200.
    pub size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardShareResponse {
    pub url: String,
    pub qr_code_url: String,
    pub qr_size: u32,
}

/// Best-effort request metadata captured with a public view.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub viewer_ip: Option<String>,
}
