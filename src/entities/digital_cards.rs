use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The four named colours a card is rendered with, as hex strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromJsonQueryResult)]
pub struct CardColors {
    #[schema(example = "#1E40AF")]
    pub primary: String,
    #[schema(example = "#3B82F6")]
    pub secondary: String,
    #[schema(example = "#EF4444")]
    pub accent: String,
    #[schema(example = "#FFFFFF")]
    pub background: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, FromJsonQueryResult,
)]
pub struct SocialLinks {
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
}

impl SocialLinks {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        [
            ("linkedin", self.linkedin.as_deref()),
            ("twitter", self.twitter.as_deref()),
            ("instagram", self.instagram.as_deref()),
            ("facebook", self.facebook.as_deref()),
            ("youtube", self.youtube.as_deref()),
        ]
        .into_iter()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "digital_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    #[sea_orm(column_type = "JsonBinary")]
    pub social: SocialLinks,
    #[sea_orm(column_type = "JsonBinary")]
    pub colors: CardColors,
    pub template: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::card_analytics::Entity")]
    CardAnalytics,
}

impl Related<super::card_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CardAnalytics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
