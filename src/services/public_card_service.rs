use crate::entities::{card_entity as cards, card_view_entity as card_views};
use crate::error::AppResult;
use crate::models::{PublicCardResponse, ViewerContext};
use crate::services::card_service::card_not_found;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

/// Anonymous read path for `/card/{slug}`.
#[derive(Clone)]
pub struct PublicCardService {
    pool: DatabaseConnection,
}

impl PublicCardService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Resolves a public card and logs the view. Private and unknown slugs
    /// both come back as `NotFound`. A failed view write is logged and
    /// never affects the result.
    pub async fn resolve(
        &self,
        slug: &str,
        viewer: ViewerContext,
        now: DateTime<Utc>,
    ) -> AppResult<PublicCardResponse> {
        let card = cards::Entity::find()
            .filter(cards::Column::Slug.eq(slug))
            .filter(cards::Column::IsPublic.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(card_not_found)?;

        if let Err(e) = self.record_view(card.id, viewer, now).await {
            log::warn!("Failed to record view for card {}: {e}", card.id);
        }

        Ok(PublicCardResponse::from(card))
    }

    async fn record_view(
        &self,
        card_id: Uuid,
        viewer: ViewerContext,
        now: DateTime<Utc>,
    ) -> Result<(), sea_orm::DbErr> {
        card_views::ActiveModel {
            id: Set(Uuid::new_v4()),
            card_id: Set(card_id),
            viewer_ip: Set(viewer.viewer_ip),
            user_agent: Set(viewer.user_agent),
            referrer: Set(viewer.referrer),
            viewed_at: Set(now),
        }
        .insert(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StripeConfig;
    use crate::entities::SocialLinks;
    use crate::error::AppError;
    use crate::external::StripeService;
    use crate::models::{CardFields, Principal};
    use crate::services::{CardService, SubscriptionService};
    use crate::test_support::{app_config, create_user, setup_db};
    use sea_orm::ConnectionTrait;

    async fn fixture() -> (DatabaseConnection, CardService, PublicCardService, Principal) {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let stripe = StripeService::new(StripeConfig::default());
        let subs = SubscriptionService::new(db.clone(), stripe, 7);
        let cards = CardService::new(db.clone(), subs, app_config());
        let public = PublicCardService::new(db.clone());
        (db, cards, public, user)
    }

    fn fields() -> CardFields {
        CardFields {
            name: "Ada Lovelace".to_string(),
            title: Some("Analyst".to_string()),
            company: Some("Analytical Engines".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 0000 0000".to_string()),
            website: Some("https://ada.example.com".to_string()),
            bio: Some("Notes on the engine".to_string()),
            profile_image: Some("https://img.example.com/ada.png".to_string()),
            social: SocialLinks {
                linkedin: Some("https://linkedin.com/in/ada".to_string()),
                ..SocialLinks::default()
            },
            colors: None,
            template: Some("vibrant-coral".to_string()),
        }
    }

    #[tokio::test]
    async fn test_resolve_records_each_view() {
        let (_db, cards, public, user) = fixture().await;
        let saved = cards.save(user, None, fields(), Utc::now()).await.unwrap();

        for expected in 1..=3u64 {
            let viewer = ViewerContext {
                user_agent: Some("test-agent".to_string()),
                referrer: None,
                viewer_ip: Some("127.0.0.1".to_string()),
            };
            public.resolve(&saved.slug, viewer, Utc::now()).await.unwrap();
            let count = cards.count_views(user, saved.id).await.unwrap();
            assert_eq!(count.views, expected);
        }
    }

    #[tokio::test]
    async fn test_private_card_is_not_found_like_unknown_slug() {
        let (_db, cards, public, user) = fixture().await;
        let saved = cards.save(user, None, fields(), Utc::now()).await.unwrap();
        cards
            .set_visibility(user, saved.id, false, Utc::now())
            .await
            .unwrap();

        let private = public
            .resolve(&saved.slug, ViewerContext::default(), Utc::now())
            .await
            .unwrap_err();
        let unknown = public
            .resolve("no-such-card", ViewerContext::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(private, AppError::NotFound(_)));
        assert_eq!(private.to_string(), unknown.to_string());
        assert_eq!(cards.count_views(user, saved.id).await.unwrap().views, 0);
    }

    #[tokio::test]
    async fn test_round_trip_after_update() {
        let (_db, cards, public, user) = fixture().await;
        let saved = cards.save(user, None, fields(), Utc::now()).await.unwrap();
        let before = cards.get_card(user, saved.id).await.unwrap();

        let mut edited = fields();
        edited.title = Some("Mathematician".to_string());
        edited.social.twitter = Some("https://twitter.com/ada".to_string());
        cards
            .save(user, Some(saved.id), edited.clone(), Utc::now())
            .await
            .unwrap();

        let card = public
            .resolve(&saved.slug, ViewerContext::default(), Utc::now())
            .await
            .unwrap();
        assert_eq!(card.slug, before.slug);
        assert_eq!(card.created_at, before.created_at);
        assert_eq!(card.name, edited.name);
        assert_eq!(card.title, edited.title);
        assert_eq!(card.company, edited.company);
        assert_eq!(card.email, edited.email);
        assert_eq!(card.phone, edited.phone);
        assert_eq!(card.website, edited.website);
        assert_eq!(card.bio, edited.bio);
        assert_eq!(card.profile_image, edited.profile_image);
        assert_eq!(card.social, edited.social);
        assert_eq!(card.template, "vibrant-coral");
    }

    #[tokio::test]
    async fn test_view_write_failure_does_not_fail_resolve() {
        let (db, cards, public, user) = fixture().await;
        let saved = cards.save(user, None, fields(), Utc::now()).await.unwrap();

        db.execute_unprepared("DROP TABLE card_analytics")
            .await
            .unwrap();

        let card = public
            .resolve(&saved.slug, ViewerContext::default(), Utc::now())
            .await
            .unwrap();
        assert_eq!(card.id, saved.id);
    }
}
