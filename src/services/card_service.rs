use std::collections::HashMap;

use crate::config::AppConfig;
use crate::entities::{CardColors, card_entity as cards, card_view_entity as card_views};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::SubscriptionService;
use crate::services::template_service::{DEFAULT_TEMPLATE_ID, Template, find_template};
use crate::utils::*;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

/// Owner-side card operations: publishing, dashboard listing and sharing.
#[derive(Clone)]
pub struct CardService {
    pool: DatabaseConnection,
    subscription_service: SubscriptionService,
    app: AppConfig,
}

impl CardService {
    pub fn new(
        pool: DatabaseConnection,
        subscription_service: SubscriptionService,
        app: AppConfig,
    ) -> Self {
        Self {
            pool,
            subscription_service,
            app,
        }
    }

    /// Creates a card (minting its slug) when `existing_id` is absent,
    /// otherwise overwrites every editable field of an owned card. The slug
    /// and `created_at` never change after creation.
    pub async fn save(
        &self,
        principal: Principal,
        existing_id: Option<Uuid>,
        fields: CardFields,
        now: DateTime<Utc>,
    ) -> AppResult<SavedCard> {
        let template = validate_card_fields(&fields)?;

        match existing_id {
            Some(id) => self.update_card(principal, id, fields, template, now).await,
            None => self.create_card(principal, fields, template, now).await,
        }
    }

    async fn create_card(
        &self,
        principal: Principal,
        fields: CardFields,
        template: &'static Template,
        now: DateTime<Utc>,
    ) -> AppResult<SavedCard> {
        let entitlement = self
            .subscription_service
            .entitlement_for(principal.user_id, now)
            .await?;

        if entitlement.status == EntitlementStatus::Trial {
            let owned = cards::Entity::find()
                .filter(cards::Column::UserId.eq(principal.user_id))
                .count(&self.pool)
                .await?;
            if owned >= self.app.trial_card_limit {
                return Err(AppError::EntitlementRequired(format!(
                    "Trial accounts can create up to {} card(s); upgrade to create more",
                    self.app.trial_card_limit
                )));
            }
        }

        self.ensure_template_access(principal, template, &entitlement)
            .await?;

        let colors = fields
            .colors
            .clone()
            .unwrap_or_else(|| template.default_colors());
        let base = slugify(&fields.name);
        let candidates = (0..).map(|attempt| slug_candidate(&base, attempt));

        self.insert_with_slugs(principal, &fields, template, colors, candidates, now)
            .await
    }

    /// Inserts the card under the first free candidate slug, trying at most
    /// `MAX_SLUG_ATTEMPTS` of them.
    async fn insert_with_slugs(
        &self,
        principal: Principal,
        fields: &CardFields,
        template: &'static Template,
        colors: CardColors,
        candidates: impl IntoIterator<Item = String>,
        now: DateTime<Utc>,
    ) -> AppResult<SavedCard> {
        for slug in candidates.into_iter().take(MAX_SLUG_ATTEMPTS) {
            if slug_taken(&self.pool, &slug).await? {
                continue;
            }

            let card = cards::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(Some(principal.user_id)),
                name: Set(fields.name.clone()),
                title: Set(fields.title.clone()),
                company: Set(fields.company.clone()),
                email: Set(fields.email.clone()),
                phone: Set(fields.phone.clone()),
                website: Set(fields.website.clone()),
                bio: Set(fields.bio.clone()),
                profile_image: Set(fields.profile_image.clone()),
                social: Set(fields.social.clone()),
                colors: Set(colors.clone()),
                template: Set(template.id.to_string()),
                slug: Set(slug.clone()),
                is_public: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };

            match card.insert(&self.pool).await {
                Ok(card) => {
                    log::info!(
                        "User {} published card {} as /card/{}",
                        principal.user_id,
                        card.id,
                        card.slug
                    );
                    return Ok(SavedCard {
                        id: card.id,
                        slug: card.slug,
                    });
                }
                // another publish took the slug between check and insert
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    log::warn!("Slug {slug} was taken concurrently, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a unique card URL, please try again".to_string(),
        ))
    }

    async fn update_card(
        &self,
        principal: Principal,
        id: Uuid,
        fields: CardFields,
        template: &'static Template,
        now: DateTime<Utc>,
    ) -> AppResult<SavedCard> {
        let card = self.find_owned(&self.pool, principal, id).await?;

        if card.template != template.id {
            let entitlement = self
                .subscription_service
                .entitlement_for(principal.user_id, now)
                .await?;
            self.ensure_template_access(principal, template, &entitlement)
                .await?;
        }

        let colors = fields
            .colors
            .unwrap_or_else(|| template.default_colors());

        let mut am = card.into_active_model();
        am.name = Set(fields.name);
        am.title = Set(fields.title);
        am.company = Set(fields.company);
        am.email = Set(fields.email);
        am.phone = Set(fields.phone);
        am.website = Set(fields.website);
        am.bio = Set(fields.bio);
        am.profile_image = Set(fields.profile_image);
        am.social = Set(fields.social);
        am.colors = Set(colors);
        am.template = Set(template.id.to_string());
        am.updated_at = Set(now);
        let card = am.update(&self.pool).await?;

        Ok(SavedCard {
            id: card.id,
            slug: card.slug,
        })
    }

    async fn ensure_template_access(
        &self,
        principal: Principal,
        template: &Template,
        entitlement: &Entitlement,
    ) -> AppResult<()> {
        if !template.is_premium || entitlement.has_premium_access() {
            return Ok(());
        }
        if self
            .subscription_service
            .has_template_payment(principal.user_id, template.id)
            .await?
        {
            return Ok(());
        }
        Err(AppError::EntitlementRequired(format!(
            "Template '{}' requires an active subscription",
            template.name
        )))
    }

    /// The caller's cards, newest first, with their view counts.
    pub async fn list_cards(&self, principal: Principal) -> AppResult<CardListResponse> {
        let owned = cards::Entity::find()
            .filter(cards::Column::UserId.eq(principal.user_id))
            .order_by_desc(cards::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = owned.iter().map(|c| c.id).collect();
        let counts: HashMap<Uuid, i64> = if ids.is_empty() {
            HashMap::new()
        } else {
            card_views::Entity::find()
                .select_only()
                .column(card_views::Column::CardId)
                .column_as(Expr::col(card_views::Column::Id).count(), "views")
                .filter(card_views::Column::CardId.is_in(ids))
                .group_by(card_views::Column::CardId)
                .into_tuple::<(Uuid, i64)>()
                .all(&self.pool)
                .await?
                .into_iter()
                .collect()
        };

        let cards: Vec<CardWithViews> = owned
            .into_iter()
            .map(|card| CardWithViews {
                views: counts.get(&card.id).copied().unwrap_or(0).max(0) as u64,
                card: CardResponse::from(card),
            })
            .collect();
        let total_views = cards.iter().map(|c| c.views).sum();

        Ok(CardListResponse { cards, total_views })
    }

    pub async fn get_card(&self, principal: Principal, id: Uuid) -> AppResult<CardResponse> {
        let card = self.find_owned(&self.pool, principal, id).await?;
        Ok(CardResponse::from(card))
    }

    /// Draft/Live toggle.
    pub async fn set_visibility(
        &self,
        principal: Principal,
        id: Uuid,
        is_public: bool,
        now: DateTime<Utc>,
    ) -> AppResult<CardResponse> {
        let card = self.find_owned(&self.pool, principal, id).await?;
        let mut am = card.into_active_model();
        am.is_public = Set(is_public);
        am.updated_at = Set(now);
        let card = am.update(&self.pool).await?;
        Ok(CardResponse::from(card))
    }

    /// Hard delete; the card's view log goes with it.
    pub async fn delete_card(&self, principal: Principal, id: Uuid) -> AppResult<()> {
        let txn = self.pool.begin().await?;
        let card = self.find_owned(&txn, principal, id).await?;

        card_views::Entity::delete_many()
            .filter(card_views::Column::CardId.eq(card.id))
            .exec(&txn)
            .await?;
        cards::Entity::delete_by_id(card.id).exec(&txn).await?;

        txn.commit().await?;
        log::info!("User {} deleted card {}", principal.user_id, id);
        Ok(())
    }

    pub async fn count_views(
        &self,
        principal: Principal,
        id: Uuid,
    ) -> AppResult<ViewCountResponse> {
        let card = self.find_owned(&self.pool, principal, id).await?;
        let views = count_card_views(&self.pool, card.id).await?;
        Ok(ViewCountResponse {
            card_id: card.id,
            views,
        })
    }

    pub async fn card_share(
        &self,
        principal: Principal,
        id: Uuid,
        size: Option<u32>,
    ) -> AppResult<CardShareResponse> {
        let qr_size = resolve_qr_size(size)?;
        let card = self.find_owned(&self.pool, principal, id).await?;

        let url = build_card_url(&self.app.public_base_url, &card.slug);
        let qr_code_url = build_qr_code_url(&self.app.qr_base_url, &url, qr_size)?;

        Ok(CardShareResponse {
            url,
            qr_code_url,
            qr_size,
        })
    }

    /// Someone else's card is reported exactly like a missing one.
    async fn find_owned<C: ConnectionTrait>(
        &self,
        db: &C,
        principal: Principal,
        id: Uuid,
    ) -> AppResult<cards::Model> {
        cards::Entity::find_by_id(id)
            .filter(cards::Column::UserId.eq(principal.user_id))
            .one(db)
            .await?
            .ok_or_else(card_not_found)
    }
}

/// Boundary validation for builder input. Returns the catalog template the
/// card will use.
pub fn validate_card_fields(fields: &CardFields) -> AppResult<&'static Template> {
    if fields.name.trim().is_empty() {
        return Err(AppError::ValidationError("name is required".to_string()));
    }

    let template_id = fields.template.as_deref().unwrap_or(DEFAULT_TEMPLATE_ID);
    let template = find_template(template_id)
        .ok_or_else(|| AppError::ValidationError(format!("Unknown template '{template_id}'")))?;

    if let Some(colors) = &fields.colors {
        validate_colors(colors)?;
    }
    validate_optional_email(fields.email.as_deref())?;
    validate_optional_http_url("profile_image", fields.profile_image.as_deref())?;
    for (platform, link) in fields.social.iter() {
        validate_optional_http_url(platform, link)?;
    }

    Ok(template)
}

fn validate_colors(colors: &CardColors) -> AppResult<()> {
    validate_hex_color("colors.primary", &colors.primary)?;
    validate_hex_color("colors.secondary", &colors.secondary)?;
    validate_hex_color("colors.accent", &colors.accent)?;
    validate_hex_color("colors.background", &colors.background)
}

pub(crate) fn card_not_found() -> AppError {
    AppError::NotFound("Card not found".to_string())
}

pub(crate) async fn count_card_views<C: ConnectionTrait>(db: &C, card_id: Uuid) -> AppResult<u64> {
    Ok(card_views::Entity::find()
        .filter(card_views::Column::CardId.eq(card_id))
        .count(db)
        .await?)
}

async fn slug_taken<C: ConnectionTrait>(db: &C, slug: &str) -> AppResult<bool> {
    // slugs are minted lowercase, so an exact match is case-insensitive
    let existing = cards::Entity::find()
        .filter(cards::Column::Slug.eq(slug.to_lowercase()))
        .count(db)
        .await?;
    Ok(existing > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StripeConfig;
    use crate::entities::{SocialLinks, SubscriptionStatus, subscription_entity as subscriptions};
    use crate::external::StripeService;
    use crate::test_support::{app_config, create_user, first_plan, setup_db};
    use chrono::Duration;
    use regex::Regex;

    fn services(pool: DatabaseConnection) -> (CardService, SubscriptionService) {
        let stripe = StripeService::new(StripeConfig::default());
        let subscriptions = SubscriptionService::new(pool.clone(), stripe, 7);
        (
            CardService::new(pool, subscriptions.clone(), app_config()),
            subscriptions,
        )
    }

    fn fields(name: &str) -> CardFields {
        CardFields {
            name: name.to_string(),
            title: Some("Analyst".to_string()),
            company: None,
            email: Some("ada@example.com".to_string()),
            phone: None,
            website: None,
            bio: None,
            profile_image: None,
            social: SocialLinks::default(),
            colors: None,
            template: Some("modern-geometric".to_string()),
        }
    }

    async fn seed_subscription(
        db: &DatabaseConnection,
        principal: Principal,
        status: SubscriptionStatus,
        trial_end: Option<DateTime<Utc>>,
        subscription_end: Option<DateTime<Utc>>,
    ) {
        let plan = first_plan(db).await;
        let now = Utc::now();
        subscriptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(principal.user_id),
            plan_id: Set(plan.id),
            status: Set(status),
            trial_start: Set(trial_end.map(|e| e - Duration::days(7))),
            trial_end: Set(trial_end),
            subscription_start: Set(subscription_end.map(|_| now)),
            subscription_end: Set(subscription_end),
            stripe_payment_intent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_new_card_gets_slug_and_is_public() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db);
        let now = Utc::now();

        let saved = cards_svc
            .save(user, None, fields("Ada Lovelace"), now)
            .await
            .unwrap();

        let pattern = Regex::new(r"^ada-lovelace(-[a-z0-9]+)?$").unwrap();
        assert!(pattern.is_match(&saved.slug), "slug {}", saved.slug);

        let card = cards_svc.get_card(user, saved.id).await.unwrap();
        assert!(card.is_public);
        assert_eq!(card.created_at, card.updated_at);
        assert_eq!(card.colors.primary, "#F59E0B");
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db);
        let err = cards_svc
            .save(user, None, fields("   "), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_slugs() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db);
        let now = Utc::now();

        let saves = (0..5).map(|_| cards_svc.save(user, None, fields("Ada Lovelace"), now));
        let results = futures_util::future::join_all(saves).await;

        let mut slugs: Vec<String> = results.into_iter().map(|r| r.unwrap().slug).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), 5);
        assert!(slugs.contains(&"ada-lovelace".to_string()));
    }

    #[tokio::test]
    async fn test_update_keeps_slug_and_created_at() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db);
        let created_at = Utc::now() - Duration::hours(1);

        let saved = cards_svc
            .save(user, None, fields("Ada Lovelace"), created_at)
            .await
            .unwrap();

        let mut edited = fields("Countess of Lovelace");
        edited.bio = Some("  first programmer  ".to_string());
        let updated = cards_svc
            .save(user, Some(saved.id), edited.clone(), Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.slug, saved.slug);

        let card = cards_svc.get_card(user, saved.id).await.unwrap();
        assert_eq!(card.name, "Countess of Lovelace");
        assert_eq!(card.bio.as_deref(), Some("  first programmer  "));
        assert_eq!(card.created_at, created_at);
        assert!(card.updated_at > card.created_at);
    }

    #[tokio::test]
    async fn test_cards_are_owner_scoped() {
        let db = setup_db().await;
        let ada = create_user(&db, "ada@example.com").await;
        let bob = create_user(&db, "bob@example.com").await;
        let (cards_svc, _) = services(db);

        let saved = cards_svc
            .save(ada, None, fields("Ada Lovelace"), Utc::now())
            .await
            .unwrap();

        let err = cards_svc.get_card(bob, saved.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = cards_svc
            .save(bob, Some(saved.id), fields("Bob"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = cards_svc.delete_card(bob, saved.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_trial_card_limit_blocks_creation_not_edits() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let now = Utc::now();
        seed_subscription(
            &db,
            user,
            SubscriptionStatus::Trial,
            Some(now + Duration::days(3)),
            None,
        )
        .await;
        let (cards_svc, _) = services(db);

        let first = cards_svc
            .save(user, None, fields("Ada Lovelace"), now)
            .await
            .unwrap();
        let err = cards_svc
            .save(user, None, fields("Second Card"), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntitlementRequired(_)));

        cards_svc
            .save(user, Some(first.id), fields("Ada L."), now)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_premium_template_requires_active_subscription() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db.clone());
        let now = Utc::now();

        let mut premium = fields("Ada Lovelace");
        premium.template = Some("corporate-blue".to_string());
        let err = cards_svc
            .save(user, None, premium.clone(), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntitlementRequired(_)));

        // switching an existing card to a premium template is gated too
        let free = cards_svc
            .save(user, None, fields("Ada Lovelace"), now)
            .await
            .unwrap();
        let err = cards_svc
            .save(user, Some(free.id), premium.clone(), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntitlementRequired(_)));

        seed_subscription(
            &db,
            user,
            SubscriptionStatus::Active,
            None,
            Some(now + Duration::days(30)),
        )
        .await;
        cards_svc.save(user, None, premium, now).await.unwrap();
    }

    #[tokio::test]
    async fn test_template_payment_unlocks_single_template() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let plan = first_plan(&db).await;
        let (cards_svc, subs) = services(db);
        let now = Utc::now();

        // an expired purchase still leaves the bought template usable
        let long_ago = now - Duration::days(400);
        subs.activate_plan(user.user_id, &plan, Some("minimalist-teal"), None, long_ago)
            .await
            .unwrap();

        let mut teal = fields("Ada Lovelace");
        teal.template = Some("minimalist-teal".to_string());
        cards_svc.save(user, None, teal, now).await.unwrap();

        let mut navy = fields("Ada Lovelace");
        navy.template = Some("professional-navy".to_string());
        let err = cards_svc.save(user, None, navy, now).await.unwrap_err();
        assert!(matches!(err, AppError::EntitlementRequired(_)));
    }

    #[tokio::test]
    async fn test_boundary_validation() {
        let mut bad_color = fields("Ada");
        bad_color.colors = Some(CardColors {
            primary: "navy".to_string(),
            secondary: "#000".to_string(),
            accent: "#000".to_string(),
            background: "#FFF".to_string(),
        });
        assert!(validate_card_fields(&bad_color).is_err());

        let mut bad_link = fields("Ada");
        bad_link.social.linkedin = Some("javascript:alert(1)".to_string());
        assert!(validate_card_fields(&bad_link).is_err());

        let mut bad_template = fields("Ada");
        bad_template.template = Some("retro".to_string());
        assert!(validate_card_fields(&bad_template).is_err());

        let mut defaults = fields("Ada");
        defaults.template = None;
        assert_eq!(validate_card_fields(&defaults).unwrap().id, DEFAULT_TEMPLATE_ID);
    }

    #[tokio::test]
    async fn test_list_delete_and_visibility() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db.clone());
        let now = Utc::now();

        let older = cards_svc
            .save(user, None, fields("Older"), now - Duration::minutes(5))
            .await
            .unwrap();
        let newer = cards_svc
            .save(user, None, fields("Newer"), now)
            .await
            .unwrap();

        for _ in 0..2 {
            card_views::ActiveModel {
                id: Set(Uuid::new_v4()),
                card_id: Set(older.id),
                viewer_ip: Set(None),
                user_agent: Set(None),
                referrer: Set(None),
                viewed_at: Set(now),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let listed = cards_svc.list_cards(user).await.unwrap();
        assert_eq!(listed.cards[0].card.id, newer.id);
        assert_eq!(listed.cards[1].views, 2);
        assert_eq!(listed.total_views, 2);

        let hidden = cards_svc
            .set_visibility(user, newer.id, false, now + Duration::seconds(1))
            .await
            .unwrap();
        assert!(!hidden.is_public);
        assert!(hidden.updated_at > hidden.created_at);

        cards_svc.delete_card(user, older.id).await.unwrap();
        let remaining_views = card_views::Entity::find()
            .filter(card_views::Column::CardId.eq(older.id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(remaining_views, 0);
        assert_eq!(cards_svc.list_cards(user).await.unwrap().cards.len(), 1);
    }

    #[tokio::test]
    async fn test_card_share() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db);
        let saved = cards_svc
            .save(user, None, fields("Ada Lovelace"), Utc::now())
            .await
            .unwrap();

        let share = cards_svc.card_share(user, saved.id, None).await.unwrap();
        assert_eq!(share.url, format!("https://cards.example.com/card/{}", saved.slug));
        assert_eq!(share.qr_size, 200);
        assert!(share.qr_code_url.contains("size=200x200"));

        let err = cards_svc
            .card_share(user, saved.id, Some(120))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_slug_taken_between_check_and_insert_moves_on() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db.clone());
        // a rival publish lands on `ada-raced` after the availability check
        db.execute_unprepared(
            "CREATE TRIGGER rival_publish BEFORE INSERT ON digital_cards \
             WHEN NEW.slug = 'ada-raced' BEGIN \
             INSERT INTO digital_cards \
             (id, name, social, colors, template, slug, is_public, created_at, updated_at) \
             VALUES (randomblob(16), 'Rival', '{}', '{}', 'modern-geometric', NEW.slug, 1, \
             NEW.created_at, NEW.updated_at); END",
        )
        .await
        .unwrap();

        let template = find_template("modern-geometric").unwrap();
        let candidates = ["ada-raced".to_string(), "ada-second".to_string()];
        let saved = cards_svc
            .insert_with_slugs(
                user,
                &fields("Ada"),
                template,
                template.default_colors(),
                candidates,
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(saved.slug, "ada-second");
    }

    #[tokio::test]
    async fn test_slug_attempts_exhausted_is_conflict() {
        let db = setup_db().await;
        let user = create_user(&db, "ada@example.com").await;
        let (cards_svc, _) = services(db);
        let now = Utc::now();

        let taken = cards_svc
            .save(user, None, fields("Ada Lovelace"), now)
            .await
            .unwrap();
        assert_eq!(taken.slug, "ada-lovelace");

        let template = find_template("modern-geometric").unwrap();
        let err = cards_svc
            .insert_with_slugs(
                user,
                &fields("Ada Lovelace"),
                template,
                template.default_colors(),
                std::iter::repeat(taken.slug.clone()),
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let owned = cards::Entity::find()
            .filter(cards::Column::UserId.eq(user.user_id))
            .count(&cards_svc.pool)
            .await
            .unwrap();
        assert_eq!(owned, 1);
    }
}
