use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Append-only view log; one row per public resolve.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "card_analytics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub card_id: Uuid,
    pub viewer_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::digital_cards::Entity",
        from = "Column::CardId",
        to = "super::digital_cards::Column::Id",
        on_delete = "Cascade"
    )]
    DigitalCard,
}

impl Related<super::digital_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DigitalCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
