//! Waifu entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use animoshi_core::domain::WaifuStatus;

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_APPROVED: &str = "APPROVED";
pub const STATUS_REJECTED: &str = "REJECTED";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "waifus")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    pub user_id: String,
    pub rating: i64,
    pub favorites: i64,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Unknown values are treated as pending, which keeps them hidden.
fn parse_status(raw: &str) -> WaifuStatus {
    match raw {
        STATUS_APPROVED => WaifuStatus::Approved,
        STATUS_REJECTED => WaifuStatus::Rejected,
        _ => WaifuStatus::Pending,
    }
}

fn status_str(status: WaifuStatus) -> &'static str {
    match status {
        WaifuStatus::Pending => STATUS_PENDING,
        WaifuStatus::Approved => STATUS_APPROVED,
        WaifuStatus::Rejected => STATUS_REJECTED,
    }
}

impl From<Model> for animoshi_core::domain::Waifu {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image: model.image,
            user_id: model.user_id,
            rating: model.rating,
            favorites: model.favorites,
            status: parse_status(&model.status),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<animoshi_core::domain::Waifu> for ActiveModel {
    fn from(waifu: animoshi_core::domain::Waifu) -> Self {
        Self {
            id: Set(waifu.id),
            name: Set(waifu.name),
            description: Set(waifu.description),
            image: Set(waifu.image),
            user_id: Set(waifu.user_id),
            rating: Set(waifu.rating),
            favorites: Set(waifu.favorites),
            status: Set(status_str(waifu.status).to_string()),
            created_at: Set(waifu.created_at.into()),
            updated_at: Set(waifu.updated_at.into()),
        }
    }
}
