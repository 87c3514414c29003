use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "qr_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Opaque scan token, immutable once minted.
    #[sea_orm(unique)]
    pub code_value: String,
    #[sea_orm(indexed)]
    pub video_id: String,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::videos::Entity",
        from = "Column::VideoId",
        to = "super::videos::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Videos,
    #[sea_orm(has_many = "super::scan_logs::Entity")]
    ScanLogs,
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<super::scan_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScanLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
