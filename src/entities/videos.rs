use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub cover_path: Option<String>,
    pub duration_secs: Option<f64>,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::qr_codes::Entity")]
    QrCodes,
    #[sea_orm(has_many = "super::play_logs::Entity")]
    PlayLogs,
}

impl Related<super::qr_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCodes.def()
    }
}

impl Related<super::play_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
