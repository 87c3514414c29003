use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scan_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub qr_code_id: String,
    pub client_info: Option<String>,
    pub success: bool,
    pub fail_reason: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qr_codes::Entity",
        from = "Column::QrCodeId",
        to = "super::qr_codes::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    QrCodes,
}

impl Related<super::qr_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
